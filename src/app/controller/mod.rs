mod ai;
mod home;

pub use ai::{AiController, ChatRequest};
pub use home::HomeController;
