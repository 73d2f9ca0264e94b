pub mod controller;
pub mod middleware;
pub mod response;
mod state;

pub use state::AppState;
