pub mod app;
pub mod bootstrap;
pub mod config;
pub mod data;
pub mod error;
pub mod routes;
pub mod services;

pub use error::{BootstrapError, RequestError, StartupError};
