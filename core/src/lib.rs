pub mod config;
pub mod controller;
pub mod response;

pub use config::{ConfigSection, ConfigurationError, Section, Settings};
