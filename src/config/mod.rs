mod app;
mod connection_string;
mod environment;
mod loader;

pub use app::{AiSettings, AppConfig, CONNECTION_STRING_KEY, DEFAULT_PORT};
pub use connection_string::{resolve_connection_string, DATA_DIRECTORY_TOKEN};
pub use environment::Environment;
pub use loader::{load_settings, load_settings_from};
