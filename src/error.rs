use std::net::SocketAddr;
use std::path::PathBuf;

use axum::response::{IntoResponse, Response};
use docview_core::ConfigurationError;
use sea_orm::DbErr;

use crate::app::middleware::exception;
use crate::services::{Capability, ChatError};

/// Failure while constructing or initializing a dependency. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("cannot construct chat client: {0}")]
    ChatClient(String),

    #[error("cannot prepare data directory {path}: {source}")]
    DataDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open data store: {0}")]
    DataStore(#[from] DbErr),

    #[error("store initialization failed: {0}")]
    StoreInitialization(#[source] DbErr),

    #[error("{0} is registered twice")]
    DuplicateService(Capability),

    #[error("{0} was never registered")]
    MissingService(Capability),

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Everything `bootstrap::start` can fail with.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Startup(#[from] StartupError),
}

/// Unhandled failure inside a request handler. Rendered by the environment's
/// exception policy, never directly.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("chat completion failed: {0}")]
    Chat(#[from] ChatError),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        exception::failure_response(self.to_string())
    }
}
