//! One-shot startup: configuration, clients, registry, store, then serving.

mod env;
mod pipeline;
mod server;
mod tracing;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use docview_core::Settings;

use crate::app::AppState;
use crate::config::AppConfig;
use crate::data::DataContextFactory;
use crate::error::{BootstrapError, StartupError};
use crate::services::{AzureOpenAiChatClient, ServiceRegistry};

pub use pipeline::Pipeline;
pub use server::shutdown_signal;

/// Process environment variable naming the data directory.
pub const DATA_DIRECTORY_VAR: &str = "DATA_DIRECTORY";

pub fn init_base() {
    let dotenv = env::init_env();
    tracing::init_tracing();

    match dotenv {
        Ok(Some(path)) => ::tracing::debug!("loaded {}", path.display()),
        Ok(None) => {}
        Err(err) => ::tracing::warn!("cannot read `.env`: {}", err),
    }
}

/// Publishes the data directory for code that reads it from the environment.
///
/// # Safety
///
/// Mutates the process environment. Call it before any other thread exists,
/// in particular before the async runtime is built.
pub unsafe fn publish_data_directory(dir: &Path) {
    unsafe { std::env::set_var(DATA_DIRECTORY_VAR, dir) };
}

/// Runs the whole startup sequence against raw settings.
///
/// Setting `DATA_DIRECTORY` is left to the caller: it must call
/// [`publish_data_directory`] before the async runtime exists, as `main` does.
/// Startup only warns when the marker is missing or names another directory.
pub async fn start(settings: &Settings, content_root: impl Into<PathBuf>) -> Result<Application, BootstrapError> {
    let config = AppConfig::from_settings(settings, content_root)?;

    Ok(build(config).await?)
}

/// Everything after configuration: clients, registry, store initialization.
pub async fn build(config: AppConfig) -> Result<Application, StartupError> {
    ::tracing::info!(environment = %config.environment, "bootstrapping");

    if !data_directory_published(std::env::var_os(DATA_DIRECTORY_VAR), config.data_directory()) {
        ::tracing::warn!(
            dir = %config.data_directory().display(),
            "`{}` is not published for this content root",
            DATA_DIRECTORY_VAR
        );
    }

    let chat_client = AzureOpenAiChatClient::new(&config.ai)?;
    ::tracing::info!(
        endpoint = %config.ai.endpoint,
        deployment = %config.ai.deployment_name,
        "chat client constructed"
    );

    let data_context = DataContextFactory::connect(&config.database_url).await?;

    let mut registry = ServiceRegistry::builder();
    registry
        .register_chat_client(Arc::new(chat_client))?
        .register_data_context(Arc::new(data_context))?;
    let services = registry.build()?;

    services.data_context().initialize().await?;

    Ok(Application::new(config, services))
}

fn data_directory_published(current: Option<OsString>, dir: &Path) -> bool {
    current.is_some_and(|value| Path::new(&value) == dir)
}

/// A fully initialized host, ready to serve.
pub struct Application {
    state: AppState,
    pipeline: Pipeline,
}

impl Application {
    fn new(config: AppConfig, services: ServiceRegistry) -> Self {
        let pipeline = Pipeline::for_environment(config.environment);

        Self {
            state: AppState::new(config, services),
            pipeline,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    pub fn router(&self) -> Router {
        let router = crate::routes::routes(&self.state.config.web_root()).with_state(self.state.clone());
        let router = crate::routes::case_insensitive(router);

        self.pipeline.apply(router, self.state.config.https_port)
    }
}
