use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::ServiceRegistry;

/// Handed to every handler through axum's `State`; both halves are frozen.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<ServiceRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig, services: ServiceRegistry) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
