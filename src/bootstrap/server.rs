use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use super::Application;
use crate::error::StartupError;

impl Application {
    /// Binds `0.0.0.0:<port>` and serves until Ctrl-C or SIGTERM.
    pub async fn serve(self) -> Result<(), StartupError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state().config.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| StartupError::Bind { addr, source })?;

        self.serve_with(listener, shutdown_signal()).await
    }

    pub async fn serve_with<F>(self, listener: TcpListener, shutdown: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();

        if let Ok(addr) = listener.local_addr() {
            tracing::info!("Server listening on {}", addr);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(StartupError::Serve)?;

        tracing::info!("server stopped");
        Ok(())
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!("cannot listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown requested");
}
