const DEFAULT_FILTER: &str = "info,tower_http=debug";

/// `RUST_LOG` wins when set (it may come from `.env`, so load that first).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();
}
