use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use docview::{bootstrap, config};

#[derive(Parser, Debug)]
#[command(name = "docview")]
#[command(about = "Document viewer service host", long_about = None)]
struct Args {
    /// Directory holding appsettings*.json (defaults to the content root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application content root, also published as the data directory
    #[arg(long)]
    content_root: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    bootstrap::init_base();

    let args = Args::parse();
    let content_root = match args.content_root {
        Some(path) => std::path::absolute(path)?,
        None => std::env::current_dir()?,
    };
    let config_dir = args.config.unwrap_or_else(|| content_root.clone());

    let settings = config::load_settings(&config_dir)
        .inspect_err(|err| tracing::error!("{}", err))
        .context("loading settings")?;
    let app_config = config::AppConfig::from_settings(&settings, content_root)
        .inspect_err(|err| tracing::error!("{}", err))
        .context("invalid configuration")?;

    // SAFETY: single-threaded here; the runtime is built below.
    unsafe { bootstrap::publish_data_directory(app_config.data_directory()) };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let app = bootstrap::build(app_config)
            .await
            .inspect_err(|err| tracing::error!("startup failed: {}", err))?;

        app.serve().await?;

        Ok::<(), anyhow::Error>(())
    })
}
