use std::path::Path;

use config::{Config, ConfigBuilder, File, FileFormat, Map, builder::DefaultState};
use docview_core::{ConfigurationError, Settings};

use super::Environment;

/// Layers `appsettings.json`, `appsettings.{Environment}.json` and the process
/// environment, in that order of increasing priority.
pub fn load_settings(config_dir: &Path) -> Result<Settings, ConfigurationError> {
    load_settings_with(config_dir, None)
}

/// Like [`load_settings`], with `vars` standing in for the process environment.
pub fn load_settings_from(config_dir: &Path, vars: Map<String, String>) -> Result<Settings, ConfigurationError> {
    load_settings_with(config_dir, Some(vars))
}

fn load_settings_with(config_dir: &Path, vars: Option<Map<String, String>>) -> Result<Settings, ConfigurationError> {
    // the overlay file is picked by the environment, which may itself come from env vars
    let base: Settings = layered(config_dir, None, vars.clone()).build()?.into();
    let environment = Environment::from_settings(&base);

    let settings: Settings = layered(config_dir, Some(environment), vars).build()?.into();
    tracing::debug!(%environment, dir = %config_dir.display(), "settings loaded");

    Ok(settings)
}

fn layered(
    config_dir: &Path,
    environment: Option<Environment>,
    vars: Option<Map<String, String>>,
) -> ConfigBuilder<DefaultState> {
    let mut builder = Config::builder().add_source(json_file(&config_dir.join("appsettings.json")));

    if let Some(environment) = environment {
        let overlay = config_dir.join(format!("appsettings.{}.json", environment.name()));
        builder = builder.add_source(json_file(&overlay));
    }

    builder.add_source(config::Environment::default().separator("__").source(vars))
}

fn json_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Json).required(false)
}
