//! Hierarchical settings.
//!
//! Values are addressed by `Section:Key` paths over a layered
//! [`config::Config`]. Lookups ignore case, so `AISettings:AzureOpenAIKey`,
//! `aisettings:azureopenaikey` and the environment form
//! `AISettings__AzureOpenAIKey` all name the same value.

use config::{Config, ConfigError};

const SEPARATOR: &str = ":";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing required setting `{0}`")]
    Missing(String),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: String, reason: String },

    #[error("cannot read settings from `{origin}`: {reason}")]
    Source { origin: String, reason: String },
}

impl From<ConfigError> for ConfigurationError {
    fn from(err: ConfigError) -> Self {
        let origin = match &err {
            ConfigError::FileParse { uri: Some(uri), .. } => uri.clone(),
            _ => "settings".to_string(),
        };

        ConfigurationError::Source {
            origin,
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    config: Config,
}

impl From<Config> for Settings {
    fn from(config: Config) -> Self {
        Self { config }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings from literal `Section:Key` pairs; later pairs win.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self, ConfigurationError> {
        pairs
            .into_iter()
            .try_fold(Self::new(), |settings, (key, value)| settings.with(key, value))
    }

    /// Returns a copy with `key` overriding every layer.
    pub fn with(self, key: &str, value: impl Into<String>) -> Result<Self, ConfigurationError> {
        let value: String = value.into();
        let config = Config::builder()
            .add_source(self.config)
            .set_override(path(key), value)?
            .build()?;

        Ok(Self { config })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get_string(&path(key)).ok()
    }

    /// Returns the value trimmed, failing when it is absent or blank.
    pub fn require(&self, key: &str) -> Result<String, ConfigurationError> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(ConfigurationError::Missing(key.to_string())),
        }
    }

    pub fn section<'a>(&'a self, name: &'a str) -> Section<'a> {
        Section { settings: self, name }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// A named view over [`Settings`].
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    settings: &'a Settings,
    name: &'a str,
}

impl<'a> Section<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn key(&self, key: &str) -> String {
        format!("{}{SEPARATOR}{key}", self.name)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.settings.get(&self.key(key))
    }

    pub fn require(&self, key: &str) -> Result<String, ConfigurationError> {
        self.settings.require(&self.key(key))
    }
}

/// A typed configuration record bound to one section of [`Settings`].
pub trait ConfigSection: Sized {
    const SECTION: &'static str;

    fn from_section(section: Section<'_>) -> Result<Self, ConfigurationError>;

    fn load(settings: &Settings) -> Result<Self, ConfigurationError> {
        Self::from_section(settings.section(Self::SECTION))
    }
}

/// `Section:Key` to the dotted, lowercase path `config` stores.
fn path(key: &str) -> String {
    key.trim().replace(SEPARATOR, ".").to_lowercase()
}

#[cfg(test)]
mod tests {
    use config::{Environment, File, FileFormat, Map};

    use super::*;

    fn from_json(raw: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Json))
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn lookups_ignore_case() {
        let settings = Settings::new().with("AISettings:DeploymentName", "gpt-x").unwrap();

        assert_eq!(settings.get("aisettings:deploymentname").as_deref(), Some("gpt-x"));
        assert_eq!(settings.section("AISETTINGS").get("DeploymentName").as_deref(), Some("gpt-x"));
    }

    #[test]
    fn reads_nested_json_sections() {
        let settings = from_json(
            r#"{
                "AISettings": { "AzureOpenAIEndpoint": "https://example.test", "Retries": 3 },
                "ConnectionStrings": { "ReportsDataConnectionString": "Data Source=test.db" }
            }"#,
        );

        assert_eq!(settings.get("AISettings:AzureOpenAIEndpoint").as_deref(), Some("https://example.test"));
        assert_eq!(settings.get("AISettings:Retries").as_deref(), Some("3"));
        assert_eq!(
            settings.get("ConnectionStrings:ReportsDataConnectionString").as_deref(),
            Some("Data Source=test.db")
        );
        assert_eq!(settings.get("AISettings"), None);
    }

    #[test]
    fn environment_layer_overrides_files() {
        let vars: Map<String, String> = [("AISettings__AzureOpenAIKey".to_string(), "from-env".to_string())]
            .into_iter()
            .collect();

        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                r#"{ "AISettings": { "AzureOpenAIKey": "from-file", "DeploymentName": "gpt-x" } }"#,
                FileFormat::Json,
            ))
            .add_source(Environment::default().separator("__").source(Some(vars)))
            .build()
            .unwrap()
            .into();

        assert_eq!(settings.get("AISettings:AzureOpenAIKey").as_deref(), Some("from-env"));
        assert_eq!(settings.get("AISettings:DeploymentName").as_deref(), Some("gpt-x"));
    }

    #[test]
    fn overrides_win_over_loaded_values() {
        let settings = from_json(r#"{ "Server": { "Port": 3000 } }"#).with("Server:Port", "8080").unwrap();

        assert_eq!(settings.get("Server:Port").as_deref(), Some("8080"));
    }

    #[test]
    fn require_rejects_blank_values() {
        let settings = Settings::new().with("AISettings:AzureOpenAIKey", "   ").unwrap();

        assert_eq!(
            settings.section("AISettings").require("AzureOpenAIKey"),
            Err(ConfigurationError::Missing("AISettings:AzureOpenAIKey".into()))
        );
    }

    #[test]
    fn malformed_json_is_a_source_error() {
        let err = Config::builder()
            .add_source(File::from_str("{ nope", FileFormat::Json))
            .build()
            .unwrap_err();

        assert!(matches!(ConfigurationError::from(err), ConfigurationError::Source { .. }));
    }
}
