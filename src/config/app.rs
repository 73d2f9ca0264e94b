use std::path::{Path, PathBuf};

use docview_core::{ConfigSection, ConfigurationError, Section, Settings};
use url::Url;

use super::{resolve_connection_string, Environment};

pub const DEFAULT_PORT: u16 = 3000;
pub const CONNECTION_STRING_KEY: &str = "ConnectionStrings:ReportsDataConnectionString";

const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Chat/completion endpoint settings, section `AISettings`.
#[derive(Clone)]
pub struct AiSettings {
    pub endpoint: Url,
    pub key: String,
    pub deployment_name: String,
    pub api_version: String,
}

impl ConfigSection for AiSettings {
    const SECTION: &'static str = "AISettings";

    fn from_section(section: Section<'_>) -> Result<Self, ConfigurationError> {
        let raw_endpoint = section.require("AzureOpenAIEndpoint")?;
        let key = section.require("AzureOpenAIKey")?;
        let deployment_name = section.require("DeploymentName")?;

        let endpoint = Url::parse(&raw_endpoint).map_err(|err| ConfigurationError::Invalid {
            key: section.key("AzureOpenAIEndpoint"),
            reason: err.to_string(),
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigurationError::Invalid {
                key: section.key("AzureOpenAIEndpoint"),
                reason: format!("unsupported scheme `{}`", endpoint.scheme()),
            });
        }

        let api_version = section
            .get("ApiVersion")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Ok(AiSettings {
            endpoint,
            key,
            deployment_name,
            api_version,
        })
    }
}

impl std::fmt::Debug for AiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiSettings")
            .field("endpoint", &self.endpoint.as_str())
            .field("key", &"<redacted>")
            .field("deployment_name", &self.deployment_name)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Everything the host reads at startup. Built once, never mutated.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub https_port: Option<u16>,
    pub content_root: PathBuf,
    pub ai: AiSettings,
    /// Connection string as configured.
    pub connection_string: String,
    /// `connection_string` translated into a driver URL.
    pub database_url: String,
}

impl AppConfig {
    pub fn from_settings(settings: &Settings, content_root: impl Into<PathBuf>) -> Result<Self, ConfigurationError> {
        let content_root = content_root.into();
        let environment = Environment::from_settings(settings);

        let ai = AiSettings::load(settings)?;
        let connection_string = settings.require(CONNECTION_STRING_KEY)?;
        let database_url = resolve_connection_string(&connection_string, &content_root)?;

        let port = match settings.get("Server:Port").or_else(|| settings.get("SERVER_PORT")) {
            Some(raw) => parse_port("Server:Port", &raw)?,
            None => {
                tracing::warn!("cannot read `Server:Port` defaulting to `{}`", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let https_port = settings
            .get("Server:HttpsPort")
            .map(|raw| parse_port("Server:HttpsPort", &raw))
            .transpose()?;

        Ok(AppConfig {
            environment,
            port,
            https_port,
            content_root,
            ai,
            connection_string,
            database_url,
        })
    }

    /// Directory published to downstream code as the data directory.
    pub fn data_directory(&self) -> &Path {
        &self.content_root
    }

    pub fn web_root(&self) -> PathBuf {
        self.content_root.join("wwwroot")
    }
}

fn parse_port(key: &str, raw: &str) -> Result<u16, ConfigurationError> {
    raw.trim().parse().map_err(|err: std::num::ParseIntError| ConfigurationError::Invalid {
        key: key.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        Settings::from_pairs([
            ("AISettings:AzureOpenAIEndpoint", "https://example.test"),
            ("AISettings:AzureOpenAIKey", "abc"),
            ("AISettings:DeploymentName", "gpt-x"),
            (CONNECTION_STRING_KEY, "Data Source=test.db"),
        ])
        .unwrap()
    }

    #[test]
    fn parses_a_complete_configuration() {
        let config = AppConfig::from_settings(&valid_settings(), "/srv/docview").unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.https_port, None);
        assert_eq!(config.ai.endpoint.as_str(), "https://example.test/");
        assert_eq!(config.ai.key, "abc");
        assert_eq!(config.ai.deployment_name, "gpt-x");
        assert_eq!(config.ai.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.database_url, "sqlite:///srv/docview/test.db?mode=rwc");
        assert_eq!(config.data_directory(), Path::new("/srv/docview"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let settings = valid_settings().with("AISettings:AzureOpenAIKey", "").unwrap();

        assert_eq!(
            AppConfig::from_settings(&settings, "/srv").unwrap_err(),
            ConfigurationError::Missing("AISettings:AzureOpenAIKey".into())
        );
    }

    #[test]
    fn each_required_field_is_checked() {
        for key in [
            "AISettings:AzureOpenAIEndpoint",
            "AISettings:AzureOpenAIKey",
            "AISettings:DeploymentName",
            CONNECTION_STRING_KEY,
        ] {
            let settings = valid_settings().with(key, " ").unwrap();
            let err = AppConfig::from_settings(&settings, "/srv").unwrap_err();

            assert_eq!(err, ConfigurationError::Missing(key.to_string()), "{key}");
        }
    }

    #[test]
    fn endpoint_must_be_an_http_url() {
        let settings = valid_settings().with("AISettings:AzureOpenAIEndpoint", "not a url").unwrap();
        assert!(matches!(
            AppConfig::from_settings(&settings, "/srv"),
            Err(ConfigurationError::Invalid { key, .. }) if key == "AISettings:AzureOpenAIEndpoint"
        ));

        let settings = valid_settings().with("AISettings:AzureOpenAIEndpoint", "ftp://example.test").unwrap();
        assert!(matches!(
            AppConfig::from_settings(&settings, "/srv"),
            Err(ConfigurationError::Invalid { .. })
        ));
    }

    #[test]
    fn ports_are_parsed() {
        let settings = valid_settings()
            .with("SERVER_PORT", "8080")
            .and_then(|settings| settings.with("Server:HttpsPort", "8443"))
            .unwrap();
        let config = AppConfig::from_settings(&settings, "/srv").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.https_port, Some(8443));

        let settings = valid_settings().with("Server:Port", "eighty").unwrap();
        assert!(matches!(
            AppConfig::from_settings(&settings, "/srv"),
            Err(ConfigurationError::Invalid { key, .. }) if key == "Server:Port"
        ));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = AppConfig::from_settings(&valid_settings(), "/srv").unwrap();
        let rendered = format!("{:?}", config.ai);

        assert!(rendered.contains("gpt-x"));
        assert!(!rendered.contains("abc"));
    }
}
