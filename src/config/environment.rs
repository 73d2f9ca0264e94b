use docview_core::Settings;

/// Hosting environment. Anything that is not explicitly a development
/// environment is treated as production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            _ => Self::Production,
        }
    }

    /// Reads `Environment`, falling back to `APP_ENV`.
    pub fn from_settings(settings: &Settings) -> Self {
        settings
            .get("Environment")
            .or_else(|| settings.get("APP_ENV"))
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Production => "Production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
