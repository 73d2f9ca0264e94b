use std::path::Path;

use docview_core::ConfigurationError;

use super::CONNECTION_STRING_KEY;

/// Placeholder replaced by the data directory (the content root).
pub const DATA_DIRECTORY_TOKEN: &str = "|DataDirectory|";

const MEMORY: &str = ":memory:";

/// Turns the configured connection string into a sea-orm database URL.
///
/// Driver URLs (`sqlite:`, `postgres://`, `postgresql://`) pass through with
/// only the data directory token expanded. Key/value strings such as
/// `Data Source=reports.db;Cache=Shared` name a sqlite file; relative paths
/// resolve against `data_directory`.
pub fn resolve_connection_string(raw: &str, data_directory: &Path) -> Result<String, ConfigurationError> {
    let raw = raw.trim();
    let lowered = raw.to_ascii_lowercase();

    if lowered.starts_with("sqlite:") || lowered.starts_with("postgres://") || lowered.starts_with("postgresql://") {
        return Ok(raw.replace(DATA_DIRECTORY_TOKEN, &data_directory.to_string_lossy()));
    }

    let source = raw
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| {
            matches!(
                key.trim().to_ascii_lowercase().as_str(),
                "data source" | "datasource" | "filename"
            )
        })
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigurationError::Invalid {
            key: CONNECTION_STRING_KEY.to_string(),
            reason: "expected a database URL or a `Data Source=<file>` connection string".into(),
        })?;

    if source.eq_ignore_ascii_case(MEMORY) {
        return Ok("sqlite::memory:".to_string());
    }

    let path = match source.strip_prefix(DATA_DIRECTORY_TOKEN) {
        Some(rest) => data_directory.join(rest.trim_start_matches(['/', '\\'])),
        None => data_directory.join(source),
    };

    Ok(format!("sqlite://{}?mode=rwc", path.display()))
}
