use std::path::PathBuf;

/// Loads `.env` into the process environment. Runs before tracing exists, so
/// the outcome is returned for the caller to log.
pub fn init_env() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
