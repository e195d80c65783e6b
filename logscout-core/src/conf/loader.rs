use crate::conf::{ConfigError, ScoutConfig};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_HOSTNAME: &str = "LOGSCOUT_HOSTNAME";
pub const ENV_LOG_FILE: &str = "LOGSCOUT_LOG_FILE";

/// Reads `path` (a missing file means all defaults), applies environment
/// overrides and validates the result.
pub fn load_config(path: &Path) -> Result<ScoutConfig, ConfigError> {
    let mut config = if path.exists() {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        parse_config(path, &raw)?
    } else {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        ScoutConfig::default()
    };

    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

pub fn parse_config(path: &Path, raw: &str) -> Result<ScoutConfig, ConfigError> {
    toml::from_str(raw).map_err(|e| ConfigError::parse(path, e))
}

impl ScoutConfig {
    /// Environment wins over the file. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key| lookup(key).filter(|v: &String| !v.trim().is_empty());

        if let Some(hostname) = get(ENV_HOSTNAME) {
            self.locality.hostname = Some(hostname);
        }
        if let Some(file) = get(ENV_LOG_FILE) {
            self.logging.file = Some(PathBuf::from(file));
        }
    }
}
