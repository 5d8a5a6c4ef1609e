//! Configuration loading and resolution
//!
//! Settings resolve through a fixed priority order: command-line argument,
//! then environment variable, then TOML config file, then compiled default.
//! The Gemini API key has no compiled default and resolution fails with a
//! configuration error naming every way to supply it.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default listen port for the service
pub const DEFAULT_PORT: u16 = 5050;

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "PULSE_DATA_DIR";

/// Environment variable naming the listen port
pub const PORT_ENV: &str = "PULSE_PORT";

/// Environment variable carrying the Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// On-disk TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub data_dir: Option<String>,
    pub port: Option<u16>,
    pub gemini_api_key: Option<String>,
}

/// Platform config file location (~/.config/reviewpulse/config.toml on Linux)
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reviewpulse").join("config.toml"))
}

/// Load the TOML config file, falling back to defaults when absent or unreadable
pub fn load_toml_config() -> TomlConfig {
    let Some(path) = config_file_path() else {
        return TomlConfig::default();
    };

    if !path.exists() {
        debug!("No config file at {}", path.display());
        return TomlConfig::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring malformed config file {}: {}", path.display(), e);
                TomlConfig::default()
            }
        },
        Err(e) => {
            warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Resolve the data directory: CLI argument, environment, TOML, platform default
pub fn resolve_data_dir(cli_arg: Option<&str>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.data_dir {
        return PathBuf::from(path);
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reviewpulse")
}

/// Resolve the listen port: CLI argument, environment, TOML, compiled default
pub fn resolve_port(cli_arg: Option<u16>, toml_config: &TomlConfig) -> u16 {
    if let Some(port) = cli_arg {
        return port;
    }

    if let Ok(value) = std::env::var(PORT_ENV) {
        match value.parse::<u16>() {
            Ok(port) => return port,
            Err(_) => warn!("Ignoring non-numeric {}: {}", PORT_ENV, value),
        }
    }

    toml_config.port.unwrap_or(DEFAULT_PORT)
}

/// Resolve the Gemini API key from ENV → TOML priority
///
/// Warns when the key is present in multiple sources, then uses the
/// highest-priority one.
pub fn resolve_gemini_api_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(GEMINI_API_KEY_ENV)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .gemini_api_key
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Gemini API key found in both environment and TOML config. \
             Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Gemini API key loaded from environment variable");
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("Gemini API key loaded from TOML config");
        return Ok(key);
    }

    Err(Error::Config(format!(
        "Gemini API key not configured. Please configure using one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: ~/.config/reviewpulse/config.toml (gemini_api_key = \"your-key\")\n\
         \n\
         Obtain API key at: https://aistudio.google.com/apikey",
        GEMINI_API_KEY_ENV
    )))
}

/// Validate an API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Create the data directory if it does not exist yet
pub fn ensure_data_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Database file location inside the data directory
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("reviewpulse.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_cli_arg_wins_data_dir() {
        let toml_config = TomlConfig {
            data_dir: Some("/from/toml".to_string()),
            ..Default::default()
        };
        let resolved = resolve_data_dir(Some("/from/cli"), &toml_config);
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_toml_port_used_when_no_cli() {
        let toml_config = TomlConfig {
            port: Some(6123),
            ..Default::default()
        };
        assert_eq!(resolve_port(None, &toml_config), 6123);
        assert_eq!(resolve_port(Some(7000), &toml_config), 7000);
    }

    #[test]
    fn test_database_path() {
        let path = database_path(Path::new("/tmp/rp"));
        assert_eq!(path, PathBuf::from("/tmp/rp/reviewpulse.db"));
    }
}
