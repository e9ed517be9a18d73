//! TOML configuration file loading
//!
//! Supports `~/.config/concierge/config.toml` (or `$CONCIERGE_CONFIG`) as a
//! persistent config source. All fields are optional; the file is a partial
//! overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::concierge::{CustomRule, HotelProfile};
use crate::{Error, Result};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConciergeConfigFile {
    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Where the conversation log lives
    #[serde(default)]
    pub storage: StorageFileConfig,

    /// Hotel facts; unspecified fields keep their defaults
    #[serde(default)]
    pub hotel: Option<HotelProfile>,

    /// Extra keyword rules, checked before the built-in set
    #[serde(default)]
    pub rules: Vec<CustomRule>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Address to bind
    pub host: Option<String>,

    /// API server port
    pub port: Option<u16>,

    /// Directory with the browser front-end
    pub static_dir: Option<String>,

    /// Global request budget per minute
    pub rate_limit_per_minute: Option<u32>,
}

/// Storage configuration
#[derive(Debug, Default, Deserialize)]
pub struct StorageFileConfig {
    /// Data directory holding `concierge.db`
    pub data_dir: Option<String>,
}

/// Parse a config file at a known path
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML
pub fn parse_config_file(path: &Path) -> Result<ConciergeConfigFile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    let config = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Load the TOML config file
///
/// An explicit `$CONCIERGE_CONFIG` path must exist and parse. The standard
/// path is optional: a missing or broken file falls back to defaults.
///
/// # Errors
///
/// Returns error if `$CONCIERGE_CONFIG` points to an unreadable or invalid file
pub fn load_config_file() -> Result<ConciergeConfigFile> {
    if let Ok(explicit) = std::env::var("CONCIERGE_CONFIG") {
        return parse_config_file(Path::new(&explicit));
    }

    let Some(path) = config_file_path() else {
        return Ok(ConciergeConfigFile::default());
    };

    if !path.exists() {
        return Ok(ConciergeConfigFile::default());
    }

    match parse_config_file(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            Ok(ConciergeConfigFile::default())
        }
    }
}

/// Return the config file path: `~/.config/concierge/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("concierge").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088
rate_limit_per_minute = 30

[storage]
data_dir = "/var/lib/concierge"

[hotel]
name = "Seaside Inn"
wifi_network = "Seaside-Guest"

[[rules]]
intent = "shuttle"
pattern = "\\bshuttle\\b"
replies = ["The shuttle leaves hourly."]
"#
        )
        .unwrap();

        let config = parse_config_file(file.path()).unwrap();
        assert_eq!(config.server.port, Some(8088));
        assert_eq!(config.server.rate_limit_per_minute, Some(30));
        assert_eq!(config.storage.data_dir.as_deref(), Some("/var/lib/concierge"));

        let hotel = config.hotel.unwrap();
        assert_eq!(hotel.name, "Seaside Inn");
        assert_eq!(hotel.check_out, "11 AM");

        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].intent, "shuttle");
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = parse_config_file(file.path()).unwrap();

        assert!(config.server.port.is_none());
        assert!(config.hotel.is_none());
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        assert!(matches!(parse_config_file(file.path()), Err(Error::Toml(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = parse_config_file(Path::new("/nonexistent/concierge.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
