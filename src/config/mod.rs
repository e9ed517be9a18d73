//! Configuration management for the concierge gateway

pub mod file;

use std::path::PathBuf;

use crate::Result;
use crate::concierge::{CustomRule, HotelProfile};
use file::ConciergeConfigFile;

/// Default API server port
pub const DEFAULT_PORT: u16 = 8787;

/// Concierge gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to data directory (database)
    pub data_dir: PathBuf,

    /// HTTP API server configuration
    pub api_server: ApiServerConfig,

    /// Hotel facts used in replies
    pub hotel: HotelProfile,

    /// Operator-defined rules checked before the built-in set
    pub custom_rules: Vec<CustomRule>,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// API key for admin endpoints (from `CONCIERGE_API_KEY` env)
    pub api_key: Option<String>,

    /// Path to static files directory (browser front-end)
    pub static_dir: Option<PathBuf>,

    /// Global requests-per-minute budget; `None` disables limiting
    pub rate_limit_per_minute: Option<u32>,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            static_dir: None,
            rate_limit_per_minute: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment and the optional TOML file
    ///
    /// # Errors
    ///
    /// Returns error if an explicitly named config file cannot be loaded
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file()?;
        Ok(Self::resolve(fc, |key| std::env::var(key).ok()))
    }

    /// Merge sources with priority env > toml > default
    #[must_use]
    pub fn resolve(fc: ConciergeConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ApiServerConfig::default();

        let api_server = ApiServerConfig {
            host: env("CONCIERGE_HOST")
                .or(fc.server.host)
                .unwrap_or(defaults.host),
            port: env("CONCIERGE_PORT")
                .or_else(|| env("PORT"))
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(defaults.port),
            api_key: env("CONCIERGE_API_KEY").filter(|k| !k.is_empty()),
            static_dir: env("CONCIERGE_STATIC_DIR")
                .or(fc.server.static_dir)
                .map(PathBuf::from),
            rate_limit_per_minute: env("CONCIERGE_RATE_LIMIT")
                .and_then(|s| s.parse().ok())
                .or(fc.server.rate_limit_per_minute)
                .filter(|rpm| *rpm > 0),
        };

        // Data directory (~/.local/share/concierge on Linux)
        let data_dir = env("CONCIERGE_DATA_DIR")
            .or(fc.storage.data_dir)
            .map_or_else(default_data_dir, PathBuf::from);

        let mut hotel = fc.hotel.unwrap_or_default();
        if let Some(name) = env("CONCIERGE_HOTEL_NAME") {
            hotel.name = name;
        }

        Self {
            data_dir,
            api_server,
            hotel,
            custom_rules: fc.rules,
        }
    }

    /// Path of the `SQLite` conversation log
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("concierge.db")
    }
}

/// Default data directory: `~/.local/share/concierge`
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map_or_else(|| PathBuf::from("."), |d| d.data_dir().join("concierge"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use file::{ServerFileConfig, StorageFileConfig};

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(ConciergeConfigFile::default(), env_from(&[]));

        assert_eq!(config.api_server.port, DEFAULT_PORT);
        assert_eq!(config.api_server.host, "0.0.0.0");
        assert!(config.api_server.api_key.is_none());
        assert!(config.api_server.rate_limit_per_minute.is_none());
        assert_eq!(config.hotel, HotelProfile::default());
        assert!(config.db_path().ends_with("concierge.db"));
    }

    #[test]
    fn test_env_overrides_file() {
        let fc = ConciergeConfigFile {
            server: ServerFileConfig {
                port: Some(9000),
                rate_limit_per_minute: Some(10),
                ..ServerFileConfig::default()
            },
            storage: StorageFileConfig {
                data_dir: Some("/from/file".to_string()),
            },
            ..ConciergeConfigFile::default()
        };

        let config = Config::resolve(
            fc,
            env_from(&[
                ("CONCIERGE_PORT", "9100"),
                ("CONCIERGE_DATA_DIR", "/from/env"),
                ("CONCIERGE_HOTEL_NAME", "Harbor House"),
            ]),
        );

        assert_eq!(config.api_server.port, 9100);
        assert_eq!(config.api_server.rate_limit_per_minute, Some(10));
        assert_eq!(config.data_dir, PathBuf::from("/from/env"));
        assert_eq!(config.db_path(), PathBuf::from("/from/env/concierge.db"));
        assert_eq!(config.hotel.name, "Harbor House");
    }

    #[test]
    fn test_generic_port_fallback() {
        let config = Config::resolve(ConciergeConfigFile::default(), env_from(&[("PORT", "3000")]));
        assert_eq!(config.api_server.port, 3000);
    }

    #[test]
    fn test_unparseable_port_falls_through() {
        let fc = ConciergeConfigFile {
            server: ServerFileConfig {
                port: Some(9000),
                ..ServerFileConfig::default()
            },
            ..ConciergeConfigFile::default()
        };
        let config = Config::resolve(fc, env_from(&[("CONCIERGE_PORT", "not-a-port")]));
        assert_eq!(config.api_server.port, 9000);
    }

    #[test]
    fn test_zero_rate_limit_disables() {
        let config = Config::resolve(
            ConciergeConfigFile::default(),
            env_from(&[("CONCIERGE_RATE_LIMIT", "0"), ("CONCIERGE_API_KEY", "")]),
        );
        assert!(config.api_server.rate_limit_per_minute.is_none());
        assert!(config.api_server.api_key.is_none());
    }
}
