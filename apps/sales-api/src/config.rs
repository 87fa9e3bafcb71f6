//! Sales API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable             | Default           |
//! |----------------------|-------------------|
//! | `SALES_API_HOST`     | `0.0.0.0`         |
//! | `SALES_API_PORT`     | `8080`            |
//! | `DATABASE_PATH`      | `./salesdesk.db`  |
//! | `DB_MAX_CONNECTIONS` | `5`               |
//! | `LOG_FORMAT`         | `pretty`          |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use salesdesk_db::DbConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
        }
    }
}

/// Sales API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: IpAddr,

    /// HTTP port
    pub port: u16,

    /// SQLite file path, or `:memory:`
    pub database_path: String,

    /// Upper bound of the connection pool
    pub db_max_connections: u32,

    pub log_format: LogFormat,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            host: var("SALES_API_HOST", "0.0.0.0")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SALES_API_HOST".to_string()))?,

            port: var("SALES_API_PORT", "8080")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SALES_API_PORT".to_string()))?,

            database_path: var("DATABASE_PATH", "./salesdesk.db"),

            db_max_connections: var("DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            log_format: var("LOG_FORMAT", "pretty").parse()?,
        };

        if config.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("DATABASE_PATH".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.database_path, "./salesdesk.db");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SALES_API_HOST", "127.0.0.1"),
            ("SALES_API_PORT", "9000"),
            ("DATABASE_PATH", ":memory:"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.db_config().is_in_memory());
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        assert!(matches!(
            load(&[("SALES_API_PORT", "eighty")]),
            Err(ConfigError::InvalidValue(ref v)) if v == "SALES_API_PORT"
        ));
        assert!(load(&[("SALES_API_HOST", "not-an-ip")]).is_err());
        assert!(load(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("LOG_FORMAT", "xml")]).is_err());
        assert!(matches!(
            load(&[("DATABASE_PATH", " ")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }
}
