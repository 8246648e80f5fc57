//! Server configuration for finance-server
//!
//! Loads and parses finance-server.toml. Every section and field has a
//! default, so a partial file (or none at all) is usable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Server identification and bind address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfoConfig {
    /// Server name for identification
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: "finance-server".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file path
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "finance.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Projection cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a cached projection
    pub ttl_seconds: u64,
    /// How often expired entries are physically removed
    pub sweep_interval_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            sweep_interval_seconds: 300,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

/// Bounds applied to projection requests at the HTTP boundary
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionLimits {
    /// Most calendar years a single projection may cover
    pub max_year_span: u32,
    /// Most buildings a multi-building summary may name
    pub max_summary_buildings: usize,
}

impl Default for ProjectionLimits {
    fn default() -> Self {
        Self {
            max_year_span: 30,
            max_summary_buildings: condo_projection::DEFAULT_MAX_BUILDINGS,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerInfoConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub projection: ProjectionLimits,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ServerConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ServerConfigError::ReadError)?;
        Self::from_str(&content)
    }

    /// Load configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ServerConfigError> {
        let config: Self = toml::from_str(content).map_err(ServerConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or environment
    ///
    /// Searches for config in:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/finance-server.toml
    /// 3. ../config/finance-server.toml (for development)
    /// 4. ./finance-server.toml
    pub fn load() -> Result<Self, ServerConfigError> {
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Self::from_file(config_path);
        }

        let paths = [
            PathBuf::from("config/finance-server.toml"),
            PathBuf::from("../config/finance-server.toml"),
            PathBuf::from("./finance-server.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(ServerConfigError::InvalidConfig(
            "Configuration file not found. Set CONFIG_PATH or place finance-server.toml in config/".to_string(),
        ))
    }

    fn validate(&self) -> Result<(), ServerConfigError> {
        if self.cache.ttl_seconds == 0 {
            return Err(ServerConfigError::InvalidConfig("cache.ttl_seconds must be positive".into()));
        }
        if self.cache.sweep_interval_seconds == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "cache.sweep_interval_seconds must be positive".into(),
            ));
        }
        if self.projection.max_year_span == 0 || self.projection.max_summary_buildings == 0 {
            return Err(ServerConfigError::InvalidConfig("projection limits must be positive".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "database.max_connections must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Get database URL from configuration
    ///
    /// The file is created on first connect.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.database.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_parsing() {
        let toml_content = r#"
[server]
name = "finance-east"
port = 9090

[database]
path = "east.db"

[cache]
ttl_seconds = 600

[projection]
max_year_span = 10
"#;

        let config = ServerConfig::from_str(toml_content).unwrap();
        assert_eq!(config.server.name, "finance-east");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, "east.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.cache.ttl(), Duration::from_secs(600));
        assert_eq!(config.cache.sweep_interval_seconds, 300);
        assert_eq!(config.projection.max_year_span, 10);
        assert_eq!(config.projection.max_summary_buildings, 50);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServerConfig::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.projection.max_year_span, 30);
        assert_eq!(config.database_url(), "sqlite://finance.db?mode=rwc");
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let err = ServerConfig::from_str("[cache]\nttl_seconds = 0\n").unwrap_err();
        assert!(matches!(err, ServerConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = ServerConfig::from_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, ServerConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\npath = \"/var/lib/finance/finance.db\"\nmax_connections = 8").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database.path, "/var/lib/finance/finance.db");
        assert_eq!(config.database.max_connections, 8);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ServerConfigError::ReadError(_)));
    }
}
