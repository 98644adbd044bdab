//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, database path,
//! listing limits and log level, then applies environment overrides.

use ifta_service::ListingConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// An environment override could not be parsed
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// A setting is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (default: 5000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// SQLite database file, or `:memory:`
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Directory of static pages served for unmatched paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Public listing limits
    #[serde(default)]
    pub listing: ListingConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "ifta_server=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

/// Default port: 5000
fn default_bind_port() -> u16 {
    5000
}

fn default_database_path() -> String {
    "darul-ifta.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            database_path: default_database_path(),
            static_dir: None,
            listing: ListingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    ///
    /// Recognized variables: `IFTA_BIND_ADDRESS`, `PORT`, `IFTA_DATABASE_PATH`,
    /// `IFTA_STATIC_DIR`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("IFTA_BIND_ADDRESS") {
            self.bind_address = address;
        }
        if let Some(port) = lookup("PORT") {
            self.bind_port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(path) = lookup("IFTA_DATABASE_PATH") {
            self.database_path = path;
        }
        if let Some(dir) = lookup("IFTA_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        self.validate()?;
        Ok(self)
    }

    /// Check settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_port == 0 {
            return Err(ConfigError::Invalid("bind_port must be non-zero".to_string()));
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::Invalid("database_path must not be empty".to_string()));
        }
        if self.listing.recent_limit > self.listing.max_limit {
            return Err(ConfigError::Invalid(format!(
                "listing.recent_limit ({}) exceeds listing.max_limit ({})",
                self.listing.recent_limit, self.listing.max_limit
            )));
        }
        Ok(())
    }

    /// Create a default configuration for testing (in-memory database)
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            ..Default::default()
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
