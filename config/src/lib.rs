//! # Configuration Management for Accessor
//!
//! This crate provides the configuration structures used to open the shared
//! database handle.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::DatabaseConfig;
//!
//! let db_config = DatabaseConfig::new(
//!     "pgsql".to_string(), "localhost".to_string(), "myapp".to_string(), 5432,
//!     "postgres".to_string(), "password".to_string(),
//! )
//! .with_option("sslmode", "disable");
//!
//! assert_eq!(db_config.dsn(), "pgsql:host=localhost;dbname=myapp;port=5432");
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! driver = "pgsql"
//! host = "localhost"
//! dbname = "myapp"
//! port = 5432
//! username = "postgres"
//! password = "password"
//! max_connections = 5
//! connect_timeout_seconds = 30
//!
//! [database.options]
//! sslmode = "disable"
//! application_name = "accessor"
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from accessor.toml (or the path in ACCESSOR_CONFIG)
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./accessor.toml";
const CONFIG_PATH_ENV: &str = "ACCESSOR_CONFIG";

/// Driver names accepted in the `driver` key. All of them select PostgreSQL.
const SUPPORTED_DRIVERS: &[&str] = &["pgsql", "postgres", "postgresql"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub driver: String,
    pub host: String,
    pub dbname: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Driver-specific options. `sslmode` and `application_name` are applied
    /// directly, anything else is sent as a server runtime parameter.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from TOML file specified in .env or defaults
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine, the variable may come from the process environment
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified as {} (environment or .env) or in {} file",
                CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.database.validate()?;
        Ok(config)
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    pub fn new(
        driver: String,
        host: String,
        dbname: String,
        port: u16,
        username: String,
        password: String,
    ) -> Self {
        Self {
            driver,
            host,
            dbname,
            port,
            username,
            password,
            options: BTreeMap::new(),
            max_connections: default_max_connections(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }

    /// Add a driver-specific option
    pub fn with_option(mut self, key: &str, value: &str) -> Self {
        self.options.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_seconds = seconds;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_DRIVERS.contains(&self.driver.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Unsupported database driver '{}': expected one of {}",
                self.driver,
                SUPPORTED_DRIVERS.join(", ")
            )));
        }
        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.dbname.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connect_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Data source name in `driver:host=H;dbname=D;port=P` form
    pub fn dsn(&self) -> String {
        format!(
            "{}:host={};dbname={};port={}",
            self.driver, self.host, self.dbname, self.port
        )
    }
}
