//! Application configuration loaded from `config.toml` and the environment.
//!
//! Every section is optional in the file; missing values fall back to defaults.
//! `DATABASE_URL` and `BIND_ADDRESS` override the file when set.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Storage settings
    pub database: DatabaseConfig,
    /// Ledger validation and listing limits
    pub ledger: LedgerConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8080`
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SeaORM connection URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: super::database::DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Ledger validation and listing limits
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Sanity ceiling for `amount` and `demand`
    pub max_amount: f64,
    /// Longest accepted description, in characters
    pub max_description_length: usize,
    /// Page size when the request does not give one
    pub default_page_limit: u64,
    /// Largest page size a request may ask for
    pub max_page_limit: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_amount: 1_000_000_000_000.0,
            max_description_length: 500,
            default_page_limit: 10,
            max_page_limit: 100,
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config.toml: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.ledger.max_amount.is_finite() || self.ledger.max_amount <= 0.0 {
            return Err(Error::Config {
                message: format!(
                    "ledger.max_amount must be a positive number, got {}",
                    self.ledger.max_amount
                ),
            });
        }
        if self.ledger.default_page_limit == 0
            || self.ledger.default_page_limit > self.ledger.max_page_limit
        {
            return Err(Error::Config {
                message: format!(
                    "ledger.default_page_limit must be between 1 and max_page_limit ({})",
                    self.ledger.max_page_limit
                ),
            });
        }
        Ok(())
    }

    /// Applies `DATABASE_URL` and `BIND_ADDRESS` from the environment.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(address) = std::env::var("BIND_ADDRESS") {
            self.server.bind_address = address;
        }
        self
    }
}

/// Loads configuration from a TOML file. A missing file yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("No configuration file at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    tracing::debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    AppConfig::from_toml_str(&contents)
}

/// Loads the application configuration from `LEDGER_CONFIG` (or `./config.toml`)
/// and applies environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path =
        std::env::var("LEDGER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&path)?.with_env_overrides();
    tracing::info!(
        "Configuration loaded (bind address {}, max amount {})",
        config.server.bind_address,
        config.ledger.max_amount
    );
    Ok(config)
}
