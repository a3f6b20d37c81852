//! # Configuration
//!
//! Runtime settings for the financing engine.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `financing.toml` in the working directory (optional)
//! 3. `FINANCING_*` environment variables, after loading `.env`
//!
//! ```text
//! FINANCING_BATCH_SIZE=500
//! FINANCING_DATABASE_URL=postgres://localhost/financing
//! FINANCING_MAX_CONNECTIONS=5
//! FINANCING_LOG_FORMAT=json
//! ```

use crate::application::services::{DEFAULT_BATCH_SIZE, FinancingRunConfig};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(String),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingConfig {
    /// Financed invoices between flush/clear cycles.
    pub batch_size: usize,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Pool size for PostgreSQL.
    pub max_connections: u32,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for FinancingConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            database_url: None,
            max_connections: 10,
            log_format: LogFormat::Pretty,
        }
    }
}

impl FinancingConfig {
    /// Loads `.env`, `financing.toml` and `FINANCING_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source is malformed and
    /// `ConfigError::Invalid` if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }

        Self::build(
            Config::builder()
                .add_source(File::with_name("financing").required(false))
                .add_source(Environment::with_prefix("FINANCING").try_parsing(true)),
        )
    }

    /// Parses configuration from TOML text, over the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a zero batch size or pool size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be positive".into()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Returns the database URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if none is configured.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("database_url is not set".into()))
    }

    /// Returns the run settings derived from this configuration.
    #[must_use]
    pub fn run_config(&self) -> FinancingRunConfig {
        FinancingRunConfig::with_batch_size(self.batch_size)
    }
}
