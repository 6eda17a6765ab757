//! Configuration types.

use std::path::PathBuf;

use crate::error::{ConfigError, DatabaseError};
use crate::store::LibSqlBackend;

/// Default on-disk location of the onboarding database.
pub const DEFAULT_DB_PATH: &str = "./data/resto-onboard.db";

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the libSQL database file.
    pub db_path: PathBuf,
    /// Use a throwaway in-memory database instead of `db_path`.
    pub in_memory: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            in_memory: false,
        }
    }
}

impl StoreConfig {
    /// Build config from environment variables.
    ///
    /// - `RESTO_ONBOARD_DB_PATH`: database file (default `./data/resto-onboard.db`)
    /// - `RESTO_ONBOARD_IN_MEMORY`: `1`/`true`/`yes` for an in-memory database
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = std::env::var("RESTO_ONBOARD_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        let in_memory = match std::env::var("RESTO_ONBOARD_IN_MEMORY") {
            Ok(raw) => parse_flag("RESTO_ONBOARD_IN_MEMORY", &raw)?,
            Err(_) => false,
        };

        Ok(Self { db_path, in_memory })
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean flag, got {other:?}"),
        }),
    }
}

/// Open the database described by `config`.
pub async fn open_database(config: &StoreConfig) -> Result<LibSqlBackend, DatabaseError> {
    if config.in_memory {
        LibSqlBackend::new_memory().await
    } else {
        LibSqlBackend::new_local(&config.db_path).await
    }
}
