//! # orr-config
//!
//! Layered configuration loading for Orrery using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ORRERY_*` prefix, `__` as separator)
//! 2. Project-level `./orrery.toml`
//! 3. User-level `~/.config/orrery/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ORRERY_SERVER__BIND` -> `server.bind`,
//! `ORRERY_AUTH__BCRYPT_COST` -> `auth.bcrypt_cost`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use orr_config::OrreryConfig;
//!
//! let config = OrreryConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind);
//! ```

mod auth;
mod database;
mod error;
mod general;
mod server;

pub use auth::{AuthConfig, BCRYPT_COST_RANGE};
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "orrery.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrreryConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl OrreryConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a source cannot be parsed or a value is
    /// out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the working directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("ORRERY_").split("__"))
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        self.auth.validate()?;
        self.general.validate()?;
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("orrery").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = OrreryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.path, "orrery.db");
    }

    #[test]
    fn figment_builds_without_files() {
        let config: OrreryConfig = OrreryConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.general.page_size_gallery, 12);
    }
}
