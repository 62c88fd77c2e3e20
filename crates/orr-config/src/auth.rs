//! Session and password-hashing settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Two weeks.
const fn default_session_ttl_hours() -> u64 {
    336
}

fn default_cookie_name() -> String {
    "orrery_session".to_string()
}

const fn default_bcrypt_cost() -> u32 {
    12
}

/// bcrypt accepts costs in this range.
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the session cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure_cookie: bool,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl AuthConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero TTL, an empty cookie
    /// name, or a bcrypt cost outside 4..=31.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ttl_hours == 0 {
            return Err(ConfigError::invalid(
                "auth.session_ttl_hours",
                "must be at least 1",
            ));
        }
        if self.cookie_name.trim().is_empty() {
            return Err(ConfigError::invalid("auth.cookie_name", "must not be empty"));
        }
        if !BCRYPT_COST_RANGE.contains(&self.bcrypt_cost) {
            return Err(ConfigError::invalid(
                "auth.bcrypt_cost",
                format!("{} is outside 4..=31", self.bcrypt_cost),
            ));
        }
        Ok(())
    }
}
