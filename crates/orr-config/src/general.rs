//! Page sizes for public listings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_page_size_projects() -> u64 {
    6
}

const fn default_page_size_blog() -> u64 {
    6
}

const fn default_page_size_gallery() -> u64 {
    12
}

const fn default_page_size_observations() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    #[serde(default = "default_page_size_projects")]
    pub page_size_projects: u64,

    #[serde(default = "default_page_size_blog")]
    pub page_size_blog: u64,

    #[serde(default = "default_page_size_gallery")]
    pub page_size_gallery: u64,

    #[serde(default = "default_page_size_observations")]
    pub page_size_observations: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            page_size_projects: default_page_size_projects(),
            page_size_blog: default_page_size_blog(),
            page_size_gallery: default_page_size_gallery(),
            page_size_observations: default_page_size_observations(),
        }
    }
}

impl GeneralConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for any zero page size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("general.page_size_projects", self.page_size_projects),
            ("general.page_size_blog", self.page_size_blog),
            ("general.page_size_gallery", self.page_size_gallery),
            ("general.page_size_observations", self.page_size_observations),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        Ok(())
    }
}
