use std::sync::Arc;

use orr_config::OrreryConfig;
use orr_db::service::OrrService;

/// Shared by every handler; cloning only bumps the reference counts.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrrService>,
    pub config: Arc<OrreryConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(service: OrrService, config: OrreryConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}
