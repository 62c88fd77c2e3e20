pub mod dispatch;
pub mod serve;
pub mod template;
pub mod user;

use anyhow::Context;
use orr_config::OrreryConfig;
use orr_db::service::OrrService;

/// Open the configured database, applying migrations.
pub async fn open_service(config: &OrreryConfig) -> anyhow::Result<OrrService> {
    OrrService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))
}
