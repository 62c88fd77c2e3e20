use anyhow::Context;
use orr_config::OrreryConfig;
use orr_web::AppState;

use crate::cli::root_commands::ServeArgs;

/// Handle `orrery serve`.
pub async fn handle(args: &ServeArgs, config: &OrreryConfig) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(bind) = &args.bind {
        config.server.bind.clone_from(bind);
    }
    let addr = config.server.socket_addr()?;

    let service = super::open_service(&config).await?;
    let state = AppState::new(service, config);
    orr_web::serve(addr, state)
        .await
        .with_context(|| format!("server on {addr} failed"))
}
