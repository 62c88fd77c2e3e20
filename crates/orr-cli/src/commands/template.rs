use orr_config::OrreryConfig;
use serde::Serialize;

use crate::cli::subcommands::TemplateCommands;
use crate::output::output;

#[derive(Serialize)]
struct SeedResponse {
    created: bool,
    template: orr_core::entities::ResearchTemplate,
}

/// Handle `orrery template <subcommand>`.
pub async fn handle(action: &TemplateCommands, config: &OrreryConfig) -> anyhow::Result<()> {
    match action {
        TemplateCommands::Seed => {
            let service = super::open_service(config).await?;
            let (template, created) = service.seed_jupiter_template().await?;
            output(&SeedResponse { created, template })
        }
    }
}
