use orr_config::OrreryConfig;

use crate::cli::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, config: &OrreryConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => commands::serve::handle(&args, config).await,
        Commands::User { action } => commands::user::handle(&action, config).await,
        Commands::Template { action } => commands::template::handle(&action, config).await,
    }
}
