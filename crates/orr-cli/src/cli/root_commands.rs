use clap::{Args, Subcommand};

use crate::cli::subcommands::{TemplateCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the web server.
    Serve(ServeArgs),
    /// Manage accounts.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Astronomy research templates.
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding `server.bind`.
    #[arg(long)]
    pub bind: Option<String>,
}
