use clap::Subcommand;

/// Account commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create an account.
    Create {
        /// Login name.
        username: String,
        /// Grant staff access.
        #[arg(long)]
        staff: bool,
        /// Password; read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Set a new password and sign the account out everywhere.
    Passwd {
        /// Login name.
        username: String,
        /// Password; read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
}
