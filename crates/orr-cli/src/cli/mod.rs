use clap::Parser;

pub mod root_commands;
pub mod subcommands;

pub use root_commands::Commands;

/// Top-level CLI parser for the `orrery` binary.
#[derive(Debug, Parser)]
#[command(
    name = "orrery",
    version,
    about = "Orrery - portfolio, blog, sky log and ledger"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}
