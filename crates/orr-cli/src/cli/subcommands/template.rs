use clap::Subcommand;

/// Research template commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TemplateCommands {
    /// Create the built-in Jupiter moons template if it is missing.
    Seed,
}
