//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use paginate_core::config::Settings;
use paginate_core::error::PaginateError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    settings: &Settings,
    format: OutputFormat,
) -> Result<(), PaginateError> {
    match &args.command {
        ConfigCommand::Show => output::print_item(settings, format),
    }
    Ok(())
}
