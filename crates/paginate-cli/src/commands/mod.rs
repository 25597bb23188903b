//! CLI command definitions and dispatch.

pub mod config;
pub mod dump;
pub mod page;
pub mod sql;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use paginate_core::config::Settings;
use paginate_core::error::PaginateError;
use paginate_database::DatabasePool;

/// paginate: page through SQLite tables and queries
#[derive(Debug, Parser)]
#[command(name = "paginate", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Database URL, overriding the configuration
    #[arg(long)]
    pub database: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one page of a table
    Page(page::PageArgs),
    /// Show one page of a raw SQL query
    Sql(sql::SqlArgs),
    /// Print every row of a table, fetched page by page
    Dump(dump::DumpArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, settings: &Settings) -> Result<(), PaginateError> {
        let mut settings = settings.clone();
        if let Some(url) = &self.database {
            settings.database.url = url.clone();
        }

        match &self.command {
            Commands::Page(args) => page::execute(args, &settings, self.format).await,
            Commands::Sql(args) => sql::execute(args, &settings, self.format).await,
            Commands::Dump(args) => dump::execute(args, &settings, self.format).await,
            Commands::Config(args) => config::execute(args, &settings, self.format).await,
        }
    }
}

/// Helper: create database pool from settings
pub async fn create_db_pool(settings: &Settings) -> Result<DatabasePool, PaginateError> {
    DatabasePool::connect(&settings.database).await
}
