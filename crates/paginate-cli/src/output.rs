//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::builder::Builder;

use paginate_core::types::Collection;
use paginate_database::DynamicRecord;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print one page of records with its pagination footer
pub fn print_page(page: &Collection<DynamicRecord>, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            print_records(page.entries(), format);
            println!(
                "Page {} of {} ({} entries)",
                page.current_page(),
                page.total_pages().unwrap_or_default(),
                page.total_entries().unwrap_or_default()
            );
        }
        OutputFormat::Json => print_item(page, format),
    }
}

/// Print records in the selected format
pub fn print_records(records: &[DynamicRecord], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let Some(first) = records.first() else {
                println!("No results found.");
                return;
            };
            let mut builder = Builder::default();
            builder.push_record(first.column_names().map(str::to_string));
            for record in records {
                builder.push_record(record.values().map(ToString::to_string));
            }
            println!("{}", builder.build());
        }
        OutputFormat::Json => print_item(&records, format),
    }
}

/// Print one batch of a streamed result: a table per batch, or one JSON
/// object per line
pub fn print_batch(records: &[DynamicRecord], format: OutputFormat) {
    match format {
        OutputFormat::Table => print_records(records, format),
        OutputFormat::Json => {
            for record in records {
                match serde_json::to_string(record) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::warn!("Failed to serialize record: {}", e),
                }
            }
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{:#?}", item);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}
