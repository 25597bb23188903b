//! `sql` command: one page of a raw query.

use clap::Args;

use crate::output::{self, OutputFormat};
use paginate_core::config::Settings;
use paginate_core::error::PaginateError;
use paginate_core::types::{PaginateOptions, SqlQuery};
use paginate_database::{DynamicRecord, SqlModel};
use paginate_finders::Paginate;

/// Arguments for the sql command
#[derive(Debug, Args)]
pub struct SqlArgs {
    /// SELECT statement, without LIMIT/OFFSET
    #[arg(short, long)]
    pub query: String,
    /// Page number (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub page: i64,
    /// Rows per page (defaults to pagination.per_page)
    #[arg(long)]
    pub per_page: Option<i64>,
    /// Known total, skips the count query
    #[arg(long)]
    pub total_entries: Option<u64>,
}

/// Execute the sql command
pub async fn execute(
    args: &SqlArgs,
    settings: &Settings,
    format: OutputFormat,
) -> Result<(), PaginateError> {
    let pool = super::create_db_pool(settings).await?;
    let model =
        SqlModel::<DynamicRecord>::new(pool.clone(), "query").with_config(&settings.pagination);

    let options = PaginateOptions {
        page: Some(args.page),
        per_page: args.per_page,
        total_entries: args.total_entries,
        ..PaginateOptions::default()
    };
    let page = model
        .paginate_by_sql(&SqlQuery::new(args.query.clone()), &options)
        .await?;
    output::print_page(&page, format);

    pool.close().await;
    Ok(())
}
