//! `page` command: one page of a table.

use clap::Args;

use crate::output::{self, OutputFormat};
use paginate_core::config::Settings;
use paginate_core::error::PaginateError;
use paginate_core::types::{FindOptions, PaginateOptions};
use paginate_database::{DynamicRecord, SqlModel};
use paginate_finders::Paginate;

/// Arguments for the page command
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Table to read
    #[arg(short, long)]
    pub table: String,
    /// Page number (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub page: i64,
    /// Rows per page (defaults to pagination.per_page)
    #[arg(long)]
    pub per_page: Option<i64>,
    /// ORDER BY clause
    #[arg(long)]
    pub order: Option<String>,
    /// WHERE condition; repeat to AND several
    #[arg(long = "where")]
    pub conditions: Vec<String>,
    /// Select list
    #[arg(long)]
    pub select: Option<String>,
    /// Known total, skips the count query
    #[arg(long)]
    pub total_entries: Option<u64>,
}

impl PageArgs {
    fn options(&self) -> PaginateOptions {
        let mut query = FindOptions::new();
        for condition in &self.conditions {
            query = query.where_sql(condition.clone());
        }
        query.order = self.order.clone();
        query.select = self.select.clone();

        PaginateOptions {
            page: Some(self.page),
            per_page: self.per_page,
            total_entries: self.total_entries,
            count: None,
            query,
        }
    }
}

/// Execute the page command
pub async fn execute(
    args: &PageArgs,
    settings: &Settings,
    format: OutputFormat,
) -> Result<(), PaginateError> {
    let pool = super::create_db_pool(settings).await?;
    let model =
        SqlModel::<DynamicRecord>::new(pool.clone(), &args.table).with_config(&settings.pagination);

    let page = model.paginate(&args.options()).await?;
    output::print_page(&page, format);

    tracing::debug!(queries = pool.query_count(), "Page command finished");
    pool.close().await;
    Ok(())
}
