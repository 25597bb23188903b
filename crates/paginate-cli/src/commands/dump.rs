//! `dump` command: every row of a table, fetched in batches.

use clap::Args;

use crate::output::{self, OutputFormat};
use paginate_core::config::Settings;
use paginate_core::error::PaginateError;
use paginate_core::result::PaginateResult;
use paginate_core::types::{FindOptions, PaginateOptions};
use paginate_database::{DynamicRecord, SqlModel};
use paginate_finders::Paginate;

/// Arguments for the dump command
#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Table to read
    #[arg(short, long)]
    pub table: String,
    /// Rows fetched per query
    #[arg(short, long, default_value_t = 100)]
    pub batch_size: i64,
    /// ORDER BY clause (defaults to the primary key)
    #[arg(long)]
    pub order: Option<String>,
}

/// Execute the dump command
pub async fn execute(
    args: &DumpArgs,
    settings: &Settings,
    format: OutputFormat,
) -> Result<(), PaginateError> {
    let pool = super::create_db_pool(settings).await?;
    let model = SqlModel::<DynamicRecord>::new(pool.clone(), &args.table);

    let visited = dump_batches(&model, args, |batch| output::print_batch(batch, format)).await?;

    tracing::info!(
        table = %args.table,
        rows = visited,
        queries = pool.query_count(),
        "Dump finished"
    );
    pool.close().await;
    Ok(())
}

/// Walk the table page by page, handing each full batch to `sink` as soon
/// as it is complete.
async fn dump_batches<F>(
    model: &SqlModel<DynamicRecord>,
    args: &DumpArgs,
    mut sink: F,
) -> PaginateResult<u64>
where
    F: FnMut(&[DynamicRecord]) + Send,
{
    let mut query = FindOptions::new();
    query.order = args.order.clone();
    let options = PaginateOptions::page(1)
        .per_page(args.batch_size)
        .query(query);

    let batch_size = usize::try_from(args.batch_size).unwrap_or(usize::MAX);
    let mut batch = Vec::new();
    let visited = model
        .paginated_each(&options, |record| {
            batch.push(record);
            if batch.len() >= batch_size {
                sink(&batch);
                batch.clear();
            }
        })
        .await?;
    if !batch.is_empty() {
        sink(&batch);
    }
    Ok(visited)
}
