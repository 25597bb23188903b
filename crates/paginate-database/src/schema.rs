//! Schema and fixture scripts.

use tracing::info;

use paginate_core::error::PaginateError;

use crate::connection::{DatabasePool, database_error};

/// Execute a script of `;`-separated statements in one round trip.
pub async fn run_script(pool: &DatabasePool, script: &str) -> Result<(), PaginateError> {
    pool.record_statement(script);
    sqlx::raw_sql(script)
        .execute(pool.pool())
        .await
        .map_err(|e| database_error("Failed to run script", e))?;

    info!(bytes = script.len(), "Script executed");
    Ok(())
}
