//! SQLite connection pool management.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use paginate_core::config::DatabaseConfig;
use paginate_core::error::{ErrorKind, PaginateError};

/// Wrapper around the sqlx SQLite pool that counts executed statements.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: SqlitePool,
    /// Statements executed through this pool (shared by clones).
    statements: Arc<AtomicU64>,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    ///
    /// An in-memory database lives exactly as long as its connection, so
    /// such URLs get a single connection that is never recycled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, PaginateError> {
        let memory = config.is_memory();
        let max_connections = if memory { 1 } else { config.max_connections };
        info!(
            url = %config.url,
            max_connections,
            memory,
            "Connecting to SQLite"
        );

        let connect_options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| database_error("Invalid database URL", e))?
            .create_if_missing(config.create_if_missing);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds));
        if memory {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| database_error("Failed to connect to database", e))?;

        info!("Successfully connected to SQLite");
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing sqlx pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            statements: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Count and log a statement about to be executed.
    pub fn record_statement(&self, sql: &str) {
        let n = self.statements.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(statement = n, sql, "Executing SQL");
    }

    /// Number of statements executed so far.
    pub fn query_count(&self) -> u64 {
        self.statements.load(Ordering::Relaxed)
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<bool, PaginateError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| PaginateError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Map a sqlx error into a [`PaginateError`] with context.
pub(crate) fn database_error(context: &str, err: sqlx::Error) -> PaginateError {
    PaginateError::with_source(ErrorKind::Database, format!("{context}: {err}"), err)
}
