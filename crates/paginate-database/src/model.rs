//! A paginatable model backed by a SQLite table.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Arguments, FromRow};
use tracing::debug;

use paginate_core::config::{DEFAULT_PER_PAGE, PaginationConfig};
use paginate_core::error::PaginateError;
use paginate_core::result::PaginateResult;
use paginate_core::traits::Model;
use paginate_core::types::{FindOptions, SqlQuery, TIMESTAMP_FORMAT, Value};

use crate::builder::{Association, QueryBuilder, expand_placeholders};
use crate::connection::{DatabasePool, database_error};

/// A table whose rows decode into `T`.
///
/// Named scopes registered with [`scope`](Self::scope) are reachable as the
/// `find_<name>` finder and counted through the matching `with_<name>`
/// scope.
#[derive(Debug)]
pub struct SqlModel<T> {
    pool: DatabasePool,
    table: String,
    primary_key: String,
    per_page: u64,
    default_select: Option<String>,
    associations: Arc<Vec<Association>>,
    scopes: BTreeMap<String, FindOptions>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for SqlModel<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.clone(),
            primary_key: self.primary_key.clone(),
            per_page: self.per_page,
            default_select: self.default_select.clone(),
            associations: Arc::clone(&self.associations),
            scopes: self.scopes.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> SqlModel<T> {
    /// Create a model for `table` with an `id` primary key.
    pub fn new(pool: DatabasePool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
            primary_key: "id".to_string(),
            per_page: DEFAULT_PER_PAGE,
            default_select: None,
            associations: Arc::new(Vec::new()),
            scopes: BTreeMap::new(),
            _record: PhantomData,
        }
    }

    /// Use a different primary key column.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Set the default page size.
    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }

    /// Apply configured pagination defaults.
    pub fn with_config(self, config: &PaginationConfig) -> Self {
        self.per_page(config.per_page)
    }

    /// Select list used when finder options carry none.
    pub fn default_select(mut self, select: impl Into<String>) -> Self {
        self.default_select = Some(select.into());
        self
    }

    /// Declare a `has_many` association that can be included.
    pub fn has_many(mut self, table: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.associations).push(Association {
            table: table.into(),
            foreign_key: foreign_key.into(),
        });
        self
    }

    /// Register a named scope.
    pub fn scope(mut self, name: impl Into<String>, options: FindOptions) -> Self {
        self.scopes.insert(name.into(), options);
        self
    }

    /// The pool this model runs on.
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    fn builder(&self) -> QueryBuilder {
        QueryBuilder::new(
            self.table.clone(),
            self.primary_key.clone(),
            Arc::clone(&self.associations),
        )
    }

    /// Includes that nothing references are eager loads; records here are
    /// flat, so those joins are dropped.
    fn joinable(&self, options: &FindOptions) -> FindOptions
    where
        Self: Model,
    {
        let mut options = options.clone();
        if !options.include.is_empty() && !self.references_eager_loaded_tables(&options) {
            debug!(table = %self.table, include = ?options.include, "Skipping unreferenced includes");
            options.include.clear();
        }
        options
    }

    fn named_scope(&self, name: &str, prefix: &str) -> Option<&FindOptions> {
        name.strip_prefix(prefix)
            .and_then(|scope| self.scopes.get(scope))
    }
}

/// Combine a scope with caller options: conditions and includes add up,
/// every other caller-supplied key wins over the scope's.
fn apply_scope(scope: &FindOptions, options: &FindOptions) -> FindOptions {
    let mut scoped = scope.clone();
    let mut caller = options.clone();
    scoped.conditions.append(&mut caller.conditions);
    for table in caller.include.drain(..) {
        if !scoped.include.contains(&table) {
            scoped.include.push(table);
        }
    }
    scoped.merge(&caller);
    scoped
}

fn arguments<'q>(params: &[Value]) -> PaginateResult<SqliteArguments<'q>> {
    let mut args = SqliteArguments::default();
    for value in params {
        let added = match value {
            Value::Null => args.add(None::<String>),
            Value::Bool(v) => args.add(*v),
            Value::Integer(v) => args.add(*v),
            Value::Float(v) => args.add(*v),
            Value::Text(v) => args.add(v.clone()),
            Value::Timestamp(v) => args.add(format_timestamp(v)),
            Value::List(_) => {
                return Err(PaginateError::invalid_argument(
                    "list parameters must be expanded before binding",
                ));
            }
        };
        added.map_err(|e| {
            PaginateError::invalid_argument(format!("Failed to bind parameter {value}: {e}"))
        })?;
    }
    Ok(args)
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[async_trait]
impl<T> Model for SqlModel<T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin + 'static,
{
    type Record = T;

    fn table_name(&self) -> &str {
        &self.table
    }

    fn primary_key(&self) -> &str {
        &self.primary_key
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    fn default_select(&self) -> Option<String> {
        self.default_select.clone()
    }

    async fn find_all(&self, options: &FindOptions) -> PaginateResult<Vec<T>> {
        let mut options = self.joinable(options);
        if options.select.is_none() {
            options.select = self.default_select.clone();
        }
        let query = self.builder().select(&options)?;
        self.find_by_sql(&query).await
    }

    async fn call_finder(
        &self,
        name: &str,
        args: &[Value],
        options: &FindOptions,
    ) -> PaginateResult<Vec<T>> {
        let scope = self
            .named_scope(name, "find_")
            .ok_or_else(|| PaginateError::unknown_finder(name))?;
        if !args.is_empty() {
            return Err(PaginateError::invalid_argument(format!(
                "scope finder `{name}` takes no arguments, got {}",
                args.len()
            )));
        }
        self.find_all(&apply_scope(scope, options)).await
    }

    fn has_scope(&self, name: &str) -> bool {
        self.named_scope(name, "with_").is_some()
    }

    async fn count_in_scope(&self, name: &str, options: &FindOptions) -> PaginateResult<u64> {
        let scope = self
            .named_scope(name, "with_")
            .ok_or_else(|| PaginateError::unknown_finder(name))?;
        self.count(&apply_scope(scope, options)).await
    }

    async fn count(&self, options: &FindOptions) -> PaginateResult<u64> {
        let query = self.builder().count(&self.joinable(options))?;
        self.count_by_sql(&query).await
    }

    async fn find_by_sql(&self, query: &SqlQuery) -> PaginateResult<Vec<T>> {
        let query = expand_placeholders(query)?;
        let args = arguments(&query.params)?;
        self.pool.record_statement(&query.sql);
        sqlx::query_as_with::<_, T, _>(&query.sql, args)
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| database_error(&format!("Failed to query {}", self.table), e))
    }

    async fn count_by_sql(&self, query: &SqlQuery) -> PaginateResult<u64> {
        let query = expand_placeholders(query)?;
        let args = arguments(&query.params)?;
        self.pool.record_statement(&query.sql);
        let count: i64 = sqlx::query_scalar_with::<_, i64, _>(&query.sql, args)
            .fetch_one(self.pool.pool())
            .await
            .map_err(|e| database_error(&format!("Failed to count {}", self.table), e))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
