//! The model trait: the find/count primitives a backend exposes.

use async_trait::async_trait;

use crate::config::DEFAULT_PER_PAGE;
use crate::error::PaginateError;
use crate::result::PaginateResult;
use crate::types::options::{Condition, FindOptions};
use crate::types::query::{SqlDialect, SqlQuery};
use crate::types::value::Value;

/// A queryable model backed by some persistence layer.
///
/// Pagination never talks to storage itself; it only calls these
/// primitives with computed `limit`/`offset` options. Only the finders a
/// backend supports need real implementations: the named-finder and
/// scope hooks default to [`PaginateError::unknown_finder`].
#[async_trait]
pub trait Model: Send + Sync {
    /// The record type returned by finders.
    type Record: Send + Sync + 'static;

    /// Table name, used to qualify columns.
    fn table_name(&self) -> &str;

    /// Primary key column.
    fn primary_key(&self) -> &str {
        "id"
    }

    /// Page size used when the caller does not pass one.
    fn per_page(&self) -> u64 {
        DEFAULT_PER_PAGE
    }

    /// Select list applied by the model's scope when the caller gives none.
    fn default_select(&self) -> Option<String> {
        None
    }

    /// SQL flavour for raw SQL rewriting.
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Standard
    }

    /// Find all records matching `options`.
    async fn find_all(&self, options: &FindOptions) -> PaginateResult<Vec<Self::Record>>;

    /// Find the records with the given primary keys.
    async fn find_ids(
        &self,
        ids: &[Value],
        options: &FindOptions,
    ) -> PaginateResult<Vec<Self::Record>> {
        let column = qualify(self.table_name(), self.primary_key());
        let scoped = options
            .clone()
            .condition(Condition::eq(column, Value::List(ids.to_vec())));
        self.find_all(&scoped).await
    }

    /// Find all records whose attributes equal the given values.
    async fn find_by_attributes(
        &self,
        attributes: &[(String, Value)],
        options: &FindOptions,
    ) -> PaginateResult<Vec<Self::Record>> {
        let mut scoped = options.clone();
        scoped
            .conditions
            .extend(attribute_conditions(self.table_name(), attributes));
        self.find_all(&scoped).await
    }

    /// Call a named finder such as `find_tagged_with` or `find_best`.
    async fn call_finder(
        &self,
        name: &str,
        _args: &[Value],
        _options: &FindOptions,
    ) -> PaginateResult<Vec<Self::Record>> {
        Err(PaginateError::unknown_finder(name))
    }

    /// Whether a `with_*` scope of this name exists.
    fn has_scope(&self, _name: &str) -> bool {
        false
    }

    /// Count inside the named `with_*` scope.
    async fn count_in_scope(&self, name: &str, _options: &FindOptions) -> PaginateResult<u64> {
        Err(PaginateError::unknown_finder(name))
    }

    /// Count records matching `options`.
    async fn count(&self, options: &FindOptions) -> PaginateResult<u64>;

    /// Run a raw select statement.
    async fn find_by_sql(&self, query: &SqlQuery) -> PaginateResult<Vec<Self::Record>>;

    /// Run a raw statement returning a single count.
    async fn count_by_sql(&self, query: &SqlQuery) -> PaginateResult<u64>;

    /// Whether any included table is referenced by the conditions, order
    /// or joins, so that the count still needs the join.
    fn references_eager_loaded_tables(&self, options: &FindOptions) -> bool {
        options.include.iter().any(|table| {
            let prefix = format!("{}.", table.to_lowercase());
            options
                .referenced_sql()
                .any(|sql| sql.to_lowercase().contains(&prefix))
        })
    }
}

/// Qualify a bare column with the table name.
pub fn qualify(table: &str, column: &str) -> String {
    if column.contains('.') {
        column.to_string()
    } else {
        format!("{table}.{column}")
    }
}

/// Equality conditions for `find_all_by_*` style attribute lookups.
pub fn attribute_conditions(table: &str, attributes: &[(String, Value)]) -> Vec<Condition> {
    attributes
        .iter()
        .map(|(name, value)| Condition::eq(qualify(table, name), value.clone()))
        .collect()
}
