//! Finder and pagination options.
//!
//! [`FindOptions`] mirrors the option set a model finder understands.
//! [`PaginateOptions`] wraps it with the page parameters that the
//! pagination layer consumes before delegating to the model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// A single `WHERE` fragment. Multiple conditions are joined with `AND`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Raw SQL, used verbatim.
    Sql(String),
    /// SQL with `?` placeholders bound to `params` in order.
    Bound {
        /// SQL text with `?` placeholders.
        sql: String,
        /// Parameters bound to the placeholders.
        params: Vec<Value>,
    },
    /// `column = value`; a list value means `IN`, null means `IS NULL`.
    Eq {
        /// Column name, optionally table-qualified.
        column: String,
        /// Value to compare against.
        value: Value,
    },
}

impl Condition {
    /// Raw SQL condition.
    pub fn sql(sql: impl Into<String>) -> Self {
        Self::Sql(sql.into())
    }

    /// SQL condition with bound parameters.
    pub fn bound(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self::Bound {
            sql: sql.into(),
            params,
        }
    }

    /// Equality (or membership, for list values) condition.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    /// The SQL text this condition contributes, for table-reference checks.
    pub fn text(&self) -> &str {
        match self {
            Self::Sql(sql) | Self::Bound { sql, .. } => sql,
            Self::Eq { column, .. } => column,
        }
    }
}

/// Options understood by a model's `find`/`count` primitives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindOptions {
    /// `WHERE` fragments, `AND`-joined.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    /// Select list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    /// Raw join clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joins: Option<String>,
    /// Associated tables to eager load.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    /// `ORDER BY` clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// `GROUP BY` clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// `HAVING` clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<String>,
    /// Maximum number of rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Number of rows to skip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Mark loaded records read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,
    /// Backend specific options, passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl FindOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a raw SQL condition.
    pub fn where_sql(self, sql: impl Into<String>) -> Self {
        self.condition(Condition::sql(sql))
    }

    /// Add a condition with bound parameters.
    pub fn where_bound(self, sql: impl Into<String>, params: Vec<Value>) -> Self {
        self.condition(Condition::bound(sql, params))
    }

    /// Add an equality condition.
    pub fn where_eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(Condition::eq(column, value))
    }

    /// Set the select list.
    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    /// Set the raw join clause.
    pub fn joins(mut self, joins: impl Into<String>) -> Self {
        self.joins = Some(joins.into());
        self
    }

    /// Eager load an associated table.
    pub fn include(mut self, table: impl Into<String>) -> Self {
        self.include.push(table.into());
        self
    }

    /// Set the `ORDER BY` clause.
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Set the `GROUP BY` clause.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the `HAVING` clause.
    pub fn having(mut self, having: impl Into<String>) -> Self {
        self.having = Some(having.into());
        self
    }

    /// Set the row limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the row offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the read-only flag.
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = Some(readonly);
        self
    }

    /// Set a backend specific option.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Overlay `other` onto `self`: every key present in `other` wins.
    pub fn merge(&mut self, other: &FindOptions) {
        if !other.conditions.is_empty() {
            self.conditions = other.conditions.clone();
        }
        if other.select.is_some() {
            self.select = other.select.clone();
        }
        if other.joins.is_some() {
            self.joins = other.joins.clone();
        }
        if !other.include.is_empty() {
            self.include = other.include.clone();
        }
        if other.order.is_some() {
            self.order = other.order.clone();
        }
        if other.group.is_some() {
            self.group = other.group.clone();
        }
        if other.having.is_some() {
            self.having = other.having.clone();
        }
        if other.limit.is_some() {
            self.limit = other.limit;
        }
        if other.offset.is_some() {
            self.offset = other.offset;
        }
        if other.readonly.is_some() {
            self.readonly = other.readonly;
        }
        self.extra
            .extend(other.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// SQL fragments that may name other tables: conditions, order, joins.
    pub fn referenced_sql(&self) -> impl Iterator<Item = &str> {
        self.conditions
            .iter()
            .map(Condition::text)
            .chain(self.order.as_deref())
            .chain(self.joins.as_deref())
    }
}

/// Page parameters plus the finder options to paginate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginateOptions {
    /// Page number, 1-based. `None` means the first page.
    #[serde(default)]
    pub page: Option<i64>,
    /// Page size. `None` means the model default.
    #[serde(default)]
    pub per_page: Option<i64>,
    /// Known total; skips the count query when set.
    #[serde(default)]
    pub total_entries: Option<u64>,
    /// Options applied to the count query only.
    #[serde(default)]
    pub count: Option<FindOptions>,
    /// Options passed to the finder.
    #[serde(default, flatten)]
    pub query: FindOptions,
}

impl PaginateOptions {
    /// Options for the given page with model defaults for everything else.
    pub fn page(page: i64) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Set the page number.
    pub fn with_page(mut self, page: Option<i64>) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Set a known total.
    pub fn total_entries(mut self, total: u64) -> Self {
        self.total_entries = Some(total);
        self
    }

    /// Set count-only options.
    pub fn count(mut self, count: FindOptions) -> Self {
        self.count = Some(count);
        self
    }

    /// Set the finder options.
    pub fn query(mut self, query: FindOptions) -> Self {
        self.query = query;
        self
    }
}
