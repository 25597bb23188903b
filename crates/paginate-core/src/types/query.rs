//! Raw SQL statements.

use serde::{Deserialize, Serialize};

use super::value::Value;

/// A SQL statement with `?` placeholders and the values bound to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlQuery {
    /// Statement text.
    pub sql: String,
    /// Bound parameters, in placeholder order.
    #[serde(default)]
    pub params: Vec<Value>,
}

impl SqlQuery {
    /// A statement without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// A statement with bound parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl From<&str> for SqlQuery {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<String> for SqlQuery {
    fn from(sql: String) -> Self {
        Self::new(sql)
    }
}

/// SQL flavour, for the few places where raw SQL rewriting differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// `LIMIT n OFFSET m`, derived tables take an alias.
    #[default]
    Standard,
    /// `ROWNUM` windows, derived tables without `AS` alias.
    Oracle,
}

/// Whether a select list starts with the `DISTINCT` keyword.
pub fn is_distinct_select(select: &str) -> bool {
    let select = select.trim_start();
    let keyword_len = select
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(select.len());
    select[..keyword_len].eq_ignore_ascii_case("DISTINCT")
}
