//! SQL generation for [`FindOptions`].

use std::sync::Arc;

use paginate_core::error::PaginateError;
use paginate_core::result::PaginateResult;
use paginate_core::types::{Condition, FindOptions, SqlQuery, Value, is_distinct_select};

/// A `has_many` association that `include` can join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// Associated table; also the name used in `include`.
    pub table: String,
    /// Column in the associated table pointing at the owner's primary key.
    pub foreign_key: String,
}

/// Builds select and count statements for one table.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    primary_key: String,
    associations: Arc<Vec<Association>>,
}

impl QueryBuilder {
    /// Create a builder for `table`.
    pub fn new(
        table: impl Into<String>,
        primary_key: impl Into<String>,
        associations: Arc<Vec<Association>>,
    ) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
            associations,
        }
    }

    /// `SELECT` statement for `options`.
    pub fn select(&self, options: &FindOptions) -> PaginateResult<SqlQuery> {
        let mut params = Vec::new();
        let joined = !options.include.is_empty();

        let mut select = options
            .select
            .clone()
            .unwrap_or_else(|| format!("{}.*", self.table));
        if joined && !is_distinct_select(&select) {
            select = format!("DISTINCT {select}");
        }

        let mut sql = format!("SELECT {select}");
        self.push_from(&mut sql, &mut params, options)?;
        if let Some(order) = &options.order {
            sql.push_str(&format!(" ORDER BY {order}"));
        }
        match (options.limit, options.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        Ok(SqlQuery::with_params(sql, params))
    }

    /// `SELECT COUNT(...)` statement for `options`. Order and window are
    /// ignored.
    pub fn count(&self, options: &FindOptions) -> PaginateResult<SqlQuery> {
        let mut params = Vec::new();

        if options.group.is_some() {
            let mut inner = "SELECT 1".to_string();
            self.push_from(&mut inner, &mut params, options)?;
            return Ok(SqlQuery::with_params(
                format!("SELECT COUNT(*) FROM ({inner}) AS grouped"),
                params,
            ));
        }

        let counted = match options.select.as_deref() {
            Some(select) if is_distinct_select(select) => select.trim().to_string(),
            _ if !options.include.is_empty() => {
                format!("DISTINCT {}.{}", self.table, self.primary_key)
            }
            _ => "*".to_string(),
        };

        let mut sql = format!("SELECT COUNT({counted})");
        self.push_from(&mut sql, &mut params, options)?;
        Ok(SqlQuery::with_params(sql, params))
    }

    /// `FROM`, joins, `WHERE`, `GROUP BY` and `HAVING`.
    fn push_from(
        &self,
        sql: &mut String,
        params: &mut Vec<Value>,
        options: &FindOptions,
    ) -> PaginateResult<()> {
        sql.push_str(&format!(" FROM {}", self.table));

        for include in &options.include {
            let association = self
                .associations
                .iter()
                .find(|a| a.table == *include)
                .ok_or_else(|| {
                    PaginateError::invalid_argument(format!(
                        "`{}` has no association named `{include}`",
                        self.table
                    ))
                })?;
            sql.push_str(&format!(
                " LEFT OUTER JOIN {assoc} ON {assoc}.{fk} = {table}.{pk}",
                assoc = association.table,
                fk = association.foreign_key,
                table = self.table,
                pk = self.primary_key,
            ));
        }

        if let Some(joins) = &options.joins {
            sql.push(' ');
            sql.push_str(joins);
        }

        if !options.conditions.is_empty() {
            let fragments = options
                .conditions
                .iter()
                .map(|c| render_condition(c, params).map(|sql| format!("({sql})")))
                .collect::<PaginateResult<Vec<_>>>()?;
            sql.push_str(" WHERE ");
            sql.push_str(&fragments.join(" AND "));
        }

        if let Some(group) = &options.group {
            sql.push_str(&format!(" GROUP BY {group}"));
        }
        if let Some(having) = &options.having {
            sql.push_str(&format!(" HAVING {having}"));
        }
        Ok(())
    }
}

fn render_condition(condition: &Condition, params: &mut Vec<Value>) -> PaginateResult<String> {
    match condition {
        Condition::Sql(sql) => Ok(sql.clone()),
        Condition::Bound { sql, params: bound } => {
            let expanded = expand_placeholders(&SqlQuery::with_params(sql.clone(), bound.clone()))?;
            params.extend(expanded.params);
            Ok(expanded.sql)
        }
        Condition::Eq { column, value } => Ok(match value {
            Value::Null => format!("{column} IS NULL"),
            Value::List(values) if values.is_empty() => "1 = 0".to_string(),
            Value::List(values) => {
                params.extend(values.iter().cloned());
                format!("{column} IN ({})", vec!["?"; values.len()].join(", "))
            }
            other => {
                params.push(other.clone());
                format!("{column} = ?")
            }
        }),
    }
}

/// Expand list parameters into one placeholder per element.
///
/// Placeholders are matched positionally, one `?` per parameter.
pub fn expand_placeholders(query: &SqlQuery) -> PaginateResult<SqlQuery> {
    let placeholders = query.sql.matches('?').count();
    if placeholders != query.params.len() {
        return Err(PaginateError::invalid_argument(format!(
            "wrong number of bind variables ({} for {placeholders}) in: {}",
            query.params.len(),
            query.sql
        )));
    }

    let mut sql = String::with_capacity(query.sql.len());
    let mut params = Vec::with_capacity(query.params.len());
    let mut values = query.params.iter();
    for ch in query.sql.chars() {
        if ch != '?' {
            sql.push(ch);
            continue;
        }
        match values.next() {
            Some(Value::List(list)) if list.is_empty() => sql.push_str("NULL"),
            Some(Value::List(list)) => {
                sql.push_str(&vec!["?"; list.len()].join(", "));
                params.extend(list.iter().cloned());
            }
            Some(value) => {
                sql.push('?');
                params.push(value.clone());
            }
            None => sql.push('?'),
        }
    }
    Ok(SqlQuery::with_params(sql, params))
}
