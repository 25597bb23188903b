//! Raw SQL rewriting for `paginate_by_sql`.

use std::sync::LazyLock;

use regex::Regex;

use paginate_core::types::{SqlDialect, SqlQuery};

/// A trailing `ORDER BY` list. It may span lines and contain quoted or
/// table-qualified identifiers.
static TRAILING_ORDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)\bORDER\s+BY\s+[\w`,.\s]+$").expect("valid order pattern")
});

/// Append a `limit`/`offset` window to a raw statement.
pub fn add_limit(query: &SqlQuery, limit: u64, offset: u64, dialect: SqlDialect) -> SqlQuery {
    let sql = match dialect {
        SqlDialect::Standard => format!("{} LIMIT {limit} OFFSET {offset}", query.sql),
        SqlDialect::Oracle => format!(
            "SELECT * FROM (SELECT raw_sql_.*, rownum raw_rnum_ FROM ({}) raw_sql_ \
             WHERE rownum <= {}) WHERE raw_rnum_ > {offset}",
            query.sql,
            offset.saturating_add(limit)
        ),
    };
    SqlQuery::with_params(sql, query.params.clone())
}

/// Remove the first trailing `ORDER BY` clause.
pub fn strip_order(sql: &str) -> String {
    TRAILING_ORDER.replacen(sql, 1, "").into_owned()
}

/// Wrap a raw statement into a count of its rows, without its ordering.
pub fn count_query(query: &SqlQuery, dialect: SqlDialect) -> SqlQuery {
    let inner = strip_order(&query.sql);
    let sql = match dialect {
        SqlDialect::Standard => format!("SELECT COUNT(*) FROM ({inner}) AS count_table"),
        SqlDialect::Oracle => format!("SELECT COUNT(*) FROM ({inner})"),
    };
    SqlQuery::with_params(sql, query.params.clone())
}
