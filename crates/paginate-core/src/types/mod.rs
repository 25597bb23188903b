//! Core type definitions used across the paginate workspace.

pub mod collection;
pub mod options;
pub mod query;
pub mod value;

pub use collection::Collection;
pub use options::{Condition, FindOptions, PaginateOptions};
pub use query::{SqlDialect, SqlQuery, is_distinct_select};
pub use value::{TIMESTAMP_FORMAT, Value};
