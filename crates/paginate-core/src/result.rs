//! Convenience result type alias for paginate.

use crate::error::PaginateError;

/// A specialized `Result` type for pagination operations.
pub type PaginateResult<T> = Result<T, PaginateError>;
