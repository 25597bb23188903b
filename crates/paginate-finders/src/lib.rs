//! # paginate-finders
//!
//! Paginating finders for any [`Model`](paginate_core::traits::Model):
//! page parameters become `limit`/`offset`, the total is inferred from a
//! short page when possible and counted otherwise.

pub mod call;
pub mod count;
pub mod paginate;
pub mod slice;
pub mod sql;

pub use call::FinderCall;
pub use paginate::Paginate;
pub use slice::PaginateSlice;
