//! # paginate
//!
//! Page/per-page pagination for model finders.
//!
//! ```ignore
//! use paginate::prelude::*;
//!
//! let topics = SqlModel::<Topic>::new(pool, "topics");
//! let page = topics.paginate(&PaginateOptions::page(2).per_page(10)).await?;
//! println!("{} of {:?} pages", page.current_page(), page.total_pages());
//! ```

pub use paginate_core;
pub use paginate_database;
pub use paginate_finders;

/// The types needed to paginate a model.
pub mod prelude {
    pub use paginate_core::traits::Model;
    pub use paginate_core::types::{
        Collection, Condition, FindOptions, PaginateOptions, SqlQuery, Value,
    };
    pub use paginate_core::{PaginateError, PaginateResult};
    pub use paginate_database::{DatabasePool, DynamicRecord, SqlModel};
    pub use paginate_finders::{FinderCall, Paginate, PaginateSlice};
}
