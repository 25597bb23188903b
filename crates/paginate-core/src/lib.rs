//! # paginate-core
//!
//! Core crate for paginate. Contains the model trait that backends
//! implement, configuration schemas, query option types, the page
//! [`Collection`](types::Collection), and the unified error system.
//!
//! This crate has **no** internal dependencies on other paginate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::PaginateError;
pub use result::PaginateResult;
