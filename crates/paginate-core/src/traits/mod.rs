//! Core traits defined in `paginate-core` and implemented by backends.

pub mod model;

pub use model::Model;
