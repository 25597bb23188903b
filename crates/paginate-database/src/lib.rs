//! # paginate-database
//!
//! SQLite connection management and [`SqlModel`], a
//! [`Model`](paginate_core::traits::Model) implementation over sqlx.

pub mod builder;
pub mod connection;
pub mod model;
pub mod record;
pub mod schema;

pub use builder::Association;
pub use connection::DatabasePool;
pub use model::SqlModel;
pub use record::DynamicRecord;
pub use schema::run_script;
