//! Configuration schemas.
//!
//! Settings are deserialized from a TOML file via the `config` crate and
//! can be overridden by environment variables prefixed with `PAGINATE__`.
//! Every field has a default, so an absent file yields a usable
//! configuration.

pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;

use crate::error::PaginateError;

/// Number of records per page when neither the caller nor the model says otherwise.
pub const DEFAULT_PER_PAGE: u64 = 30;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Pagination defaults.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pagination defaults applied to models built from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Default page size.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file (optional) merged with `PAGINATE__*`
    /// environment variables.
    pub fn load(path: &str) -> Result<Self, PaginateError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("PAGINATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values no model could work with.
    pub fn validate(&self) -> Result<(), PaginateError> {
        if self.pagination.per_page == 0 {
            return Err(PaginateError::configuration(
                "pagination.per_page cannot be less than 1",
            ));
        }
        if self.database.max_connections == 0 {
            return Err(PaginateError::configuration(
                "database.max_connections cannot be 0",
            ));
        }
        Ok(())
    }
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}
