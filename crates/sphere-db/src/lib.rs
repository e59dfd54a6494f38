//! PostgreSQL connection and typed query layer for ShopSphere.
//!
//! The storefront keeps a single connection to its relational store. It is
//! configured from the `DATABASE_URL` environment variable, opened once at
//! process start, handed to whatever needs it, and closed at shutdown.
//!
//! # Example
//!
//! ```rust,ignore
//! use sphere_db::{params, Db, DbConfig};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct CategoryRow {
//!     id: i64,
//!     name: String,
//! }
//!
//! let db = Db::connect(&DbConfig::from_env()?).await?;
//!
//! let rows: Vec<CategoryRow> = db
//!     .query_as("SELECT id, name FROM categories WHERE slug = $1", params!["shoes"])
//!     .await?;
//!
//! db.close().await?;
//! ```

mod config;
mod db;
mod error;
mod types;

pub use config::{DbConfig, DATABASE_URL_ENV};
pub use db::Db;
pub use error::DbError;
pub use types::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{params, Db, DbConfig, DbError, QueryResult, Row, Value};
}

/// Create a parameter list for SQL queries.
///
/// # Example
///
/// ```rust,ignore
/// use sphere_db::params;
///
/// let params = params!["value1", 42, 3.14];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
