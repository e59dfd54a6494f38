//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in catalog operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Price range with a lower bound above its upper bound.
    #[error("Invalid price range: min {min} is greater than max {max}")]
    InvalidPriceRange { min: String, max: String },

    /// Unknown sort field or direction.
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    /// Database error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(feature = "storage")]
impl From<sphere_db::DbError> for CommerceError {
    fn from(e: sphere_db::DbError) -> Self {
        CommerceError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
