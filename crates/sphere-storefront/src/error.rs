//! Listing error types.

use sphere_data::FetchError;
use thiserror::Error;

/// Why a listing operation could not fetch what it needed.
///
/// The listing state has already recorded the failure when one of these is
/// returned.
#[derive(Error, Debug)]
pub enum ListingError {
    /// The product search failed.
    #[error("Product fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The category directory could not be loaded to resolve a slug.
    #[error("Category list unavailable: {0}")]
    CategoriesUnavailable(FetchError),
}

impl ListingError {
    /// The underlying transport error.
    pub fn fetch_error(&self) -> &FetchError {
        match self {
            ListingError::Fetch(e) | ListingError::CategoriesUnavailable(e) => e,
        }
    }
}
