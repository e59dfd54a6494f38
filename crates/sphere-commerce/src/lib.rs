//! Catalog domain types and product search for ShopSphere.
//!
//! This crate provides the types shared by the storefront and the catalog API:
//!
//! - **Catalog**: Products, categories, and the slug-addressed category directory
//! - **Search**: Sort presets, filter state, product queries, and result pages
//! - **Storage** (feature `storage`): the PostgreSQL-backed catalog repository
//!
//! # Example
//!
//! ```rust,ignore
//! use sphere_commerce::prelude::*;
//!
//! let mut filters = FilterState::default();
//! filters.toggle_size("M");
//! filters.set_price_range(PriceRange::between(Price::from_major(10.0), Price::from_major(80.0))?);
//!
//! let query = ProductQuery::new(12)
//!     .with_category(Some("Shoes".to_string()))
//!     .with_sort(SortOption::find_by_name("Price: Low - High"))
//!     .with_filters(&filters);
//!
//! assert_eq!(query.offset, 0);
//! ```

pub mod error;
pub mod ids;
pub mod price;

pub mod catalog;
pub mod search;

#[cfg(feature = "storage")]
pub mod storage;

pub use error::CommerceError;
pub use ids::*;
pub use price::Price;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::price::Price;

    // Catalog
    pub use crate::catalog::{Category, CategoryDirectory, Product};

    // Search
    pub use crate::search::{
        FilterState, PriceRange, ProductPage, ProductQuery, SortDirection, SortField, SortOption,
    };

    #[cfg(feature = "storage")]
    pub use crate::storage::CatalogRepository;
}
