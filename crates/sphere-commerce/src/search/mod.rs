//! Search module.
//!
//! Contains the sort presets, filter state, product queries, and result pages
//! exchanged with the product search endpoint.

mod filter;
mod query;
mod results;
mod sort;

pub use filter::{FilterState, PriceRange};
pub use query::{ProductQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use results::ProductPage;
pub use sort::{SortDirection, SortField, SortOption};
