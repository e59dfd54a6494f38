//! Product catalog module.
//!
//! Contains types for products and categories, and the slug-addressed
//! category directory used to resolve a browsing context.

mod category;
mod product;

pub use category::{Category, CategoryDirectory};
pub use product::Product;
