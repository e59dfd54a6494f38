//! Product types.

use crate::ids::ProductId;
use crate::price::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A product in the catalog.
///
/// Products are read-only from the storefront's point of view; they arrive in
/// pages from the product search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Name of the category this product belongs to.
    pub category: String,
    /// Unit price.
    pub price: Price,
    /// Sizes this product is offered in.
    #[serde(default)]
    pub sizes: BTreeSet<String>,
    /// Listing image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Creation time, used by the "What's new" sort.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a product with no sizes and no image, created now.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            sizes: BTreeSet::new(),
            image_url: None,
            created_at: Utc::now(),
        }
    }

    /// Add a size to this product.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.sizes.insert(size.into());
        self
    }

    /// Set the creation time.
    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Check whether the product is offered in the given size.
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.contains(size)
    }

    /// Check whether the product is offered in any of the given sizes.
    ///
    /// An empty selection matches every product.
    pub fn has_any_size(&self, sizes: &BTreeSet<String>) -> bool {
        sizes.is_empty() || !self.sizes.is_disjoint(sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_creation() {
        let product = Product::new(1, "Runner", "Shoes", Price::from_major(59.0))
            .with_size("42")
            .with_size("43");
        assert_eq!(product.category, "Shoes");
        assert!(product.has_size("42"));
        assert!(!product.has_size("44"));
    }

    #[test]
    fn test_has_any_size() {
        let product = Product::new(1, "Tee", "Shirts", Price::from_major(15.0)).with_size("M");

        assert!(product.has_any_size(&BTreeSet::new()));
        assert!(product.has_any_size(&["S".to_string(), "M".to_string()].into()));
        assert!(!product.has_any_size(&["XL".to_string()].into()));
    }

    #[test]
    fn test_product_wire_format() {
        let json = r#"{
            "id": 7,
            "name": "Trail Runner",
            "category": "Shoes",
            "price": 89.5,
            "sizes": ["42", "41"],
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.price.cents(), 8950);
        assert_eq!(product.sizes.iter().next().map(String::as_str), Some("41"));
        assert!(product.image_url.is_none());
    }
}
