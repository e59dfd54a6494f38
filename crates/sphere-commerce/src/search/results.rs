//! Product search results.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// One page returned by the product search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products in this page.
    pub products: Vec<Product>,
    /// Number of products matching the criteria across all pages.
    #[serde(alias = "totalProducts", alias = "count")]
    pub total: usize,
}

impl ProductPage {
    pub fn new(products: Vec<Product>, total: usize) -> Self {
        Self { products, total }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Number of products in this page.
    pub fn len(&self) -> usize {
        self.products.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;

    #[test]
    fn test_len() {
        let products = (0..3i64)
            .map(|i| Product::new(i, format!("P{}", i), "Shoes", Price::from_major(10.0)))
            .collect();
        let page = ProductPage::new(products, 40);
        assert_eq!(page.len(), 3);
        assert!(!page.is_empty());
    }

    #[test]
    fn test_total_aliases() {
        let p: ProductPage = serde_json::from_str(r#"{"products": [], "totalProducts": 40}"#).unwrap();
        assert_eq!(p.total, 40);
        assert!(p.is_empty());
    }
}
