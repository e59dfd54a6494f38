//! Listing filters.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::price::Price;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive price bounds. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<Price>,
    pub max: Option<Price>,
}

impl PriceRange {
    /// Create a range, rejecting a lower bound above the upper bound.
    pub fn new(min: Option<Price>, max: Option<Price>) -> Result<Self, CommerceError> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(CommerceError::InvalidPriceRange {
                    min: lo.to_string(),
                    max: hi.to_string(),
                });
            }
        }
        Ok(Self { min, max })
    }

    /// Range between two prices.
    pub fn between(min: Price, max: Price) -> Result<Self, CommerceError> {
        Self::new(Some(min), Some(max))
    }

    /// Range with no bounds.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: Price) -> bool {
        self.min.map_or(true, |lo| price >= lo) && self.max.map_or(true, |hi| price <= hi)
    }

    /// Wire form `min,max` in major units, with an open side left blank.
    /// Returns `None` for an unbounded range.
    pub fn to_wire(&self) -> Option<String> {
        if self.is_unbounded() {
            return None;
        }
        let side = |p: Option<Price>| p.map(|p| p.as_major().to_string()).unwrap_or_default();
        Some(format!("{},{}", side(self.min), side(self.max)))
    }

    /// Parse the `min,max` wire form.
    pub fn from_wire(s: &str) -> Result<Self, CommerceError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::unbounded());
        }
        let (lo, hi) = s.split_once(',').ok_or_else(|| {
            CommerceError::ValidationError(format!("priceRange must be \"min,max\": {:?}", s))
        })?;
        let parse = |part: &str| -> Result<Option<Price>, CommerceError> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            let amount = part
                .parse::<f64>()
                .map_err(|_| CommerceError::ValidationError(format!("invalid price {:?}", part)))?;
            Price::try_from_major(amount).map(Some)
        };
        Self::new(parse(lo)?, parse(hi)?)
    }
}

/// User-selected listing filters.
///
/// Reset whenever the shopper navigates away from the listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected sizes; empty means any size.
    pub sizes: BTreeSet<String>,
    pub price_range: PriceRange,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a size, or deselect it if already selected.
    pub fn toggle_size(&mut self, size: impl Into<String>) {
        let size = size.into();
        if !self.sizes.remove(&size) {
            self.sizes.insert(size);
        }
    }

    pub fn set_sizes(&mut self, sizes: impl IntoIterator<Item = String>) {
        self.sizes = sizes.into_iter().collect();
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.price_range = range;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether no filter is active.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty() && self.price_range.is_unbounded()
    }

    /// Check a product against these filters.
    pub fn matches(&self, product: &Product) -> bool {
        self.price_range.contains(product.price) && product.has_any_size(&self.sizes)
    }
}
