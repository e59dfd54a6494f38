//! Sort options for product listings.

use crate::error::CommerceError;
use serde::Serialize;
use std::fmt;

/// Field a listing can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Price,
    Date,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Date => "date",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "price" => Some(SortField::Price),
            "date" => Some(SortField::Date),
            _ => None,
        }
    }

    /// Column this field sorts on.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Price => "price_cents",
            SortField::Date => "created_at",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// One of the storefront's sort presets.
///
/// The listing holds at most one of these at a time; `None` means the
/// server's default order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SortOption {
    pub field: SortField,
    pub direction: SortDirection,
    /// Label shown in the sort selector.
    pub name: &'static str,
}

impl SortOption {
    pub const PRICE_LOW_HIGH: SortOption = SortOption {
        field: SortField::Price,
        direction: SortDirection::Asc,
        name: "Price: Low - High",
    };

    pub const PRICE_HIGH_LOW: SortOption = SortOption {
        field: SortField::Price,
        direction: SortDirection::Desc,
        name: "Price: High - Low",
    };

    pub const WHATS_NEW: SortOption = SortOption {
        field: SortField::Date,
        direction: SortDirection::Desc,
        name: "What's new",
    };

    /// Presets in selector order.
    pub const ALL: [SortOption; 3] = [
        SortOption::PRICE_LOW_HIGH,
        SortOption::PRICE_HIGH_LOW,
        SortOption::WHATS_NEW,
    ];

    /// Find a preset by its label. Unknown labels select no sort.
    pub fn find_by_name(name: &str) -> Option<SortOption> {
        Self::ALL.into_iter().find(|o| o.name == name)
    }

    /// Find the preset matching a field and direction.
    pub fn from_parts(field: SortField, direction: SortDirection) -> Option<SortOption> {
        Self::ALL
            .into_iter()
            .find(|o| o.field == field && o.direction == direction)
    }

    /// Parse the `sortBy`/`orderBy` pair of a product request.
    ///
    /// Both empty means no sort. Anything else must name a preset.
    pub fn from_wire(sort_by: &str, order_by: &str) -> Result<Option<SortOption>, CommerceError> {
        if sort_by.is_empty() && order_by.is_empty() {
            return Ok(None);
        }
        let field = SortField::parse(sort_by)
            .ok_or_else(|| CommerceError::InvalidSort(format!("unknown sortBy {:?}", sort_by)))?;
        let direction = SortDirection::parse(order_by)
            .ok_or_else(|| CommerceError::InvalidSort(format!("unknown orderBy {:?}", order_by)))?;
        Self::from_parts(field, direction).map(Some).ok_or_else(|| {
            CommerceError::InvalidSort(format!("{} {}", field.as_str(), direction.as_str()))
        })
    }

    /// SQL ORDER BY clause for this option.
    pub fn to_sql(&self) -> String {
        format!(
            "{} {}",
            self.field.column(),
            self.direction.as_str().to_uppercase()
        )
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
