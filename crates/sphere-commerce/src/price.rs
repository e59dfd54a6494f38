//! Price type for catalog amounts.
//!
//! Amounts are held in minor units (cents) so that range comparisons and
//! sorting never touch floating point. On the wire a price is a decimal number
//! in major units (`49.99`), which is what the catalog API exchanges.

use crate::error::CommerceError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A catalog price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    cents: i64,
}

impl Price {
    /// Zero.
    pub const ZERO: Price = Price { cents: 0 };

    /// Create a price from minor units.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Create a price from a decimal amount in major units.
    ///
    /// ```
    /// use sphere_commerce::Price;
    /// assert_eq!(Price::from_major(49.99).cents(), 4999);
    /// ```
    pub fn from_major(amount: f64) -> Self {
        Self {
            cents: (amount * 100.0).round() as i64,
        }
    }

    /// Like [`Price::from_major`], but rejects NaN and infinities.
    pub fn try_from_major(amount: f64) -> Result<Self, CommerceError> {
        if !amount.is_finite() {
            return Err(CommerceError::ValidationError(format!(
                "price must be a finite number, got {}",
                amount
            )));
        }
        Ok(Self::from_major(amount))
    }

    /// Amount in minor units.
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Amount in major units.
    pub fn as_major(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Format for display (e.g., "$49.99").
    pub fn display(&self) -> String {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        format!("{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // NUMERIC columns often arrive as strings
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        let amount = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n,
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid price: {:?}", s)))?,
        };
        Price::try_from_major(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_rounds() {
        assert_eq!(Price::from_major(0.1 + 0.2).cents(), 30);
        assert_eq!(Price::from_major(19.995).cents(), 2000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(4999).to_string(), "$49.99");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::from_cents(-150).to_string(), "-$1.50");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&Price::from_cents(1250)).unwrap();
        assert_eq!(json, "12.5");

        let from_int: Price = serde_json::from_str("40").unwrap();
        assert_eq!(from_int.cents(), 4000);

        let from_text: Price = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(from_text.cents(), 1999);

        assert!(serde_json::from_str::<Price>("\"cheap\"").is_err());
    }

    #[test]
    fn test_non_finite_amounts_rejected() {
        assert!(Price::try_from_major(f64::NAN).is_err());
        assert!(Price::try_from_major(f64::INFINITY).is_err());
        assert_eq!(Price::try_from_major(12.5).unwrap().cents(), 1250);
        assert!(serde_json::from_str::<Price>("\"NaN\"").is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_major(9.99) < Price::from_major(10.0));
        assert_eq!(Price::default(), Price::ZERO);
    }
}
