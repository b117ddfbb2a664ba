//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues. The storefront trades in a single currency, and
//! amounts travel as plain decimal numbers (`49.99`) in JSON.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// A monetary amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { amount_cents: 0 };

    /// Create a new Money value from cents.
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use vitrine_commerce::money::Money;
    /// let price = Money::from_decimal(49.99);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self::new((amount * 100.0).round() as i64)
    }

    /// Convert to a decimal amount.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn checked_mul(&self, quantity: i64) -> Option<Self> {
        self.amount_cents.checked_mul(quantity).map(Self::new)
    }

    /// Add, returning `None` on overflow.
    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(Self::new)
    }

    /// A percentage of this amount, rounded to the nearest cent.
    pub fn percentage(&self, percent: f64) -> Self {
        Self::new((self.amount_cents as f64 * percent / 100.0).round() as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_add(other.amount_cents))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_sub(other.amount_cents))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.amount_cents % 100 == 0 {
            serializer.serialize_i64(self.amount_cents / 100)
        } else {
            serializer.serialize_f64(self.to_decimal())
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => n,
            RawAmount::Text(s) => s.trim().parse().map_err(serde::de::Error::custom)?,
        };
        if !amount.is_finite() {
            return Err(serde::de::Error::custom("amount must be finite"));
        }
        Ok(Money::from_decimal(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).amount_cents, 4999);
        assert_eq!(Money::from_decimal(0.1 + 0.2).amount_cents, 30);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(4999).to_string(), "49.99");
        assert_eq!(Money::new(-5).to_string(), "-0.05");
        assert_eq!(Money::new(1000).to_string(), "10.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(1000);
        let b = Money::new(250);
        assert_eq!(a + b, Money::new(1250));
        assert_eq!(a - b, Money::new(750));
        assert_eq!(a.checked_mul(3), Some(Money::new(3000)));
        assert_eq!(Money::new(i64::MAX).checked_mul(2), None);
        assert_eq!(vec![a, b].into_iter().sum::<Money>(), Money::new(1250));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(Money::new(10000).percentage(15.0), Money::new(1500));
        assert_eq!(Money::new(999).percentage(10.0), Money::new(100));
    }

    #[test]
    fn test_json_forms() {
        let m: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(m.amount_cents, 1250);
        let m: Money = serde_json::from_str("\"3.10\"").unwrap();
        assert_eq!(m.amount_cents, 310);
        assert_eq!(serde_json::to_string(&Money::new(1250)).unwrap(), "12.5");
        assert_eq!(serde_json::to_string(&Money::new(2000)).unwrap(), "20");
    }
}
