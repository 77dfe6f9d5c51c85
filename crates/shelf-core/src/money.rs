//! # Money
//!
//! Dollar amounts held in integer cents so cart totals are exact.
//! On the wire (catalog files, persisted carts, JSON responses) an amount
//! is a plain decimal number such as `12.99`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// A non-negative amount in cents
///
/// Arithmetic saturates at the `i64` bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Create from cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create from a decimal dollar amount, rounding to the nearest cent
    pub fn from_decimal(amount: f64) -> Self {
        Self((amount * 100.0).round() as i64)
    }

    /// Amount in cents
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Amount as a decimal number of dollars
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtract, flooring at zero
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        format!("${:.2}", self.as_decimal())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "amount must be a non-negative number, got {}",
                amount
            )));
        }
        Ok(Money::from_decimal(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(Money::from_decimal(10.99).cents(), 1099);
        assert_eq!(Money::from_cents(1099).as_decimal(), 10.99);
        // 0.1 + 0.2 style drift is rounded away
        assert_eq!(Money::from_decimal(14.989999999).cents(), 1499);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_decimal(29.99).display(), "$29.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let price = Money::from_decimal(12.50);
        assert_eq!((price * 3).cents(), 3750);
        assert_eq!(
            Money::from_cents(100).saturating_sub(Money::from_cents(250)),
            Money::ZERO
        );
        let total: Money = [Money::from_cents(1), Money::from_cents(2)].into_iter().sum();
        assert_eq!(total.cents(), 3);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_decimal(1e17);
        assert_eq!(huge.cents(), i64::MAX);
        assert_eq!((huge * 2).cents(), i64::MAX);
        assert_eq!((huge + Money::from_cents(599)).cents(), i64::MAX);

        let total: Money = [huge, huge].into_iter().sum();
        assert_eq!(total, huge);
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&Money::from_cents(1250)).unwrap();
        assert_eq!(json, "12.5");

        let parsed: Money = serde_json::from_str("7.99").unwrap();
        assert_eq!(parsed.cents(), 799);

        assert!(serde_json::from_str::<Money>("-1.0").is_err());
    }
}
