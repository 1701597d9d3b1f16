//! Money represented as an integer count of minor units.

use serde::{Deserialize, Serialize};

/// An amount of money in a given currency.
///
/// The amount is a count of minor units (e.g. cents, or whole rupiah for
/// `IDR`), so no floating point is ever involved. The currency code is opaque
/// and is not checked against any ISO list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub currency: String,
    pub amount: i64,
}

impl Money {
    /// Creates a money value.
    pub fn new(currency: impl Into<String>, amount: i64) -> Self {
        Self {
            currency: currency.into(),
            amount,
        }
    }

    /// Returns zero in the given currency.
    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(currency, 0)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    pub fn checked_times(&self, quantity: i64) -> Option<Money> {
        self.amount
            .checked_mul(quantity)
            .map(|amount| Money::new(self.currency.clone(), amount))
    }

    /// Adds an amount of the same currency, returning `None` on overflow.
    ///
    /// The currency of `self` is kept; callers decide what mixing currencies
    /// means.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(self.currency.clone(), amount))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_new() {
        let money = Money::new("IDR", 1000);
        assert_eq!(money.currency, "IDR");
        assert_eq!(money.amount, 1000);
    }

    #[test]
    fn test_money_zero() {
        assert_eq!(Money::zero("USD"), Money::new("USD", 0));
    }

    #[test]
    fn test_checked_times() {
        let unit = Money::new("IDR", 500);
        assert_eq!(unit.checked_times(3), Some(Money::new("IDR", 1500)));
        assert_eq!(Money::new("IDR", i64::MAX).checked_times(2), None);
    }

    #[test]
    fn test_checked_add_keeps_left_currency() {
        let a = Money::new("IDR", 2000);
        let b = Money::new("IDR", 1500);
        assert_eq!(a.checked_add(&b), Some(Money::new("IDR", 3500)));
        assert_eq!(Money::new("IDR", i64::MAX).checked_add(&b), None);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new("IDR", 3500).to_string(), "IDR 3500");
    }

    #[test]
    fn test_money_serialization() {
        let money = Money::new("IDR", 3500);
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json, serde_json::json!({"currency": "IDR", "amount": 3500}));
    }
}
