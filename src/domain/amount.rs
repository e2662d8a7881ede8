//! Amount type
//!
//! Domain primitive for expense amounts. Amounts are rounded to cents and
//! validated at construction time, so an `Expense` can never carry a zero
//! or negative value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stored decimal places (cents)
const CENTS_SCALE: u32 = 2;

/// Amount represents a validated expense value.
///
/// # Invariants
/// - Value is always positive (>= 0.01)
/// - At most 2 decimal places; finer input is rounded half-to-even
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use expense_tracker::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(4250, 2)).unwrap();
/// assert_eq!(amount.to_string(), "42.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be greater than 0 (got {0})")]
    NotPositive(Decimal),

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0, or if it rounds to 0.00
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        let rounded = value.round_dp(CENTS_SCALE);
        if rounded <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        Ok(Self(rounded))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| AmountError::ParseError(e.to_string()))?;
        Amount::new(decimal)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Amount::from_str(&value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(dec!(50.00));
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), dec!(50));
    }

    #[test]
    fn test_amount_zero_rejected() {
        let amount = Amount::new(Decimal::ZERO);
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_negative_rejected() {
        let amount = Amount::new(dec!(-0.01));
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_smallest_cent_ok() {
        assert!(Amount::new(dec!(0.01)).is_ok());
    }

    #[test]
    fn test_amount_sub_cent_rounded_half_even() {
        assert_eq!(Amount::new(dec!(12.345)).unwrap().value(), dec!(12.34));
        assert_eq!(Amount::new(dec!(12.355)).unwrap().value(), dec!(12.36));
        assert_eq!(Amount::new(dec!(10.006)).unwrap().to_string(), "10.01");
    }

    #[test]
    fn test_amount_rounding_to_zero_rejected() {
        let amount = Amount::new(dec!(0.004));
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_trailing_zeros_ok() {
        let amount = Amount::new(dec!(12.5000)).unwrap();
        assert_eq!(amount.to_string(), "12.50");
    }

    #[test]
    fn test_amount_has_no_upper_bound() {
        let amount = Amount::new(dec!(2000000000)).unwrap();
        assert_eq!(amount.to_string(), "2000000000.00");
    }

    #[test]
    fn test_amount_from_str() {
        let amount: Amount = " 19.9 ".parse().unwrap();
        assert_eq!(amount.value(), dec!(19.9));
        assert_eq!(amount.to_string(), "19.90");

        let bad: Result<Amount, _> = "ten".parse();
        assert!(matches!(bad, Err(AmountError::ParseError(_))));
    }

    #[test]
    fn test_amount_serializes_as_two_decimal_string() {
        let amount = Amount::new(dec!(7)).unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"7.00\"");
    }
}
