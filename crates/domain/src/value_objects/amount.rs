//! Monetary amount value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Number of fraction digits every stored amount carries.
pub const AMOUNT_SCALE: u32 = 2;

/// A non-negative money amount with exactly two fraction digits.
///
/// Input with more than two significant fraction digits is rejected rather
/// than rounded; `100` and `100.5` are accepted and stored as `100.00` and
/// `100.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn zero() -> Self {
        let mut value = Decimal::ZERO;
        value.rescale(AMOUNT_SCALE);
        Self(value)
    }

    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::validation("Amount cannot be negative"));
        }
        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(DomainError::validation(format!(
                "Amount cannot have more than {} decimal places",
                AMOUNT_SCALE
            )));
        }
        let mut value = value.abs();
        value.rescale(AMOUNT_SCALE);
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity, failing on overflow.
    pub fn times(&self, quantity: u32) -> Result<Self, DomainError> {
        let total = self
            .0
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| DomainError::validation("Amount overflow"))?;
        Self::new(total)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::parse(format!("Invalid amount '{}': {}", s, e)))?;
        Self::new(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Decimal {
        value.0
    }
}
