//! Exact decimal scaling.
//!
//! Denominations differ by up to 39 orders of magnitude, far past what an
//! `f64` can hold exactly, so every shift is a change of decimal exponent on
//! an arbitrary-precision mantissa.

use std::fmt;
use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, RoundingMode};

use crate::amount::AmountError;

/// Largest decimal exponent accepted from textual input.
pub const MAX_EXPONENT: i64 = 4096;

/// Arbitrary-precision decimal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal(BigDecimal);

impl Decimal {
    /// Wrap an integer.
    pub fn from_integer(value: BigInt) -> Self {
        Self(BigDecimal::new(value, 0))
    }

    /// Multiply by `10^places` (divide when `places` is negative).
    pub fn shift(&self, places: i64) -> Self {
        let (digits, scale) = self.0.as_bigint_and_exponent();
        Self(BigDecimal::new(digits, scale - places))
    }

    /// Integer part, truncated toward zero.
    pub fn trunc(&self) -> BigInt {
        let (digits, _) = self
            .0
            .with_scale_round(0, RoundingMode::Down)
            .into_bigint_and_exponent();
        digits
    }

    /// Render with no fractional digits, truncating toward zero.
    pub fn to_fixed_zero(&self) -> String {
        self.trunc().to_string()
    }
}

impl FromStr for Decimal {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Invalid(s.to_string()));
        }
        let value =
            BigDecimal::from_str(trimmed).map_err(|_| AmountError::Invalid(s.to_string()))?;
        let (_, scale) = value.as_bigint_and_exponent();
        if scale.abs() > MAX_EXPONENT {
            return Err(AmountError::Invalid(s.to_string()));
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
