//! Raw-unit amounts and denomination conversion.

use std::fmt;
use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::constants::Denomination;
use crate::decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("invalid amount: {0:?}")]
    Invalid(String),

    #[error("unknown denomination: {0:?}")]
    UnknownDenomination(String),
}

/// Arbitrary-precision integer amount.
///
/// Balances from the node are raw units, which routinely exceed `u64` (the
/// genesis supply is about 3.4 * 10^38 raw). On the wire an amount is always a
/// decimal string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(BigInt);

impl Amount {
    /// Zero raw.
    pub fn zero() -> Self {
        Self(BigInt::from(0))
    }

    /// Wrap a raw integer.
    pub fn new(value: impl Into<BigInt>) -> Self {
        Self(value.into())
    }

    /// Underlying raw integer.
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    /// True for zero raw.
    pub fn is_zero(&self) -> bool {
        self.0 == BigInt::from(0)
    }

    /// Parse a (possibly fractional) numeral in `unit` and return raw units.
    pub fn from_units(input: &str, unit: Denomination) -> Result<Self, AmountError> {
        convert_str(input, unit.as_str(), Denomination::Raw.as_str())
    }

    /// Express this raw amount in `unit`, truncating any remainder.
    pub fn to_units(&self, unit: Denomination) -> Self {
        convert(self, Denomination::Raw.as_str(), unit.as_str())
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(BigInt::from(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Accepts an integer numeral only. Use [`convert_str`] for fractional input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigInt::from_str(s.trim())
            .map(Self)
            .map_err(|_| AmountError::Invalid(s.to_string()))
    }
}

/// Shift `amount` from one unit key to another.
///
/// Unknown keys resolve to raw, so an unrecognized unit is an identity shift
/// rather than an error. Any fractional remainder is truncated toward zero.
pub fn convert(amount: &Amount, from: &str, to: &str) -> Amount {
    let places = Denomination::exponent_of(from) - Denomination::exponent_of(to);
    Amount(Decimal::from_integer(amount.0.clone()).shift(places).trunc())
}

/// Like [`convert`], but takes a decimal numeral which may carry fractional
/// digits in the source unit (for example `"1.5"` Mrai).
pub fn convert_str(input: &str, from: &str, to: &str) -> Result<Amount, AmountError> {
    let value: Decimal = input.parse()?;
    let places = Denomination::exponent_of(from) - Denomination::exponent_of(to);
    Ok(Amount(value.shift(places).trunc()))
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer amount as a decimal string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
                Ok(Amount::new(v))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
