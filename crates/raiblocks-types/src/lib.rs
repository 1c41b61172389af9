//! Core types and constants for talking to a RaiBlocks node.
//!
//! This crate provides the foundational types used by the RPC client:
//! protocol defaults, the denomination table, an exact decimal scaler and
//! the arbitrary-precision [`Amount`] used for every balance on the wire.

pub mod amount;
pub mod constants;
pub mod decimal;

pub use amount::{convert, convert_str, Amount, AmountError};
pub use constants::Denomination;
pub use decimal::Decimal;
