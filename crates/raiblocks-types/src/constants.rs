//! Protocol constants and the denomination table.

use std::fmt;
use std::str::FromStr;

use crate::amount::AmountError;

// =============================================================================
// Endpoint Defaults
// =============================================================================

/// Scheme used when the base URL does not name one.
pub const DEFAULT_SCHEME: &str = "http";

/// Host used when no base URL is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Node RPC port.
pub const DEFAULT_PORT: u16 = 7076;

// =============================================================================
// Request Defaults
// =============================================================================

/// Account that matches every account in a `frontiers` listing.
pub const WILDCARD_ACCOUNT: &str =
    "xrb_1111111111111111111111111111111111111111111111111117353trpda";

/// Default cap on the number of frontiers returned.
pub const DEFAULT_FRONTIER_COUNT: u32 = 1_048_576;

/// Default traversal depth for `chain` and `history`.
pub const DEFAULT_CHAIN_COUNT: u32 = 4096;

// =============================================================================
// Denominations
// =============================================================================

/// Named denominations, each a power-of-ten multiple of raw.
///
/// `prai`, `Trai` and `Prai` are draft units and may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denomination {
    Raw,
    PicoRai,
    MicroRai,
    MilliRai,
    Rai,
    KiloRai,
    MegaRai,
    GigaRai,
    TeraRai,
    PetaRai,
}

impl Denomination {
    pub const ALL: [Denomination; 10] = [
        Denomination::Raw,
        Denomination::PicoRai,
        Denomination::MicroRai,
        Denomination::MilliRai,
        Denomination::Rai,
        Denomination::KiloRai,
        Denomination::MegaRai,
        Denomination::GigaRai,
        Denomination::TeraRai,
        Denomination::PetaRai,
    ];

    /// Decimal exponent relative to raw.
    pub fn exponent(self) -> i64 {
        match self {
            Denomination::Raw => 0,
            Denomination::PicoRai => 15,
            Denomination::MicroRai => 18,
            Denomination::MilliRai => 21,
            Denomination::Rai => 24,
            Denomination::KiloRai => 27,
            Denomination::MegaRai => 30,
            Denomination::GigaRai => 33,
            Denomination::TeraRai => 36,
            Denomination::PetaRai => 39,
        }
    }

    /// Unit key as used by the node and its wallets (case-sensitive).
    pub fn as_str(self) -> &'static str {
        match self {
            Denomination::Raw => "raw",
            Denomination::PicoRai => "prai",
            Denomination::MicroRai => "urai",
            Denomination::MilliRai => "mrai",
            Denomination::Rai => "rai",
            Denomination::KiloRai => "krai",
            Denomination::MegaRai => "Mrai",
            Denomination::GigaRai => "Grai",
            Denomination::TeraRai => "Trai",
            Denomination::PetaRai => "Prai",
        }
    }

    /// Whether the unit is still a draft.
    pub fn is_draft(self) -> bool {
        matches!(
            self,
            Denomination::PicoRai | Denomination::TeraRai | Denomination::PetaRai
        )
    }

    /// Look up a unit key, returning `None` for anything unrecognized.
    pub fn lookup(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == key)
    }

    /// Exponent for a unit key. Unknown keys resolve to raw (0).
    pub fn exponent_of(key: &str) -> i64 {
        Self::lookup(key).map_or(0, Denomination::exponent)
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Denomination {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| AmountError::UnknownDenomination(s.to_string()))
    }
}
