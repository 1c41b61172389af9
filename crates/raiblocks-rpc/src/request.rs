//! Request envelopes.
//!
//! Every request is a JSON object with an `action` discriminator. The node
//! expects all values as strings, counts included, so nothing numeric is ever
//! sent as a JSON number.

use std::fmt::Display;

use raiblocks_types::constants::{DEFAULT_CHAIN_COUNT, DEFAULT_FRONTIER_COUNT, WILDCARD_ACCOUNT};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    AccountBalance {
        account: String,
    },
    AccountWeight {
        account: String,
    },
    AvailableSupply,
    Block {
        hash: String,
    },
    BlockAccount {
        hash: String,
    },
    BlockCount,
    Chain {
        block: String,
        #[serde(serialize_with = "as_string")]
        count: u32,
    },
    FrontierCount,
    Frontiers {
        account: String,
        #[serde(serialize_with = "as_string")]
        count: u32,
    },
    History {
        hash: String,
        #[serde(serialize_with = "as_string")]
        count: u32,
    },
    Peers,
    ValidateAccountNumber {
        account: String,
    },
    Version,
}

impl Request {
    /// The `action` field, for diagnostics.
    pub fn action(&self) -> &'static str {
        match self {
            Request::AccountBalance { .. } => "account_balance",
            Request::AccountWeight { .. } => "account_weight",
            Request::AvailableSupply => "available_supply",
            Request::Block { .. } => "block",
            Request::BlockAccount { .. } => "block_account",
            Request::BlockCount => "block_count",
            Request::Chain { .. } => "chain",
            Request::FrontierCount => "frontier_count",
            Request::Frontiers { .. } => "frontiers",
            Request::History { .. } => "history",
            Request::Peers => "peers",
            Request::ValidateAccountNumber { .. } => "validate_account_number",
            Request::Version => "version",
        }
    }

    /// `chain` walk from `block` with the default depth.
    pub fn chain(block: &str) -> Self {
        Request::Chain {
            block: block.to_string(),
            count: DEFAULT_CHAIN_COUNT,
        }
    }

    /// `history` walk from `hash` with the default depth.
    pub fn history(hash: &str) -> Self {
        Request::History {
            hash: hash.to_string(),
            count: DEFAULT_CHAIN_COUNT,
        }
    }

    pub fn block(hash: &str) -> Self {
        Request::Block {
            hash: hash.to_string(),
        }
    }

    /// Frontiers of every account, up to the default cap.
    pub fn all_frontiers() -> Self {
        Request::Frontiers {
            account: WILDCARD_ACCOUNT.to_string(),
            count: DEFAULT_FRONTIER_COUNT,
        }
    }
}

fn as_string<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
