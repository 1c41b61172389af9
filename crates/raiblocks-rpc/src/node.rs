//! Node RPC façade.
//!
//! Typed async methods for the node actions the history reconciler and the
//! session cache rely on, plus a few read-only queries around them.

use std::collections::BTreeMap;
use std::collections::HashMap;

use raiblocks_types::constants::{DEFAULT_CHAIN_COUNT, DEFAULT_FRONTIER_COUNT, WILDCARD_ACCOUNT};
use raiblocks_types::{Amount, Denomination};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{RpcClient, RpcConfig};
use crate::error::RpcError;
use crate::request::Request;

// =============================================================================
// Wire Helpers
// =============================================================================

/// The node writes an empty list or map as `""`.
fn empty_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(ref s) if s.is_empty() => Ok(T::default()),
        Value::Null => Ok(T::default()),
        other => T::deserialize(other).map_err(D::Error::custom),
    }
}

/// Counts arrive as decimal strings.
fn u64_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => s.parse().map_err(D::Error::custom),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom("count out of range")),
        other => Err(D::Error::custom(format!("expected count, got {}", other))),
    }
}

/// Booleans arrive as `"1"` / `"0"`.
fn bool_from_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(s == "1" || s.eq_ignore_ascii_case("true"))
}

// =============================================================================
// Response Types
// =============================================================================

/// Block type as reported by `history` and `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Send,
    Receive,
    Open,
    Change,
    #[serde(other)]
    Unknown,
}

/// One entry of an account history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub account: String,
    pub amount: Amount,
    pub hash: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
}

/// Block contents, decoded from the JSON text the node embeds in `block`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockContents {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub representative: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    /// Catch-all for type-specific fields (signature, work, balance, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockResponse {
    pub contents: String,
}

impl BlockResponse {
    /// Parse the embedded block JSON.
    pub fn decode(&self) -> Result<BlockContents, RpcError> {
        serde_json::from_str(&self.contents).map_err(|e| RpcError::decode("block", e))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, deserialize_with = "empty_as_default")]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainResponse {
    #[serde(default, deserialize_with = "empty_as_default")]
    pub blocks: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrontiersResponse {
    #[serde(default, deserialize_with = "empty_as_default")]
    pub frontiers: HashMap<String, String>,
}

/// Response from `block_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BlockCount {
    #[serde(deserialize_with = "u64_from_str")]
    pub count: u64,
    #[serde(default, deserialize_with = "u64_from_str")]
    pub unchecked: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct CountResponse {
    #[serde(deserialize_with = "u64_from_str")]
    count: u64,
}

/// Connected peers, keyed by `[address]:port`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Peers {
    #[serde(default, deserialize_with = "empty_as_default")]
    pub peers: BTreeMap<String, Value>,
}

/// Response from `version`.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    pub rpc_version: String,
    pub store_version: String,
    pub node_vendor: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountBalance {
    pub balance: Amount,
    #[serde(default)]
    pub pending: Amount,
}

#[derive(Debug, Clone, Deserialize)]
struct WeightResponse {
    weight: Amount,
}

#[derive(Debug, Clone, Deserialize)]
struct SupplyResponse {
    available: Amount,
}

#[derive(Debug, Clone, Deserialize)]
struct AccountResponse {
    account: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ValidResponse {
    #[serde(deserialize_with = "bool_from_flag")]
    valid: bool,
}

// =============================================================================
// NodeRpc
// =============================================================================

/// Async RPC façade for a RaiBlocks node.
#[derive(Clone)]
pub struct NodeRpc {
    client: RpcClient,
}

impl NodeRpc {
    /// Create a façade for the node at `url`.
    pub fn new(url: &str) -> Result<Self, RpcError> {
        Ok(Self {
            client: RpcClient::new(url)?,
        })
    }

    /// Create with full configuration.
    pub fn with_config(config: RpcConfig) -> Result<Self, RpcError> {
        Ok(Self {
            client: RpcClient::with_config(config)?,
        })
    }

    /// Get the underlying RPC client for custom calls.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Balance of `account`, converted to `unit` (truncated).
    pub async fn account_balance(
        &self,
        account: &str,
        unit: Denomination,
    ) -> Result<Amount, RpcError> {
        let resp: AccountBalance = self
            .client
            .call_as(&Request::AccountBalance {
                account: account.to_string(),
            })
            .await?;
        Ok(resp.balance.to_units(unit))
    }

    /// Voting weight delegated to `account`, converted to `unit`.
    pub async fn account_weight(
        &self,
        account: &str,
        unit: Denomination,
    ) -> Result<Amount, RpcError> {
        let resp: WeightResponse = self
            .client
            .call_as(&Request::AccountWeight {
                account: account.to_string(),
            })
            .await?;
        Ok(resp.weight.to_units(unit))
    }

    /// Check the account number's checksum.
    pub async fn validate_account_number(&self, account: &str) -> Result<bool, RpcError> {
        let resp: ValidResponse = self
            .client
            .call_as(&Request::ValidateAccountNumber {
                account: account.to_string(),
            })
            .await?;
        Ok(resp.valid)
    }

    /// Frontier (head block hash) per account, starting at `account`.
    pub async fn frontiers(
        &self,
        account: &str,
        count: u32,
    ) -> Result<HashMap<String, String>, RpcError> {
        let resp: FrontiersResponse = self
            .client
            .call_as(&Request::Frontiers {
                account: account.to_string(),
                count,
            })
            .await?;
        Ok(resp.frontiers)
    }

    /// Frontiers of all accounts, up to 1,048,576 of them.
    pub async fn all_frontiers(&self) -> Result<HashMap<String, String>, RpcError> {
        self.frontiers(WILDCARD_ACCOUNT, DEFAULT_FRONTIER_COUNT).await
    }

    /// Number of accounts in the ledger.
    pub async fn frontier_count(&self) -> Result<u64, RpcError> {
        let resp: CountResponse = self.client.call_as(&Request::FrontierCount).await?;
        Ok(resp.count)
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Contents of the block `hash`.
    pub async fn block(&self, hash: &str) -> Result<BlockContents, RpcError> {
        let resp: BlockResponse = self.client.call_as(&Request::block(hash)).await?;
        resp.decode()
    }

    /// Account that owns the block `hash`.
    pub async fn block_account(&self, hash: &str) -> Result<String, RpcError> {
        let resp: AccountResponse = self
            .client
            .call_as(&Request::BlockAccount {
                hash: hash.to_string(),
            })
            .await?;
        Ok(resp.account)
    }

    /// Checked and unchecked block counts.
    pub async fn block_count(&self) -> Result<BlockCount, RpcError> {
        self.client.call_as(&Request::BlockCount).await
    }

    /// Block hashes from `block` backward, at most `count` of them.
    pub async fn chain(&self, block: &str, count: u32) -> Result<Vec<String>, RpcError> {
        let resp: ChainResponse = self
            .client
            .call_as(&Request::Chain {
                block: block.to_string(),
                count,
            })
            .await?;
        Ok(resp.blocks)
    }

    /// Send/receive history from `hash` backward. Change blocks are omitted
    /// by the node; see [`crate::history`] for the reconciled view.
    pub async fn history(&self, hash: &str, count: u32) -> Result<Vec<HistoryEntry>, RpcError> {
        let resp: HistoryResponse = self
            .client
            .call_as(&Request::History {
                hash: hash.to_string(),
                count,
            })
            .await?;
        Ok(resp.history)
    }

    // =========================================================================
    // Network
    // =========================================================================

    /// Supply outside the genesis and burn accounts, converted to `unit`.
    pub async fn available_supply(&self, unit: Denomination) -> Result<Amount, RpcError> {
        let resp: SupplyResponse = self.client.call_as(&Request::AvailableSupply).await?;
        Ok(resp.available.to_units(unit))
    }

    /// Peers the node is connected to.
    pub async fn peers(&self) -> Result<Peers, RpcError> {
        self.client.call_as(&Request::Peers).await
    }

    /// Node version information.
    pub async fn version(&self) -> Result<VersionInfo, RpcError> {
        self.client.call_as(&Request::Version).await
    }

    /// RPC protocol version.
    pub async fn rpc_version(&self) -> Result<String, RpcError> {
        Ok(self.version().await?.rpc_version)
    }

    /// Ledger store version.
    pub async fn store_version(&self) -> Result<String, RpcError> {
        Ok(self.version().await?.store_version)
    }

    /// Node vendor string, e.g. `RaiBlocks 9.0`.
    pub async fn node_vendor(&self) -> Result<String, RpcError> {
        Ok(self.version().await?.node_vendor)
    }

    /// `history` and `chain` with the default depth of 4096.
    pub(crate) async fn history_and_chain(
        &self,
        frontier: &str,
    ) -> Result<(Vec<HistoryEntry>, Vec<String>), RpcError> {
        let history = self.history(frontier, DEFAULT_CHAIN_COUNT).await?;
        let chain = self.chain(frontier, DEFAULT_CHAIN_COUNT).await?;
        Ok((history, chain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_history_entry_deserialize() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "hash": "E71AF3E9DD86BBD8B4620EFA63E065B34D358CFC091ACB4E103B965F95783321",
            "type": "receive",
            "account": "xrb_3e3j5tkog48pnny9dmfzj1r16pg8t1e76dz5tmac6iq689wyjfpiij4txtdo",
            "amount": "100000000000000000000000000000000"
        }))
        .unwrap();
        assert_eq!(entry.kind, BlockKind::Receive);
        assert_eq!(entry.amount.to_units(Denomination::MegaRai).to_string(), "100");
    }

    #[test]
    fn test_empty_history_is_empty_string() {
        let resp: HistoryResponse = serde_json::from_value(json!({ "history": "" })).unwrap();
        assert!(resp.history.is_empty());
        let resp: ChainResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.blocks.is_empty());
    }

    #[test]
    fn test_block_contents_decode() {
        let resp = BlockResponse {
            contents: json!({
                "type": "change",
                "previous": "F47B23107E5F34B2CE06F562B5C435DF72A533251CB414C51B2B62A8F63A00E4",
                "representative": "xrb_1anrzcuwe64rwxzcco8dkhpyxpi8kd7zsjc1oeimpc3ppca4mrjtwnqposrs",
                "work": "fbffed7c73b61367",
                "signature": "00"
            })
            .to_string(),
        };
        let block = resp.decode().unwrap();
        assert_eq!(block.kind, BlockKind::Change);
        assert!(block.representative.unwrap().starts_with("xrb_1anr"));
        assert!(block.extra.contains_key("work"));
    }

    #[test]
    fn test_unknown_block_kind() {
        let block: BlockContents = serde_json::from_value(json!({ "type": "state" })).unwrap();
        assert_eq!(block.kind, BlockKind::Unknown);
    }

    #[test]
    fn test_block_count_strings() {
        let count: BlockCount =
            serde_json::from_value(json!({ "count": "1000", "unchecked": "10" })).unwrap();
        assert_eq!(count, BlockCount { count: 1000, unchecked: 10 });
    }

    #[test]
    fn test_valid_flag() {
        let v: ValidResponse = serde_json::from_value(json!({ "valid": "1" })).unwrap();
        assert!(v.valid);
        let v: ValidResponse = serde_json::from_value(json!({ "valid": "0" })).unwrap();
        assert!(!v.valid);
    }

    #[test]
    fn test_peers_map() {
        let peers: Peers = serde_json::from_value(json!({
            "peers": { "[::ffff:172.17.0.1]:32841": "3" }
        }))
        .unwrap();
        assert_eq!(peers.peers.len(), 1);
        let none: Peers = serde_json::from_value(json!({ "peers": "" })).unwrap();
        assert!(none.peers.is_empty());
    }
}
