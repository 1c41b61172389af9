//! Client session with an explicit node snapshot cache.
//!
//! A [`Session`] caches network-wide data (supply, counts, the frontier of
//! every account, peers) that history lookups depend on. The cache is filled
//! only by [`Session::initialize`] or [`Session::refresh`] and is never
//! invalidated behind the caller's back. It goes stale as the ledger grows;
//! use [`Session::age`] or [`Session::is_stale`] to decide when to refresh.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use raiblocks_types::{Amount, Denomination};

use crate::error::RpcError;
use crate::history;
use crate::node::{BlockCount, HistoryEntry, NodeRpc, Peers};

/// Network-wide data captured at one point in time.
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    /// Available supply in raw.
    pub available_supply: Amount,
    pub block_count: BlockCount,
    pub frontier_count: u64,
    /// Head block hash per account.
    pub frontiers: HashMap<String, String>,
    pub peers: Peers,
    pub fetched_at: Instant,
}

pub struct Session {
    node: NodeRpc,
    snapshot: Option<NodeSnapshot>,
}

impl Session {
    pub fn new(node: NodeRpc) -> Self {
        Self {
            node,
            snapshot: None,
        }
    }

    pub fn node(&self) -> &NodeRpc {
        &self.node
    }

    /// Fill the cache for the first time. Equivalent to [`refresh`](Self::refresh).
    pub async fn initialize(&mut self) -> Result<&NodeSnapshot, RpcError> {
        self.refresh().await
    }

    /// Refetch every cached value. On error the previous snapshot is kept.
    pub async fn refresh(&mut self) -> Result<&NodeSnapshot, RpcError> {
        let available_supply = self.node.available_supply(Denomination::Raw).await?;
        let block_count = self.node.block_count().await?;
        let frontier_count = self.node.frontier_count().await?;
        let frontiers = self.node.all_frontiers().await?;
        let peers = self.node.peers().await?;
        log::debug!(
            "session refreshed: {} blocks, {} frontiers, {} peers",
            block_count.count,
            frontiers.len(),
            peers.peers.len()
        );
        Ok(&*self.snapshot.insert(NodeSnapshot {
            available_supply,
            block_count,
            frontier_count,
            frontiers,
            peers,
            fetched_at: Instant::now(),
        }))
    }

    pub fn snapshot(&self) -> Option<&NodeSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Time since the last successful refresh.
    pub fn age(&self) -> Option<Duration> {
        self.snapshot.as_ref().map(|s| s.fetched_at.elapsed())
    }

    /// True when there is no snapshot or it is older than `max_age`.
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.age().map_or(true, |age| age > max_age)
    }

    /// Cached frontier of `account`.
    pub fn frontier(&self, account: &str) -> Result<Option<&str>, RpcError> {
        let snapshot = self.snapshot.as_ref().ok_or(RpcError::NotInitialized)?;
        Ok(snapshot.frontiers.get(account).map(String::as_str))
    }

    /// Full history of `account`, including representative changes.
    ///
    /// Returns `Ok(None)` when the cached frontiers do not know the account.
    pub async fn account_history(
        &self,
        account: &str,
    ) -> Result<Option<Vec<HistoryEntry>>, RpcError> {
        let Some(frontier) = self.frontier(account)? else {
            log::warn!("empty account {}", account);
            return Ok(None);
        };
        history::reconcile(&self.node, frontier).await.map(Some)
    }
}
