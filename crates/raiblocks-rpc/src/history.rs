//! Account history reconciliation.
//!
//! The node's `history` action lists sends and receives but silently drops
//! representative changes. `chain` lists every block hash. Both walk from the
//! frontier backward, so walking them side by side and looking up each hash
//! that `history` skipped recovers the missing change entries.
//!
//! The two lists come from separate round trips, so the ledger may advance
//! between them; the result is best-effort, not a snapshot.

use raiblocks_types::Amount;

use crate::blocking::BlockingRpcClient;
use crate::error::RpcError;
use crate::node::{
    BlockContents, BlockKind, BlockResponse, ChainResponse, HistoryEntry, HistoryResponse, NodeRpc,
};
use crate::request::Request;

/// Splices synthetic change entries into a history, driven by its chain.
///
/// Transport-agnostic: the caller fetches the block for every hash returned
/// by [`next_divergence`](Self::next_divergence) and passes it to
/// [`resolve`](Self::resolve).
#[derive(Debug, Clone)]
pub struct Reconciler {
    entries: Vec<HistoryEntry>,
    chain: Vec<String>,
    position: usize,
}

impl Reconciler {
    pub fn new(history: Vec<HistoryEntry>, chain: Vec<String>) -> Self {
        Self {
            entries: history,
            chain,
            position: 0,
        }
    }

    /// Advance to the next chain hash without a matching history entry.
    ///
    /// Returns the same hash until [`resolve`](Self::resolve) is called.
    pub fn next_divergence(&mut self) -> Option<&str> {
        while self.position < self.chain.len() {
            let expected = &self.chain[self.position];
            match self.entries.get(self.position) {
                Some(entry) if &entry.hash == expected => self.position += 1,
                _ => return Some(expected.as_str()),
            }
        }
        None
    }

    /// Settle the current divergence with the block found at its hash.
    ///
    /// A change block becomes a zero-amount entry crediting the new
    /// representative. Any other block type adds nothing.
    pub fn resolve(&mut self, block: &BlockContents) {
        let Some(hash) = self.chain.get(self.position) else {
            return;
        };
        if block.kind == BlockKind::Change {
            let representative = block.representative.clone().unwrap_or_else(|| {
                log::warn!("change block {} has no representative", hash);
                String::new()
            });
            self.entries.insert(
                self.position,
                HistoryEntry {
                    account: representative,
                    amount: Amount::zero(),
                    hash: hash.clone(),
                    kind: BlockKind::Change,
                },
            );
        } else {
            log::debug!(
                "block {} missing from history is {:?}, not a change; skipped",
                hash,
                block.kind
            );
        }
        self.position += 1;
    }

    pub fn finish(self) -> Vec<HistoryEntry> {
        self.entries
    }
}

/// Reconciled history of the account whose head block is `frontier`.
pub async fn reconcile(node: &NodeRpc, frontier: &str) -> Result<Vec<HistoryEntry>, RpcError> {
    let (history, chain) = node.history_and_chain(frontier).await?;
    let mut reconciler = Reconciler::new(history, chain);
    while let Some(hash) = reconciler.next_divergence() {
        let block = node.block(hash).await?;
        reconciler.resolve(&block);
    }
    Ok(reconciler.finish())
}

/// [`reconcile`] over a blocking client.
pub fn reconcile_blocking(
    client: &BlockingRpcClient,
    frontier: &str,
) -> Result<Vec<HistoryEntry>, RpcError> {
    let history: HistoryResponse = client.call_as(&Request::history(frontier))?;
    let chain: ChainResponse = client.call_as(&Request::chain(frontier))?;
    let mut reconciler = Reconciler::new(history.history, chain.blocks);
    while let Some(hash) = reconciler.next_divergence() {
        let block: BlockResponse = client.call_as(&Request::block(hash))?;
        reconciler.resolve(&block.decode()?);
    }
    Ok(reconciler.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn entry(hash: &str, kind: BlockKind, amount: u64) -> HistoryEntry {
        HistoryEntry {
            account: format!("xrb_{}", hash.to_lowercase()),
            amount: Amount::from(amount),
            hash: hash.to_string(),
            kind,
        }
    }

    fn block(kind: &str, representative: Option<&str>) -> BlockContents {
        let mut v = json!({ "type": kind });
        if let Some(rep) = representative {
            v["representative"] = json!(rep);
        }
        serde_json::from_value(v).unwrap()
    }

    fn run(
        history: Vec<HistoryEntry>,
        chain: &[&str],
        blocks: &HashMap<&str, BlockContents>,
    ) -> (Vec<HistoryEntry>, Vec<String>) {
        let mut fetched = Vec::new();
        let mut r = Reconciler::new(history, chain.iter().map(|s| s.to_string()).collect());
        while let Some(hash) = r.next_divergence() {
            let hash = hash.to_string();
            let b = blocks.get(hash.as_str()).expect("unexpected lookup").clone();
            fetched.push(hash);
            r.resolve(&b);
        }
        (r.finish(), fetched)
    }

    #[test]
    fn test_change_block_spliced_in_place() {
        let history = vec![
            entry("H1", BlockKind::Send, 5),
            entry("H3", BlockKind::Receive, 7),
        ];
        let blocks = HashMap::from([("H2", block("change", Some("xrb_rep")))]);
        let (out, fetched) = run(history, &["H1", "H2", "H3"], &blocks);

        assert_eq!(fetched, vec!["H2".to_string()]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].hash, "H1");
        assert_eq!(
            out[1],
            HistoryEntry {
                account: "xrb_rep".into(),
                amount: Amount::zero(),
                hash: "H2".into(),
                kind: BlockKind::Change,
            }
        );
        assert_eq!(out[2].hash, "H3");
    }

    #[test]
    fn test_aligned_history_fetches_nothing() {
        let history = vec![entry("A", BlockKind::Send, 1), entry("B", BlockKind::Open, 2)];
        let (out, fetched) = run(history.clone(), &["A", "B"], &HashMap::new());
        assert!(fetched.is_empty());
        assert_eq!(out, history);
    }

    #[test]
    fn test_non_change_divergence_adds_nothing() {
        let history = vec![entry("A", BlockKind::Send, 1), entry("C", BlockKind::Receive, 2)];
        let blocks = HashMap::from([("B", block("send", None)), ("C", block("receive", None))]);
        let (out, fetched) = run(history.clone(), &["A", "B", "C"], &blocks);
        // Without an insertion the remaining positions stay misaligned.
        assert_eq!(fetched, vec!["B".to_string(), "C".to_string()]);
        assert_eq!(out, history);
    }

    #[test]
    fn test_trailing_change_beyond_history() {
        let history = vec![entry("A", BlockKind::Receive, 1)];
        let blocks = HashMap::from([
            ("B", block("change", Some("xrb_one"))),
            ("C", block("change", Some("xrb_two"))),
        ]);
        let (out, _) = run(history, &["A", "B", "C"], &blocks);
        let kinds: Vec<_> = out.iter().map(|e| (e.hash.as_str(), e.kind)).collect();
        assert_eq!(
            kinds,
            vec![("A", BlockKind::Receive), ("B", BlockKind::Change), ("C", BlockKind::Change)]
        );
        assert_eq!(out[2].account, "xrb_two");
    }

    #[test]
    fn test_consecutive_changes_at_head() {
        let history = vec![entry("C", BlockKind::Open, 9)];
        let blocks = HashMap::from([
            ("A", block("change", Some("xrb_a"))),
            ("B", block("change", Some("xrb_b"))),
        ]);
        let (out, _) = run(history, &["A", "B", "C"], &blocks);
        let hashes: Vec<_> = out.iter().map(|e| e.hash.as_str()).collect();
        assert_eq!(hashes, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_chain() {
        let (out, fetched) = run(Vec::new(), &[], &HashMap::new());
        assert!(out.is_empty());
        assert!(fetched.is_empty());
    }

    #[test]
    fn test_change_without_representative() {
        let blocks = HashMap::from([("A", block("change", None))]);
        let (out, _) = run(Vec::new(), &["A"], &blocks);
        assert_eq!(out[0].account, "");
        assert_eq!(out[0].kind, BlockKind::Change);
    }
}
