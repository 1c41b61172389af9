//! RaiBlocks node RPC client library.
//!
//! Provides async and blocking HTTP clients for the node's JSON RPC
//! interface, a typed façade over the actions it needs, and reconstruction of
//! an account's full history including representative changes.
//!
//! # Example
//!
//! ```ignore
//! use raiblocks_rpc::{NodeRpc, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), raiblocks_rpc::RpcError> {
//!     let mut session = Session::new(NodeRpc::new("http://localhost:7076")?);
//!     session.initialize().await?;
//!     if let Some(history) = session.account_history("xrb_...").await? {
//!         println!("{} entries", history.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod blocking;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod history;
pub mod node;
pub mod outcome;
pub mod request;
pub mod session;

pub use blocking::BlockingRpcClient;
pub use client::{Reply, RpcClient, RpcConfig};
pub use endpoint::Endpoint;
pub use error::{ErrorKind, RpcError};
pub use history::{reconcile, reconcile_blocking, Reconciler};
pub use node::{BlockContents, BlockKind, HistoryEntry, NodeRpc};
pub use outcome::{classify, Failure, LogNotifier, Notifier, Outcome};
pub use request::Request;
pub use session::{NodeSnapshot, Session};
