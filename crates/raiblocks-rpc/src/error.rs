//! RPC error types.

use thiserror::Error;

use crate::outcome::Failure;

/// Coarse classification of an [`RpcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The node answered with an `error` payload.
    Protocol,
    /// No usable answer: bad status, malformed body, or no connection.
    /// The outcome of the request is unknown.
    Transport,
    /// The answer arrived but did not have the expected shape.
    Decode,
    /// Misuse of the client itself.
    Client,
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{action}: node returned error: {message}")]
    Protocol { action: String, message: String },

    #[error("{action} to {url} failed: {failure}")]
    Transport {
        action: String,
        url: String,
        failure: Failure,
    },

    #[error("{action}: unexpected response: {source}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Builder(#[from] reqwest::Error),

    #[error("session not initialized")]
    NotInitialized,
}

impl RpcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcError::Protocol { .. } => ErrorKind::Protocol,
            RpcError::Transport { .. } => ErrorKind::Transport,
            RpcError::Decode { .. } => ErrorKind::Decode,
            RpcError::Builder(_) | RpcError::NotInitialized => ErrorKind::Client,
        }
    }

    /// Message from the node, if this is a protocol error.
    pub fn protocol_message(&self) -> Option<&str> {
        match self {
            RpcError::Protocol { message, .. } => Some(message),
            _ => None,
        }
    }

    pub(crate) fn decode(action: &str, source: serde_json::Error) -> Self {
        RpcError::Decode {
            action: action.to_string(),
            source,
        }
    }
}
