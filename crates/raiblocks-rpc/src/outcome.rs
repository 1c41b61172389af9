//! Response classification and error notification.
//!
//! [`classify`] is pure: it maps an HTTP status and body to exactly one
//! [`Outcome`]. Reporting errors to the outside world goes through a
//! [`Notifier`], which defaults to the `log` facade.

use serde_json::Value;
use thiserror::Error;

use crate::error::RpcError;

/// Longest body excerpt kept in a [`Failure::Status`].
const BODY_EXCERPT: usize = 500;

/// Why no usable payload came back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("HTTP status {status}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {0}")]
    Malformed(String),

    #[error("connection failed: {0}")]
    Connection(String),
}

/// Classified result of a single request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    ProtocolError(String),
    TransportFailure(Failure),
}

/// Classify a completed HTTP exchange.
///
/// 200 with a JSON body is success. 400 with a JSON body carrying an `error`
/// string is a protocol error. Everything else is a transport failure.
pub fn classify(status: u16, body: &str) -> Outcome {
    match status {
        200 => match serde_json::from_str::<Value>(body) {
            Ok(payload) => Outcome::Success(payload),
            Err(e) => Outcome::TransportFailure(Failure::Malformed(e.to_string())),
        },
        400 => match serde_json::from_str::<Value>(body) {
            Ok(payload) => match payload.get("error").and_then(Value::as_str) {
                Some(message) => Outcome::ProtocolError(message.to_string()),
                None => Outcome::TransportFailure(Failure::Malformed(
                    "400 response without an error field".to_string(),
                )),
            },
            Err(e) => Outcome::TransportFailure(Failure::Malformed(e.to_string())),
        },
        _ => Outcome::TransportFailure(Failure::Status {
            status,
            body: body.chars().take(BODY_EXCERPT).collect(),
        }),
    }
}

/// Side channel for request errors.
///
/// Called once for every protocol error and transport failure, before the
/// error reaches the caller (or, in continuation mode, instead of reaching it).
pub trait Notifier: Send + Sync {
    fn protocol_error(&self, action: &str, message: &str);

    fn transport_failure(&self, action: &str, url: &str, failure: &Failure);
}

/// Default notifier: writes to the `log` facade at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn protocol_error(&self, action: &str, message: &str) {
        log::error!("{}: {}", action, message);
    }

    fn transport_failure(&self, action: &str, url: &str, failure: &Failure) {
        log::error!("{} to {} failed: {}", action, url, failure);
    }
}

impl Outcome {
    /// Report any error through `notifier` and convert to a `Result`.
    pub fn settle(
        self,
        notifier: &dyn Notifier,
        action: &str,
        url: &str,
    ) -> Result<Value, RpcError> {
        match self {
            Outcome::Success(payload) => Ok(payload),
            Outcome::ProtocolError(message) => {
                notifier.protocol_error(action, &message);
                Err(RpcError::Protocol {
                    action: action.to_string(),
                    message,
                })
            }
            Outcome::TransportFailure(failure) => {
                notifier.transport_failure(action, url, &failure);
                Err(RpcError::Transport {
                    action: action.to_string(),
                    url: url.to_string(),
                    failure,
                })
            }
        }
    }
}
