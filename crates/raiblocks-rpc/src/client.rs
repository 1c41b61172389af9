//! Async node RPC client.
//!
//! Every call is a single HTTP POST of the JSON request envelope to the
//! node's root path. There are no retries and no backoff: one call, one
//! request, one classified [`Outcome`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::endpoint::Endpoint;
use crate::error::RpcError;
use crate::outcome::{classify, Failure, LogNotifier, Notifier, Outcome};
use crate::request::Request;

/// Configuration shared by the async and blocking clients.
#[derive(Clone)]
pub struct RpcConfig {
    /// Base URL (e.g. `http://localhost:7076`). `None` means the local node.
    pub url: Option<String>,
    /// Optional HTTP timeout. The protocol itself imposes none.
    pub timeout: Option<Duration>,
    /// Where protocol errors and transport failures are reported.
    pub notifier: Arc<dyn Notifier>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: None,
            notifier: Arc::new(LogNotifier),
        }
    }
}

impl fmt::Debug for RpcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcConfig")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RpcConfig {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::resolve(self.url.as_deref())
    }
}

/// What a continuation passed to [`RpcClient::call_with`] receives.
///
/// Transport failures never reach the continuation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Success(Value),
    ProtocolError(String),
}

/// Async RPC client for a single node.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    config: RpcConfig,
}

impl RpcClient {
    /// Create a client for the given base URL.
    pub fn new(url: &str) -> Result<Self, RpcError> {
        Self::with_config(RpcConfig {
            url: Some(url.to_string()),
            ..Default::default()
        })
    }

    /// Create a client with full configuration.
    pub fn with_config(config: RpcConfig) -> Result<Self, RpcError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Endpoint the next call will be sent to.
    pub fn endpoint(&self) -> Endpoint {
        self.config.endpoint()
    }

    /// Send `request` and wait for the classified answer.
    ///
    /// Errors are reported through the configured notifier before they are
    /// returned.
    pub async fn call(&self, request: &Request) -> Result<Value, RpcError> {
        let url = self.endpoint().url();
        self.exchange(&url, request)
            .await
            .settle(self.config.notifier.as_ref(), request.action(), &url)
    }

    /// [`call`](Self::call), then decode the payload into `T`.
    pub async fn call_as<T: DeserializeOwned>(&self, request: &Request) -> Result<T, RpcError> {
        let val = self.call(request).await?;
        serde_json::from_value(val).map_err(|e| RpcError::decode(request.action(), e))
    }

    /// Fire `request` in the background and hand the answer to `on_reply`.
    ///
    /// The continuation runs at most once, on a spawned task, so never before
    /// this method returns. It runs only for HTTP 200 and HTTP 400 answers;
    /// any other outcome is reported to the notifier and the continuation is
    /// dropped. Callers that need liveness must add their own timeout.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn call_with<F>(&self, request: Request, on_reply: F) -> JoinHandle<()>
    where
        F: FnOnce(Reply) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let url = client.endpoint().url();
            let action = request.action();
            match client.exchange(&url, &request).await {
                Outcome::Success(payload) => on_reply(Reply::Success(payload)),
                Outcome::ProtocolError(message) => {
                    client.config.notifier.protocol_error(action, &message);
                    on_reply(Reply::ProtocolError(message));
                }
                Outcome::TransportFailure(failure) => {
                    client.config.notifier.transport_failure(action, &url, &failure);
                }
            }
        })
    }

    async fn exchange(&self, url: &str, request: &Request) -> Outcome {
        let resp = match self.http.post(url).json(request).send().await {
            Ok(resp) => resp,
            Err(e) => return Outcome::TransportFailure(Failure::Connection(e.to_string())),
        };
        let status = resp.status().as_u16();
        match resp.text().await {
            Ok(body) => classify(status, &body),
            Err(e) => Outcome::TransportFailure(Failure::Connection(e.to_string())),
        }
    }
}
