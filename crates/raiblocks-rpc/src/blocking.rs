//! Blocking node RPC client.
//!
//! Same request envelope and classification as [`RpcClient`](crate::RpcClient),
//! but each call holds the calling thread until the response is complete.
//! Do not use from inside an async runtime.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::RpcConfig;
use crate::endpoint::Endpoint;
use crate::error::RpcError;
use crate::outcome::{classify, Failure, Outcome};
use crate::request::Request;

/// Blocking JSON RPC client for a RaiBlocks node.
pub struct BlockingRpcClient {
    http: reqwest::blocking::Client,
    config: RpcConfig,
}

impl BlockingRpcClient {
    /// Create a client for the node at `url`.
    pub fn new(url: &str) -> Result<Self, RpcError> {
        Self::with_config(RpcConfig {
            url: Some(url.to_string()),
            ..Default::default()
        })
    }

    /// Create with full configuration.
    pub fn with_config(config: RpcConfig) -> Result<Self, RpcError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Endpoint resolved from the configured URL.
    pub fn endpoint(&self) -> Endpoint {
        self.config.endpoint()
    }

    /// Send `request` and block until the classified answer is available.
    pub fn call(&self, request: &Request) -> Result<Value, RpcError> {
        let url = self.endpoint().url();
        self.exchange(&url, request)
            .settle(self.config.notifier.as_ref(), request.action(), &url)
    }

    /// Send `request` and decode the successful answer into `T`.
    pub fn call_as<T: DeserializeOwned>(&self, request: &Request) -> Result<T, RpcError> {
        let val = self.call(request)?;
        serde_json::from_value(val).map_err(|e| RpcError::decode(request.action(), e))
    }

    fn exchange(&self, url: &str, request: &Request) -> Outcome {
        let resp = match self.http.post(url).json(request).send() {
            Ok(resp) => resp,
            Err(e) => return Outcome::TransportFailure(Failure::Connection(e.to_string())),
        };
        let status = resp.status().as_u16();
        match resp.text() {
            Ok(body) => classify(status, &body),
            Err(e) => Outcome::TransportFailure(Failure::Connection(e.to_string())),
        }
    }
}
