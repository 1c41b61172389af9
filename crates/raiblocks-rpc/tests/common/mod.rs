//! Loopback stand-in for a node, shared by the integration tests.
//!
//! An axum router answers every POST with one canned response chosen by the
//! request's `action` (or `action:hash` when the request names a hash).

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use raiblocks_rpc::{Failure, Notifier};
use serde_json::Value;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone)]
struct StubState {
    routes: Arc<HashMap<String, (u16, String)>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

pub struct StubNode {
    url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl StubNode {
    /// Serve `(key, status, body)` routes until the test process exits.
    ///
    /// The server owns a runtime on its own thread, so blocking clients and
    /// single-threaded async tests can both talk to it.
    pub fn start(routes: Vec<(&str, u16, String)>) -> Self {
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(key, status, body)| (key.to_string(), (status, body)))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            routes: Arc::new(routes),
            requests: Arc::clone(&requests),
        };

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                let app = Router::new().route("/", post(answer)).with_state(state);
                axum::serve(listener, app).await.unwrap();
            });
        });
        let addr = rx.recv().unwrap();

        Self {
            url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request bodies received so far, in arrival order.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r["action"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

async fn answer(
    State(state): State<StubState>,
    Json(request): Json<Value>,
) -> (StatusCode, String) {
    state.requests.lock().unwrap().push(request.clone());

    let action = request["action"].as_str().unwrap_or_default();
    let keyed = request["hash"]
        .as_str()
        .map(|hash| format!("{}:{}", action, hash));
    let (status, body) = keyed
        .and_then(|k| state.routes.get(&k))
        .or_else(|| state.routes.get(action))
        .cloned()
        .unwrap_or((400, r#"{"error":"Unknown command"}"#.to_string()));

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, body)
}

/// URL of a port nothing listens on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Notifier that keeps what it was told.
#[derive(Default)]
pub struct Recorder {
    pub events: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for Recorder {
    fn protocol_error(&self, action: &str, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("protocol {}: {}", action, message));
    }

    fn transport_failure(&self, action: &str, _url: &str, failure: &Failure) {
        let label = match failure {
            Failure::Status { status, .. } => format!("status {}", status),
            Failure::Malformed(_) => "malformed".to_string(),
            Failure::Connection(_) => "connection".to_string(),
        };
        self.events
            .lock()
            .unwrap()
            .push(format!("transport {}: {}", action, label));
    }
}

/// A `block` response whose contents is the given block JSON.
pub fn block_body(contents: Value) -> String {
    serde_json::json!({ "contents": contents.to_string() }).to_string()
}
