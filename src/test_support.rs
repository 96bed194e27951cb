// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process stand-in for the remote RPC node.
//!
//! Binds an axum server on an ephemeral local port, answers with canned
//! responses keyed by method and path (including query string), and records
//! every request it receives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;

use crate::bridge::WalletBridge;
use crate::config::WalletStore;
use crate::rpc::PRIVATE_KEY_HEADER;
use crate::wallet::keys::tests::test_record;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub private_key: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Canned {
    Reply { status: u16, body: String },
    Delay(Duration),
}

#[derive(Default)]
struct NodeState {
    routes: HashMap<(String, String), Canned>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone)]
pub struct MockNode {
    base_url: String,
    state: Arc<Mutex<NodeState>>,
}

impl MockNode {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(NodeState::default()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock node");
        let addr = listener.local_addr().expect("mock node address");

        let app = Router::new().fallback(handle).with_state(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: impl Into<String>) {
        self.insert(
            method,
            path,
            Canned::Reply {
                status,
                body: body.into(),
            },
        );
    }

    pub fn respond_json(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond(method, path, status, body.to_string());
    }

    /// Hold the response for `delay`, then answer 200 `{}`.
    pub fn respond_after(&self, method: &str, path: &str, delay: Duration) {
        self.insert(method, path, Canned::Delay(delay));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests sent to `path`, any method.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn posts(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }

    fn insert(&self, method: &str, path: &str, canned: Canned) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert((method.to_string(), path.to_string()), canned);
    }
}

async fn handle(
    State(state): State<Arc<Mutex<NodeState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let canned = {
        let mut state = state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            private_key: headers
                .get(PRIVATE_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: serde_json::from_slice(&body).ok(),
        });
        state.routes.get(&(method.to_string(), path)).cloned()
    };

    match canned {
        Some(Canned::Reply { status, body }) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
        Some(Canned::Delay(delay)) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, "{}").into_response()
        }
        None => (StatusCode::NOT_FOUND, r#"{"error":"not found"}"#).into_response(),
    }
}

/// Bridge configured with the test wallet against `node`. The wallet file
/// lives in the returned directory.
pub async fn configured_bridge(node: &MockNode) -> (TempDir, WalletBridge) {
    let (dir, bridge) = unconfigured_bridge();
    bridge
        .configure(&test_record(node.base_url()))
        .await
        .expect("configure test wallet");
    (dir, bridge)
}

pub fn unconfigured_bridge() -> (TempDir, WalletBridge) {
    let dir = tempfile::tempdir().expect("tempdir");
    let bridge = WalletBridge::new(WalletStore::new(dir.path().join("wallet.json")));
    (dir, bridge)
}
