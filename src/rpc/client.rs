// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP transport to the remote Octra RPC node.
//!
//! Requests never fail with an error: transport problems (connect errors,
//! timeouts, a closed client) come back as an [`RpcResponse`] with status
//! `0` and a descriptive text, so callers handle one failure channel.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use zeroize::Zeroizing;

use crate::error::BridgeError;

/// Header carrying the account secret on authenticated reads.
pub const PRIVATE_KEY_HEADER: &str = "X-Private-Key";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// HTTP verbs used against the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Raw outcome of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    /// HTTP status, or `0` for transport failures.
    pub status: u16,
    /// Response body (or the transport failure description).
    pub text: String,
    /// Body parsed as JSON, when it is JSON.
    pub json: Option<Value>,
}

impl RpcResponse {
    pub fn transport(text: impl Into<String>) -> Self {
        Self {
            status: 0,
            text: text.into(),
            json: None,
        }
    }

    pub fn from_body(status: u16, text: String) -> Self {
        let json = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };
        Self { status, text, json }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Remote `error` field if present, else the raw body.
    pub fn error_text(&self) -> String {
        match self.json.as_ref().and_then(|json| json.get("error")) {
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => self.text.clone(),
        }
    }

    /// Convert a failed response into the matching bridge error.
    pub fn into_error(self) -> BridgeError {
        if self.status == 0 {
            BridgeError::TransportFailure(self.text)
        } else {
            BridgeError::RemoteRejected(self.error_text())
        }
    }

    /// Decode the JSON body against an endpoint schema.
    ///
    /// A missing body is a remote failure; a body of the wrong shape is
    /// rejected as invalid input naming `what`.
    pub fn parse<T: DeserializeOwned>(&self, what: &str) -> Result<T, BridgeError> {
        let json = self
            .json
            .clone()
            .ok_or_else(|| self.clone().into_error())?;
        serde_json::from_value(json).map_err(|e| {
            tracing::debug!(error = %e, payload = what, "Unexpected RPC payload shape");
            BridgeError::invalid_input(format!("invalid {what} payload"))
        })
    }
}

/// Client bound to one RPC base URL and one account secret.
///
/// The underlying connection pool is built on first use and reused until
/// [`RpcClient::close`] is called. After closing, pending and future
/// requests resolve as transport failures.
pub struct RpcClient {
    base_url: String,
    private_key: Zeroizing<String>,
    timeout: Duration,
    http: OnceCell<reqwest::Client>,
    shutdown: CancellationToken,
}

impl RpcClient {
    pub fn new(base_url: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            private_key: Zeroizing::new(private_key.into()),
            timeout: DEFAULT_TIMEOUT,
            http: OnceCell::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Release the client. In-flight requests are abandoned.
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    async fn http(&self) -> Result<&reqwest::Client, String> {
        self.http
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| format!("failed to build HTTP client: {e}"))
            })
            .await
    }

    /// Issue one request. `authenticated` attaches the account secret in
    /// the [`PRIVATE_KEY_HEADER`] header.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        authenticated: bool,
    ) -> RpcResponse {
        if self.is_closed() {
            return RpcResponse::transport("rpc client closed");
        }
        let http = match self.http().await {
            Ok(http) => http,
            Err(e) => return RpcResponse::transport(e),
        };

        let url = format!("{}{}", self.base_url, path);
        let mut request = match method {
            HttpMethod::Get => http.get(&url),
            HttpMethod::Post => http.post(&url),
        };
        if let (HttpMethod::Post, Some(body)) = (method, body) {
            request = request.json(body);
        }
        if authenticated {
            request = request.header(PRIVATE_KEY_HEADER, self.private_key.as_str());
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let response = tokio::select! {
            _ = self.shutdown.cancelled() => RpcResponse::transport("rpc client closed"),
            result = exchange => match result {
                Ok((status, text)) => RpcResponse::from_body(status, text),
                Err(e) if e.is_timeout() => RpcResponse::transport("timeout"),
                Err(e) => RpcResponse::transport(e.to_string()),
            },
        };

        tracing::debug!(
            method = ?method,
            path = %path,
            status = response.status,
            "RPC request completed"
        );
        response
    }

    pub async fn get(&self, path: &str, authenticated: bool) -> RpcResponse {
        self.request(HttpMethod::Get, path, None, authenticated).await
    }

    /// POST a serializable body.
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> RpcResponse {
        match serde_json::to_value(body) {
            Ok(body) => self.request(HttpMethod::Post, path, Some(&body), false).await,
            Err(e) => RpcResponse::transport(format!("failed to encode request: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockNode;
    use serde_json::json;

    #[test]
    fn error_text_prefers_remote_error_field() {
        let resp = RpcResponse::from_body(400, r#"{"error":"bad nonce"}"#.to_string());
        assert_eq!(resp.error_text(), "bad nonce");

        let resp = RpcResponse::from_body(500, "upstream exploded".to_string());
        assert!(resp.json.is_none());
        assert_eq!(resp.error_text(), "upstream exploded");
    }

    #[test]
    fn into_error_distinguishes_transport_and_remote() {
        assert_eq!(
            RpcResponse::transport("timeout").into_error(),
            BridgeError::TransportFailure("timeout".into())
        );
        assert_eq!(
            RpcResponse::from_body(403, r#"{"error":"denied"}"#.into()).into_error(),
            BridgeError::RemoteRejected("denied".into())
        );
    }

    #[test]
    fn parse_rejects_unexpected_shapes() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            field: String,
        }

        let resp = RpcResponse::from_body(200, r#"{"other":1}"#.into());
        assert_eq!(
            resp.parse::<Needs>("test").unwrap_err(),
            BridgeError::invalid_input("invalid test payload")
        );
    }

    #[tokio::test]
    async fn get_and_post_reach_the_node() {
        let node = MockNode::start().await;
        node.respond_json("GET", "/balance/x", 200, json!({"balance": "1.5", "nonce": 2}));
        node.respond("POST", "/send-tx", 200, "ok abc");

        let client = RpcClient::new(format!("{}/", node.base_url()), "c2VjcmV0");
        let resp = client.get("/balance/x", false).await;
        assert!(resp.is_ok());
        assert_eq!(resp.json.unwrap()["nonce"], 2);

        let resp = client.post("/send-tx", &json!({"a": 1})).await;
        assert_eq!(resp.text, "ok abc");

        let requests = node.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].private_key, None);
        assert_eq!(requests[1].body, Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn authenticated_requests_carry_private_key_header() {
        let node = MockNode::start().await;
        node.respond_json("GET", "/view", 200, json!({}));

        let client = RpcClient::new(node.base_url(), "c2VjcmV0");
        client.get("/view", true).await;

        assert_eq!(node.requests()[0].private_key.as_deref(), Some("c2VjcmV0"));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_transport_failure() {
        let client = RpcClient::new("http://127.0.0.1:1", "k");
        let resp = client.get("/balance/x", false).await;
        assert_eq!(resp.status, 0);
        assert!(resp.json.is_none());
        assert!(!resp.text.is_empty());
    }

    #[tokio::test]
    async fn slow_node_times_out() {
        let node = MockNode::start().await;
        node.respond_after("GET", "/slow", Duration::from_secs(5));

        let client =
            RpcClient::new(node.base_url(), "k").with_timeout(Duration::from_millis(100));
        let resp = client.get("/slow", false).await;
        assert_eq!(resp, RpcResponse::transport("timeout"));
    }

    #[tokio::test]
    async fn closed_client_makes_no_requests() {
        let node = MockNode::start().await;
        let client = RpcClient::new(node.base_url(), "k");
        client.close();

        let resp = client.get("/balance/x", false).await;
        assert_eq!(resp, RpcResponse::transport("rpc client closed"));
        assert!(node.requests().is_empty());
    }

    #[tokio::test]
    async fn close_abandons_in_flight_requests() {
        let node = MockNode::start().await;
        node.respond_after("GET", "/slow", Duration::from_secs(5));
        let client = std::sync::Arc::new(RpcClient::new(node.base_url(), "k"));

        let pending = tokio::spawn({
            let client = client.clone();
            async move { client.get("/slow", true).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        client.close();

        let resp = pending.await.unwrap();
        assert_eq!(resp, RpcResponse::transport("rpc client closed"));
    }
}
