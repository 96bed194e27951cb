// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failures produced by bridge operations.
///
/// Every variant is scoped to a single request. None of them carry secret
/// key material; messages are safe to show to the UI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// Key material is absent or incomplete.
    #[error("wallet is not configured")]
    NotConfigured,

    /// Malformed local input, rejected before any network call.
    #[error("{0}")]
    InvalidInput(String),

    /// Network failure or timeout; no remote status is available.
    #[error("{0}")]
    TransportFailure(String),

    /// The remote node answered with a non-success status or error body.
    #[error("{0}")]
    RemoteRejected(String),

    /// Local comparison against the last fetched balance failed.
    #[error("{0}")]
    InsufficientFunds(String),

    /// Malformed secret key or wallet record.
    #[error("{0}")]
    InvalidWalletData(String),

    /// Unexpected internal fault. The message is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_wallet(message: impl Into<String>) -> Self {
        Self::InvalidWalletData(message.into())
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::NotConfigured => Self::conflict(err.to_string()),
            BridgeError::InvalidInput(msg)
            | BridgeError::InsufficientFunds(msg)
            | BridgeError::InvalidWalletData(msg) => Self::bad_request(msg),
            BridgeError::TransportFailure(msg) | BridgeError::RemoteRejected(msg) => {
                Self::bad_gateway(msg)
            }
            BridgeError::Internal(msg) => {
                tracing::error!(error = %msg, "Bridge operation failed unexpectedly");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
