// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request and response shapes exchanged with the browser UI.
//!
//! Request fields are optional so that a missing field is reported with the
//! same message as a malformed one. Amounts are accepted as JSON numbers or
//! numeric strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{ApiError, BridgeResult};

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /api/setup-wallet`.
#[derive(Default, Deserialize, ToSchema)]
pub struct SetupWalletRequest {
    /// Base64 secret key.
    #[serde(rename = "priv", default)]
    pub priv_key: Option<String>,
    /// Account address (`oct...`).
    #[serde(default)]
    pub addr: Option<String>,
    /// RPC base URL. Defaults to the public node.
    #[serde(default)]
    pub rpc: Option<String>,
}

/// Body of `POST /api/send`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SendRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Value>,
    /// Optional memo, capped at 1024 bytes.
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/encrypt` and `POST /api/decrypt`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BalanceChangeRequest {
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Value>,
}

/// Body of `POST /api/private-transfer`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PrivateSendRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Value>,
}

/// Body of `POST /api/claim`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ClaimTransferRequest {
    #[serde(default)]
    pub transfer_id: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct SetupStatusResponse {
    pub ok: bool,
    pub configured: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WalletInfoResponse {
    pub ok: bool,
    pub address: String,
    pub public_key: String,
    pub rpc: String,
}

/// Accepted transfer.
#[derive(Debug, Serialize, ToSchema)]
pub struct SendResponse {
    pub ok: bool,
    pub tx_hash: String,
    /// Node acknowledgement, when it was JSON.
    #[schema(value_type = Option<Object>)]
    pub rpc_response: Option<Value>,
}

/// Accepted encrypt, decrypt, private transfer or claim.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    pub ok: bool,
    #[schema(value_type = Option<Object>)]
    pub rpc_response: Option<Value>,
}

impl SubmissionResponse {
    pub fn accepted(rpc_response: Option<Value>) -> Self {
        Self {
            ok: true,
            rpc_response,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BalanceView {
    pub balance: f64,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EncryptedBalanceView {
    pub public: f64,
    pub public_raw: u64,
    pub encrypted: f64,
    pub encrypted_raw: u64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PendingTransfersView {
    #[schema(value_type = Vec<Object>)]
    pub pending_transfers: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// One resolved transaction in the account history.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HistoryEntry {
    pub hash: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Whole units.
    pub amount: f64,
    pub nonce: u64,
    pub timestamp: f64,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HistoryView {
    pub items: Vec<HistoryEntry>,
}

/// Outcome of one read inside the combined state query.
///
/// Serializes as `{"ok": true, ...fields}` or `{"ok": false, "error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<T> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<BridgeResult<T>> for Section<T> {
    fn from(result: BridgeResult<T>) -> Self {
        match result {
            Ok(data) => Self {
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Self {
                ok: false,
                data: None,
                error: Some(ApiError::from(e).message),
            },
        }
    }
}

/// Body of `GET /api/state`.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub ok: bool,
    pub balance: Section<BalanceView>,
    pub encrypted: Section<EncryptedBalanceView>,
    pub pending_private: Section<PendingTransfersView>,
    pub history: Section<HistoryView>,
}
