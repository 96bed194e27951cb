// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request bodies and response schemas for the node endpoints.
//!
//! Each endpoint response is decoded into an explicit type; numeric fields
//! accept either JSON numbers or numeric strings since the node emits both.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::client::RpcResponse;
use crate::wallet::amount::{Amount, MICRO};

// =============================================================================
// Responses
// =============================================================================

/// `GET /balance/{address}`
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    #[serde(default, deserialize_with = "de_amount")]
    pub balance: Amount,
    #[serde(default, deserialize_with = "de_u64")]
    pub nonce: u64,
}

/// `GET /view_encrypted_balance/{address}` (authenticated)
#[derive(Debug, Clone, Deserialize)]
pub struct EncryptedBalanceResponse {
    #[serde(default, deserialize_with = "de_amount")]
    pub public_balance: Amount,
    #[serde(default, deserialize_with = "de_raw_amount")]
    pub public_balance_raw: Amount,
    #[serde(default, deserialize_with = "de_amount")]
    pub encrypted_balance: Amount,
    #[serde(default, deserialize_with = "de_raw_amount")]
    pub encrypted_balance_raw: Amount,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_balance: Amount,
}

/// `GET /pending_private_transfers?address=...` (authenticated)
#[derive(Debug, Clone, Deserialize)]
pub struct PendingTransfersResponse {
    #[serde(default)]
    pub pending_transfers: Vec<Value>,
}

/// `GET /address/{address}`
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInfo {
    #[serde(default)]
    pub has_public_key: bool,
    #[serde(default)]
    pub recent_transactions: Vec<TxReference>,
}

/// Entry of `recent_transactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct TxReference {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "de_u64")]
    pub epoch: u64,
}

/// `GET /public_key/{address}`
#[derive(Debug, Clone, Deserialize)]
pub struct PublicKeyResponse {
    pub public_key: String,
}

/// `GET /tx/{hash}`
#[derive(Debug, Clone, Deserialize)]
pub struct TxLookup {
    #[serde(default)]
    pub parsed_tx: Option<ParsedTransaction>,
}

/// Decoded transaction as reported by the node.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedTransaction {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    amount: Option<Value>,
    #[serde(default)]
    amount_raw: Option<Value>,
    #[serde(default, deserialize_with = "de_u64")]
    pub nonce: u64,
    #[serde(default, deserialize_with = "de_f64")]
    pub timestamp: f64,
}

/// Amount of a historical transfer, tagged by how the node expressed it.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferAmount {
    /// Decimal whole units, e.g. `"1.5"`.
    Decimal(String),
    /// Integer smallest units, e.g. `"1500000"`.
    Raw(u64),
}

impl TransferAmount {
    /// Value in whole units.
    pub fn value(&self) -> f64 {
        match self {
            TransferAmount::Decimal(text) => {
                Amount::parse_remote(text).map_or(0.0, Amount::as_f64)
            }
            TransferAmount::Raw(raw) => *raw as f64 / MICRO as f64,
        }
    }

    fn decode(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) if text.contains('.') => Some(Self::Decimal(text.clone())),
            Value::String(text) => text.trim().parse().ok().map(Self::Raw),
            Value::Number(n) => match n.as_u64() {
                Some(raw) => Some(Self::Raw(raw)),
                None => Some(Self::Decimal(n.to_string())),
            },
            _ => None,
        }
    }
}

impl ParsedTransaction {
    /// Resolve the transfer amount.
    ///
    /// An explicit decimal string in `amount` wins; otherwise `amount_raw`
    /// is read, then an integer `amount`, both as smallest units.
    pub fn amount(&self) -> TransferAmount {
        let decimal = self
            .amount
            .as_ref()
            .and_then(TransferAmount::decode)
            .filter(|a| matches!(a, TransferAmount::Decimal(_)));

        decimal
            .or_else(|| self.amount_raw.as_ref().and_then(TransferAmount::decode))
            .or_else(|| self.amount.as_ref().and_then(TransferAmount::decode))
            .unwrap_or(TransferAmount::Raw(0))
    }
}

/// Structured acknowledgement from `/send-tx`.
#[derive(Debug, Clone, Deserialize)]
struct SendTxAck {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    tx_hash: Option<String>,
}

/// Extract the transaction hash from an accepted `/send-tx` response.
///
/// The node answers either `{"status": "accepted", "tx_hash": ...}` or a
/// plain-text `ok <hash>`. Anything else is not an acceptance.
pub fn accepted_tx_hash(response: &RpcResponse) -> Option<String> {
    if !response.is_ok() {
        return None;
    }

    let ack = response
        .json
        .as_ref()
        .and_then(|json| SendTxAck::deserialize(json).ok());
    if let Some(ack) = ack {
        if ack.status.as_deref() == Some("accepted") {
            return Some(ack.tx_hash.unwrap_or_default());
        }
    }

    if response.text.to_lowercase().starts_with("ok") {
        return Some(
            response
                .text
                .split_whitespace()
                .last()
                .unwrap_or_default()
                .to_string(),
        );
    }
    None
}

// =============================================================================
// Requests
// =============================================================================

/// `POST /encrypt_balance` and `POST /decrypt_balance`
#[derive(Debug, Serialize)]
pub struct BalanceUpdateRequest<'a> {
    pub address: &'a str,
    pub amount: String,
    pub private_key: &'a str,
    pub encrypted_data: String,
}

/// `POST /private_transfer`
#[derive(Debug, Serialize)]
pub struct PrivateTransferRequest<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub amount: String,
    pub from_private_key: &'a str,
    pub to_public_key: &'a str,
}

/// `POST /claim_private_transfer`
#[derive(Debug, Serialize)]
pub struct ClaimRequest<'a> {
    pub recipient_address: &'a str,
    pub private_key: &'a str,
    pub transfer_id: &'a str,
}

// =============================================================================
// Field decoders
// =============================================================================

fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Some(Amount::ZERO),
        Value::Number(n) => Amount::parse_remote(&n.to_string()),
        Value::String(s) => Amount::parse_remote(s),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom("expected a decimal amount"))
}

fn de_raw_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
    de_u64(deserializer).map(Amount::from_raw)
}

fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Some(0),
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom("expected a non-negative integer"))
}

fn de_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom("expected a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn balance_accepts_numbers_and_strings() {
        let a: BalanceResponse = serde_json::from_value(json!({"balance": 10.5, "nonce": 3})).unwrap();
        let b: BalanceResponse =
            serde_json::from_value(json!({"balance": "10.5", "nonce": "3"})).unwrap();
        assert_eq!(a.balance.raw(), 10_500_000);
        assert_eq!(a.nonce, 3);
        assert_eq!(b.balance, a.balance);
        assert_eq!(b.nonce, 3);
    }

    #[test]
    fn balance_defaults_missing_fields() {
        let resp: BalanceResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.balance, Amount::ZERO);
        assert_eq!(resp.nonce, 0);
    }

    #[test]
    fn balance_rejects_garbage() {
        assert!(serde_json::from_value::<BalanceResponse>(json!({"balance": [1]})).is_err());
        assert!(serde_json::from_value::<BalanceResponse>(json!({"nonce": -1})).is_err());
    }

    #[test]
    fn encrypted_view_reads_display_and_raw_fields() {
        let view: EncryptedBalanceResponse = serde_json::from_value(json!({
            "public_balance": "8.5 OCT",
            "public_balance_raw": "8500000",
            "encrypted_balance": "2 OCT",
            "encrypted_balance_raw": 2000000,
            "total_balance": "10.5 OCT"
        }))
        .unwrap();
        assert_eq!(view.public_balance.raw(), 8_500_000);
        assert_eq!(view.public_balance_raw.raw(), 8_500_000);
        assert_eq!(view.encrypted_balance_raw.raw(), 2_000_000);
        assert_eq!(view.total_balance.raw(), 10_500_000);
    }

    #[test]
    fn transfer_amount_prefers_decimal_string() {
        let tx: ParsedTransaction =
            serde_json::from_value(json!({"amount": "1.5", "amount_raw": "1500000"})).unwrap();
        assert_eq!(tx.amount(), TransferAmount::Decimal("1.5".into()));
        assert_eq!(tx.amount().value(), 1.5);
    }

    #[test]
    fn transfer_amount_reads_raw_units() {
        let tx: ParsedTransaction =
            serde_json::from_value(json!({"amount": "2500000"})).unwrap();
        assert_eq!(tx.amount(), TransferAmount::Raw(2_500_000));
        assert_eq!(tx.amount().value(), 2.5);

        let tx: ParsedTransaction =
            serde_json::from_value(json!({"amount": "7", "amount_raw": 3000000})).unwrap();
        assert_eq!(tx.amount(), TransferAmount::Raw(3_000_000));

        let tx: ParsedTransaction = serde_json::from_value(json!({})).unwrap();
        assert_eq!(tx.amount(), TransferAmount::Raw(0));
    }

    #[test]
    fn accepted_hash_from_json_ack() {
        let resp = RpcResponse::from_body(
            200,
            r#"{"status":"accepted","tx_hash":"abc123"}"#.to_string(),
        );
        assert_eq!(accepted_tx_hash(&resp).as_deref(), Some("abc123"));
    }

    #[test]
    fn accepted_hash_from_plain_text() {
        let resp = RpcResponse::from_body(200, "OK deadbeef".to_string());
        assert_eq!(accepted_tx_hash(&resp).as_deref(), Some("deadbeef"));
    }

    #[test]
    fn rejection_has_no_hash() {
        let resp = RpcResponse::from_body(200, r#"{"status":"rejected"}"#.to_string());
        assert_eq!(accepted_tx_hash(&resp), None);

        let resp = RpcResponse::from_body(400, "ok but not really".to_string());
        assert_eq!(accepted_tx_hash(&resp), None);
    }

    #[test]
    fn request_bodies_use_node_field_names() {
        let body = serde_json::to_value(ClaimRequest {
            recipient_address: "oct1",
            private_key: "k",
            transfer_id: "t",
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"recipient_address": "oct1", "private_key": "k", "transfer_id": "t"})
        );
    }
}
