// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer construction and signing.
//!
//! The signature covers a compact JSON encoding of the required fields in a
//! fixed order: `from, to_, amount, nonce, ou, timestamp`. The optional
//! message, the signature and the public key are appended afterwards and are
//! not signed. Both the signed bytes and the submitted object are produced by
//! serde from structs with the same field order.

use base64ct::{Base64, Encoding};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::keys::KeyMaterial;
use crate::error::{BridgeError, BridgeResult};

/// Maximum message length in bytes. Longer messages are truncated.
pub const MAX_MESSAGE_BYTES: usize = 1024;

/// Fields covered by the signature, in canonical order.
#[derive(Debug, Serialize)]
struct CanonicalTransfer<'a> {
    from: &'a str,
    #[serde(rename = "to_")]
    to: &'a str,
    amount: String,
    nonce: u64,
    ou: &'static str,
    timestamp: f64,
}

/// A signed transfer, ready for submission to `/send-tx`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub from: String,
    #[serde(rename = "to_")]
    pub to: String,
    pub amount: String,
    pub nonce: u64,
    pub ou: String,
    pub timestamp: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub signature: String,
    pub public_key: String,
}

/// Builds signed transfers from the bridge account.
pub struct TransactionBuilder<'a> {
    keys: &'a KeyMaterial,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(keys: &'a KeyMaterial) -> Self {
        Self { keys }
    }

    /// Build and sign a transfer stamped with the current time.
    pub fn build_signed(
        &self,
        to: &str,
        amount: Amount,
        nonce: u64,
        message: Option<&str>,
    ) -> BridgeResult<SignedTransaction> {
        self.build_signed_at(to, amount, nonce, message, current_timestamp())
    }

    /// Build and sign a transfer with an explicit timestamp (seconds).
    pub fn build_signed_at(
        &self,
        to: &str,
        amount: Amount,
        nonce: u64,
        message: Option<&str>,
        timestamp: f64,
    ) -> BridgeResult<SignedTransaction> {
        let canonical = CanonicalTransfer {
            from: self.keys.address(),
            to,
            amount: amount.raw().to_string(),
            nonce,
            ou: amount.op_class(),
            timestamp,
        };
        let payload = canonical_bytes(&canonical)?;
        let signature = Base64::encode_string(&self.keys.sign(&payload).to_bytes());

        Ok(SignedTransaction {
            from: canonical.from.to_string(),
            to: canonical.to.to_string(),
            amount: canonical.amount,
            nonce,
            ou: canonical.ou.to_string(),
            timestamp,
            message: message.and_then(normalize_message),
            signature,
            public_key: self.keys.public_key().to_string(),
        })
    }
}

impl SignedTransaction {
    /// Recompute the bytes the signature was made over.
    pub fn canonical_payload(&self) -> BridgeResult<Vec<u8>> {
        let ou = match self.ou.as_str() {
            "1" => "1",
            "3" => "3",
            other => {
                return Err(BridgeError::invalid_input(format!(
                    "unknown operation class {other}"
                )))
            }
        };
        canonical_bytes(&CanonicalTransfer {
            from: &self.from,
            to: &self.to,
            amount: self.amount.clone(),
            nonce: self.nonce,
            ou,
            timestamp: self.timestamp,
        })
    }
}

fn canonical_bytes(canonical: &CanonicalTransfer<'_>) -> BridgeResult<Vec<u8>> {
    serde_json::to_vec(canonical)
        .map_err(|e| BridgeError::Internal(format!("failed to encode transaction: {e}")))
}

fn current_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Trim a message, drop it when empty, and cap it at [`MAX_MESSAGE_BYTES`]
/// on a character boundary.
pub fn normalize_message(message: &str) -> Option<String> {
    let message = message.trim();
    if message.is_empty() {
        return None;
    }
    if message.len() <= MAX_MESSAGE_BYTES {
        return Some(message.to_string());
    }

    let mut end = MAX_MESSAGE_BYTES;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    Some(message[..end].to_string())
}
