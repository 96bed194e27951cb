// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! State-changing operations: transfers and confidential balance updates.
//!
//! Local input is validated before any request reaches the node. Send and
//! the encrypt/decrypt read-modify-write sequences hold the session's
//! account lock from the initial read until the submission completes.
//! Nothing is retried.

use serde_json::Value;

use super::types::{
    BalanceChangeRequest, ClaimTransferRequest, PrivateSendRequest, SendRequest, SendResponse,
    SubmissionResponse,
};
use super::{BridgeSession, WalletBridge};
use crate::error::{BridgeError, BridgeResult};
use crate::rpc::types::{
    accepted_tx_hash, AddressInfo, BalanceUpdateRequest, ClaimRequest, PrivateTransferRequest,
    PublicKeyResponse,
};
use crate::wallet::codec::encrypt_balance;
use crate::wallet::transaction::normalize_message;
use crate::wallet::{validate_recipient, Amount, TransactionBuilder};

const NO_RECIPIENT_KEY: &str = "recipient has no public key yet";

fn requested_amount(amount: &Option<Value>) -> BridgeResult<Amount> {
    Amount::parse(amount.as_ref().unwrap_or(&Value::Null))
}

/// Prefix a remote failure with what was being attempted.
fn with_context(err: BridgeError, context: &str) -> BridgeError {
    match err {
        BridgeError::TransportFailure(msg) => {
            BridgeError::TransportFailure(format!("{context}: {msg}"))
        }
        BridgeError::RemoteRejected(msg) => {
            BridgeError::RemoteRejected(format!("{context}: {msg}"))
        }
        other => other,
    }
}

enum BalanceChange {
    Encrypt,
    Decrypt,
}

impl BalanceChange {
    fn endpoint(&self) -> &'static str {
        match self {
            BalanceChange::Encrypt => "/encrypt_balance",
            BalanceChange::Decrypt => "/decrypt_balance",
        }
    }
}

impl BridgeSession {
    async fn send(&self, request: SendRequest) -> BridgeResult<SendResponse> {
        let to = validate_recipient(request.to.as_deref().unwrap_or_default())?;
        let amount = requested_amount(&request.amount)?;
        let message = request.message.as_deref().and_then(normalize_message);

        let _guard = self.account_lock.lock().await;

        let current = self
            .balance_nonce()
            .await
            .map_err(|e| with_context(e, "failed to get nonce/balance"))?;
        if current.balance < amount {
            return Err(BridgeError::InsufficientFunds(format!(
                "insufficient balance ({} < {})",
                current.balance, amount
            )));
        }
        let nonce = current
            .nonce
            .checked_add(1)
            .ok_or_else(|| BridgeError::RemoteRejected("account nonce is exhausted".into()))?;

        let tx = TransactionBuilder::new(&self.keys).build_signed(
            &to,
            amount,
            nonce,
            message.as_deref(),
        )?;
        let response = self.rpc.post("/send-tx", &tx).await;

        match accepted_tx_hash(&response) {
            Some(tx_hash) => {
                tracing::info!(
                    from = %self.keys.address(),
                    to = %to,
                    amount = %amount,
                    nonce,
                    tx_hash = %tx_hash,
                    "Transaction accepted"
                );
                Ok(SendResponse {
                    ok: true,
                    tx_hash,
                    rpc_response: response.json,
                })
            }
            None => {
                tracing::warn!(status = response.status, nonce, "Transaction rejected");
                Err(response.into_error())
            }
        }
    }

    async fn change_encrypted_balance(
        &self,
        change: BalanceChange,
        request: BalanceChangeRequest,
    ) -> BridgeResult<SubmissionResponse> {
        let amount = requested_amount(&request.amount)?;

        let _guard = self.account_lock.lock().await;

        let current = self.encrypted_balance().await?.encrypted_balance_raw;
        let updated = match change {
            BalanceChange::Encrypt => current
                .checked_add(amount)
                .ok_or_else(|| BridgeError::invalid_input("amount is too large"))?,
            BalanceChange::Decrypt => current.checked_sub(amount).ok_or_else(|| {
                BridgeError::InsufficientFunds("insufficient encrypted balance".into())
            })?,
        };

        let encrypted_data = encrypt_balance(updated.raw(), self.keys.secret_bytes())?;
        let body = BalanceUpdateRequest {
            address: self.keys.address(),
            amount: amount.raw().to_string(),
            private_key: self.keys.secret_b64(),
            encrypted_data,
        };
        let response = self.rpc.post(change.endpoint(), &body).await;
        if !response.is_ok() {
            tracing::warn!(
                endpoint = change.endpoint(),
                status = response.status,
                "Encrypted balance update rejected"
            );
            return Err(response.into_error());
        }

        tracing::info!(
            address = %self.keys.address(),
            endpoint = change.endpoint(),
            amount = %amount,
            "Encrypted balance updated"
        );
        Ok(SubmissionResponse::accepted(response.json))
    }

    async fn private_transfer(
        &self,
        request: PrivateSendRequest,
    ) -> BridgeResult<SubmissionResponse> {
        let to = validate_recipient(request.to.as_deref().unwrap_or_default())?;
        let amount = requested_amount(&request.amount)?;

        let info = self.rpc.get(&format!("/address/{to}"), false).await;
        if info.status == 0 {
            return Err(info.into_error());
        }
        let registered = info.is_ok()
            && info
                .parse::<AddressInfo>("address")
                .map(|info| info.has_public_key)
                .unwrap_or(false);
        if !registered {
            return Err(BridgeError::invalid_input(NO_RECIPIENT_KEY));
        }

        let key = self.rpc.get(&format!("/public_key/{to}"), false).await;
        if !key.is_ok() {
            return Err(key.into_error());
        }
        let key: PublicKeyResponse = key.parse("public key")?;
        if key.public_key.trim().is_empty() {
            return Err(BridgeError::invalid_input(NO_RECIPIENT_KEY));
        }

        let body = PrivateTransferRequest {
            from: self.keys.address(),
            to: &to,
            amount: amount.raw().to_string(),
            from_private_key: self.keys.secret_b64(),
            to_public_key: &key.public_key,
        };
        let response = self.rpc.post("/private_transfer", &body).await;
        if !response.is_ok() {
            return Err(response.into_error());
        }

        tracing::info!(
            from = %self.keys.address(),
            to = %to,
            amount = %amount,
            "Private transfer submitted"
        );
        Ok(SubmissionResponse::accepted(response.json))
    }

    async fn claim(&self, request: ClaimTransferRequest) -> BridgeResult<SubmissionResponse> {
        let transfer_id = request.transfer_id.unwrap_or_default();
        let transfer_id = transfer_id.trim();
        if transfer_id.is_empty() {
            return Err(BridgeError::invalid_input("transfer_id is required"));
        }

        let body = ClaimRequest {
            recipient_address: self.keys.address(),
            private_key: self.keys.secret_b64(),
            transfer_id,
        };
        let response = self.rpc.post("/claim_private_transfer", &body).await;
        if !response.is_ok() {
            return Err(response.into_error());
        }

        tracing::info!(transfer_id = %transfer_id, "Private transfer claimed");
        Ok(SubmissionResponse::accepted(response.json))
    }
}

impl WalletBridge {
    /// Sign and submit a public transfer using the next account nonce.
    pub async fn send(&self, request: SendRequest) -> BridgeResult<SendResponse> {
        self.session().await?.send(request).await
    }

    /// Move funds from the public into the confidential balance.
    pub async fn encrypt(&self, request: BalanceChangeRequest) -> BridgeResult<SubmissionResponse> {
        self.session()
            .await?
            .change_encrypted_balance(BalanceChange::Encrypt, request)
            .await
    }

    /// Move funds from the confidential back into the public balance.
    pub async fn decrypt(&self, request: BalanceChangeRequest) -> BridgeResult<SubmissionResponse> {
        self.session()
            .await?
            .change_encrypted_balance(BalanceChange::Decrypt, request)
            .await
    }

    pub async fn private_transfer(
        &self,
        request: PrivateSendRequest,
    ) -> BridgeResult<SubmissionResponse> {
        self.session().await?.private_transfer(request).await
    }

    pub async fn claim(&self, request: ClaimTransferRequest) -> BridgeResult<SubmissionResponse> {
        self.session().await?.claim(request).await
    }
}
