// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only account queries.

use super::types::{
    BalanceView, Direction, EncryptedBalanceView, HistoryEntry, HistoryView,
    PendingTransfersView, StateResponse,
};
use super::{BridgeSession, WalletBridge};
use crate::error::BridgeResult;
use crate::rpc::types::{
    AddressInfo, BalanceResponse, EncryptedBalanceResponse, PendingTransfersResponse, TxLookup,
};
use crate::wallet::Amount;

/// Number of recent transactions resolved for the history view.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

impl BridgeSession {
    /// Public balance and current nonce. An account unknown to the node is
    /// a fresh account with zero balance and nonce.
    pub async fn balance_nonce(&self) -> BridgeResult<BalanceResponse> {
        let path = format!("/balance/{}", self.keys.address());
        let response = self.rpc.get(&path, false).await;

        if response.status == 404 {
            return Ok(BalanceResponse {
                balance: Amount::ZERO,
                nonce: 0,
            });
        }
        if !response.is_ok() || response.json.is_none() {
            return Err(response.into_error());
        }
        response.parse("balance")
    }

    /// Confidential balance summary (authenticated read).
    pub async fn encrypted_balance(&self) -> BridgeResult<EncryptedBalanceResponse> {
        let path = format!("/view_encrypted_balance/{}", self.keys.address());
        let response = self.rpc.get(&path, true).await;
        if !response.is_ok() {
            return Err(response.into_error());
        }
        response.parse("encrypted balance")
    }

    /// Private transfers waiting to be claimed (authenticated read).
    pub async fn pending_private_transfers(&self) -> BridgeResult<PendingTransfersView> {
        let path = format!("/pending_private_transfers?address={}", self.keys.address());
        let response = self.rpc.get(&path, true).await;
        if !response.is_ok() {
            return Err(response.into_error());
        }
        let pending: PendingTransfersResponse = response.parse("pending transfers")?;
        Ok(PendingTransfersView {
            pending_transfers: pending.pending_transfers,
        })
    }

    /// Resolve up to `limit` recent transactions.
    ///
    /// References that cannot be resolved (failed lookup, missing hash or
    /// missing parsed transaction) are left out.
    pub async fn history(&self, limit: usize) -> BridgeResult<HistoryView> {
        let address = self.keys.address();
        let response = self
            .rpc
            .get(&format!("/address/{address}?limit={limit}"), false)
            .await;
        if !response.is_ok() {
            return Err(response.into_error());
        }
        let info: AddressInfo = response.parse("address")?;

        let mut items = Vec::with_capacity(info.recent_transactions.len());
        for reference in info.recent_transactions {
            let Some(hash) = reference.hash.filter(|h| !h.is_empty()) else {
                continue;
            };

            let lookup = self.rpc.get(&format!("/tx/{hash}"), false).await;
            if !lookup.is_ok() {
                tracing::debug!(
                    hash = %hash,
                    status = lookup.status,
                    "Skipping unresolved transaction"
                );
                continue;
            }
            let Some(tx) = lookup
                .parse::<TxLookup>("transaction")
                .ok()
                .and_then(|lookup| lookup.parsed_tx)
            else {
                continue;
            };

            let direction = if tx.to.as_deref() == Some(address) {
                Direction::In
            } else {
                Direction::Out
            };
            items.push(HistoryEntry {
                hash,
                direction,
                amount: tx.amount().value(),
                from: tx.from,
                to: tx.to,
                nonce: tx.nonce,
                timestamp: tx.timestamp,
                epoch: reference.epoch,
            });
        }

        Ok(HistoryView { items })
    }
}

impl From<BalanceResponse> for BalanceView {
    fn from(resp: BalanceResponse) -> Self {
        Self {
            balance: resp.balance.as_f64(),
            nonce: resp.nonce,
        }
    }
}

impl From<EncryptedBalanceResponse> for EncryptedBalanceView {
    fn from(resp: EncryptedBalanceResponse) -> Self {
        Self {
            public: resp.public_balance.as_f64(),
            public_raw: resp.public_balance_raw.raw(),
            encrypted: resp.encrypted_balance.as_f64(),
            encrypted_raw: resp.encrypted_balance_raw.raw(),
            total: resp.total_balance.as_f64(),
        }
    }
}

impl WalletBridge {
    pub async fn balance(&self) -> BridgeResult<BalanceView> {
        self.session().await?.balance_nonce().await.map(Into::into)
    }

    pub async fn encrypted_balance(&self) -> BridgeResult<EncryptedBalanceView> {
        self.session()
            .await?
            .encrypted_balance()
            .await
            .map(Into::into)
    }

    pub async fn pending_private_transfers(&self) -> BridgeResult<PendingTransfersView> {
        self.session().await?.pending_private_transfers().await
    }

    pub async fn history(&self) -> BridgeResult<HistoryView> {
        self.session().await?.history(DEFAULT_HISTORY_LIMIT).await
    }

    /// Balance, confidential view, pending transfers and history, fetched
    /// concurrently. Each part succeeds or fails on its own.
    pub async fn state(&self) -> BridgeResult<StateResponse> {
        let session = self.session().await?;
        let (balance, encrypted, pending, history) = tokio::join!(
            session.balance_nonce(),
            session.encrypted_balance(),
            session.pending_private_transfers(),
            session.history(DEFAULT_HISTORY_LIMIT),
        );

        Ok(StateResponse {
            ok: true,
            balance: balance.map(BalanceView::from).into(),
            encrypted: encrypted.map(EncryptedBalanceView::from).into(),
            pending_private: pending.into(),
            history: history.into(),
        })
    }
}
