// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Bridge
//!
//! Orchestrates every account operation against the remote node.
//!
//! The active configuration is a [`BridgeSession`]: validated key material,
//! the RPC client bound to it, and a per-account lock. Sessions are
//! immutable. Reconfiguration builds a complete replacement, persists it,
//! swaps it in, and then closes the previous client so requests still in
//! flight on it resolve as transport failures.
//!
//! Every operation except setup and status first snapshots the current
//! session and fails with [`BridgeError::NotConfigured`] when there is none.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::config::{WalletRecord, WalletStore, DEFAULT_RPC_URL};
use crate::error::{BridgeError, BridgeResult};
use crate::rpc::{RpcClient, DEFAULT_TIMEOUT};
use crate::wallet::{is_valid_address, KeyMaterial};

pub mod queries;
pub mod transfers;
pub mod types;

use types::{SetupWalletRequest, WalletInfoResponse};

/// One configured account: keys, transport, and the lock that serializes
/// read-modify-write sequences for it.
pub struct BridgeSession {
    keys: KeyMaterial,
    rpc: RpcClient,
    account_lock: Mutex<()>,
}

impl BridgeSession {
    fn open(record: &WalletRecord, timeout: Duration) -> BridgeResult<Self> {
        let keys = KeyMaterial::load(record)?;
        let rpc = RpcClient::new(keys.rpc_url(), keys.secret_b64()).with_timeout(timeout);
        Ok(Self {
            keys,
            rpc,
            account_lock: Mutex::new(()),
        })
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }
}

pub struct WalletBridge {
    session: RwLock<Option<Arc<BridgeSession>>>,
    store: WalletStore,
    /// Held across persist-then-install so the file matches the active session.
    setup_lock: Mutex<()>,
    rpc_timeout: Duration,
}

impl WalletBridge {
    /// Create an unconfigured bridge persisting to `store`.
    pub fn new(store: WalletStore) -> Self {
        Self {
            session: RwLock::new(None),
            store,
            setup_lock: Mutex::new(()),
            rpc_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request RPC timeout for sessions opened later.
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    pub fn store(&self) -> &WalletStore {
        &self.store
    }

    /// Activate the wallet stored on disk, if there is one.
    ///
    /// Returns whether a wallet was loaded. A missing file leaves the bridge
    /// unconfigured; an unreadable or invalid one is an error and also leaves
    /// it unconfigured.
    pub async fn load_from_store(&self) -> BridgeResult<bool> {
        let record = self.store.load().map_err(|e| {
            BridgeError::invalid_wallet(format!(
                "failed to read {}: {e}",
                self.store.path().display()
            ))
        })?;

        match record {
            Some(record) => {
                self.activate(&record).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn is_configured(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Snapshot of the active session.
    pub async fn session(&self) -> BridgeResult<Arc<BridgeSession>> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(BridgeError::NotConfigured)
    }

    /// Validate, persist and activate a new wallet.
    ///
    /// On any failure the previous configuration stays active.
    pub async fn setup_wallet(&self, request: SetupWalletRequest) -> BridgeResult<()> {
        let record = validate_setup(request)?;
        let session = BridgeSession::open(&record, self.rpc_timeout)?;

        let _guard = self.setup_lock.lock().await;
        self.store.save(&record).map_err(|e| {
            BridgeError::Internal(format!(
                "failed to write {}: {e}",
                self.store.path().display()
            ))
        })?;

        self.install(session).await;
        Ok(())
    }

    /// Apply a record without persisting it.
    pub async fn configure(&self, record: &WalletRecord) -> BridgeResult<()> {
        self.activate(record).await
    }

    async fn activate(&self, record: &WalletRecord) -> BridgeResult<()> {
        let session = BridgeSession::open(record, self.rpc_timeout)?;
        let _guard = self.setup_lock.lock().await;
        self.install(session).await;
        Ok(())
    }

    async fn install(&self, session: BridgeSession) {
        tracing::info!(
            address = %session.keys.address(),
            rpc = %session.keys.rpc_url(),
            "Wallet configured"
        );

        let previous = self.session.write().await.replace(Arc::new(session));
        if let Some(previous) = previous {
            previous.rpc.close();
        }
    }

    /// Drop the active session and release its client.
    pub async fn shutdown(&self) {
        if let Some(session) = self.session.write().await.take() {
            session.rpc.close();
            tracing::info!("Bridge session closed");
        }
    }

    pub async fn wallet_info(&self) -> BridgeResult<WalletInfoResponse> {
        let session = self.session().await?;
        Ok(WalletInfoResponse {
            ok: true,
            address: session.keys.address().to_string(),
            public_key: session.keys.public_key().to_string(),
            rpc: session.keys.rpc_url().to_string(),
        })
    }
}

fn validate_setup(request: SetupWalletRequest) -> BridgeResult<WalletRecord> {
    let priv_key = request.priv_key.unwrap_or_default().trim().to_string();
    let addr = request.addr.unwrap_or_default().trim().to_string();
    let rpc = request
        .rpc
        .map(|rpc| rpc.trim().to_string())
        .filter(|rpc| !rpc.is_empty())
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

    if priv_key.is_empty() {
        return Err(BridgeError::invalid_input("private token is required"));
    }
    if !is_valid_address(&addr) {
        return Err(BridgeError::invalid_input("invalid address"));
    }
    let scheme_ok = Url::parse(&rpc)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !scheme_ok {
        return Err(BridgeError::invalid_input(
            "rpc must start with http:// or https://",
        ));
    }

    Ok(WalletRecord { priv_key, addr, rpc })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::address::tests::{ALICE, BOB};
    use crate::wallet::keys::tests::{test_record, test_secret_b64};
    use tempfile::{tempdir, TempDir};

    fn bridge_in(dir: &TempDir) -> WalletBridge {
        WalletBridge::new(WalletStore::new(dir.path().join("wallet.json")))
    }

    fn setup(addr: &str, rpc: Option<&str>) -> SetupWalletRequest {
        SetupWalletRequest {
            priv_key: Some(test_secret_b64()),
            addr: Some(addr.to_string()),
            rpc: rpc.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn starts_unconfigured() {
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir);
        assert!(!bridge.is_configured().await);
        assert_eq!(
            bridge.wallet_info().await.unwrap_err(),
            BridgeError::NotConfigured
        );
    }

    #[tokio::test]
    async fn missing_wallet_file_stays_unconfigured() {
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir);
        assert!(!bridge.load_from_store().await.unwrap());
        assert!(!bridge.is_configured().await);
    }

    #[tokio::test]
    async fn loads_wallet_from_store() {
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir);
        bridge
            .store()
            .save(&test_record("https://node.example/"))
            .unwrap();

        assert!(bridge.load_from_store().await.unwrap());
        let info = bridge.wallet_info().await.unwrap();
        assert_eq!(info.address, ALICE);
        assert_eq!(info.rpc, "https://node.example");
    }

    #[tokio::test]
    async fn invalid_wallet_file_is_rejected() {
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir);
        let mut record = test_record("https://node.example");
        record.priv_key = "!!!".into();
        bridge.store().save(&record).unwrap();

        assert_eq!(
            bridge.load_from_store().await.unwrap_err(),
            BridgeError::invalid_wallet("invalid private key format")
        );
        assert!(!bridge.is_configured().await);
    }

    #[tokio::test]
    async fn setup_persists_and_activates() {
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir);
        bridge.setup_wallet(setup(ALICE, None)).await.unwrap();

        assert!(bridge.is_configured().await);
        let saved = bridge.store().load().unwrap().unwrap();
        assert_eq!(saved.addr, ALICE);
        assert_eq!(saved.rpc, DEFAULT_RPC_URL);
        assert_eq!(saved.priv_key, test_secret_b64());
    }

    #[tokio::test]
    async fn setup_validation_messages() {
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir);

        let mut request = setup(ALICE, None);
        request.priv_key = Some("   ".into());
        assert_eq!(
            bridge.setup_wallet(request).await.unwrap_err(),
            BridgeError::invalid_input("private token is required")
        );

        assert_eq!(
            bridge.setup_wallet(setup("octBAD", None)).await.unwrap_err(),
            BridgeError::invalid_input("invalid address")
        );

        assert_eq!(
            bridge
                .setup_wallet(setup(ALICE, Some("ftp://node.example")))
                .await
                .unwrap_err(),
            BridgeError::invalid_input("rpc must start with http:// or https://")
        );

        let mut request = setup(ALICE, None);
        request.priv_key = Some("AAAA".into());
        assert_eq!(
            bridge.setup_wallet(request).await.unwrap_err(),
            BridgeError::invalid_wallet("invalid private key format")
        );

        assert!(!bridge.is_configured().await);
        assert!(bridge.store().load().unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_reconfiguration_keeps_previous_session() {
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir);
        bridge.setup_wallet(setup(ALICE, None)).await.unwrap();
        let before = bridge.session().await.unwrap();

        let mut request = setup(BOB, None);
        request.priv_key = Some("not base64!".into());
        assert!(bridge.setup_wallet(request).await.is_err());

        let after = bridge.session().await.unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(!after.rpc().is_closed());
        assert_eq!(bridge.store().load().unwrap().unwrap().addr, ALICE);
    }

    #[tokio::test]
    async fn reconfiguration_swaps_and_closes_previous_client() {
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir);
        bridge
            .setup_wallet(setup(ALICE, Some("http://first.example")))
            .await
            .unwrap();
        let first = bridge.session().await.unwrap();

        bridge
            .setup_wallet(setup(ALICE, Some("http://second.example/")))
            .await
            .unwrap();
        let second = bridge.session().await.unwrap();

        assert!(first.rpc().is_closed());
        assert!(!second.rpc().is_closed());
        assert_eq!(second.rpc().base_url(), "http://second.example");
        assert_eq!(
            bridge.wallet_info().await.unwrap().rpc,
            "http://second.example"
        );
    }

    #[tokio::test]
    async fn concurrent_setups_leave_file_and_session_in_agreement() {
        let dir = tempdir().unwrap();
        let bridge = Arc::new(bridge_in(&dir));

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let bridge = bridge.clone();
                let addr = if i % 2 == 0 { ALICE } else { BOB };
                tokio::spawn(async move { bridge.setup_wallet(setup(addr, None)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let saved = bridge.store().load().unwrap().unwrap();
        assert_eq!(saved.addr, bridge.wallet_info().await.unwrap().address);
    }

    #[tokio::test]
    async fn rpc_timeout_applies_to_new_sessions() {
        let node = crate::test_support::MockNode::start().await;
        node.respond_after(
            "GET",
            &format!("/balance/{ALICE}"),
            Duration::from_secs(5),
        );
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir).with_rpc_timeout(Duration::from_millis(100));
        bridge.configure(&test_record(node.base_url())).await.unwrap();

        assert_eq!(
            bridge.balance().await.unwrap_err(),
            BridgeError::TransportFailure("timeout".into())
        );
    }

    #[tokio::test]
    async fn shutdown_closes_session() {
        let dir = tempdir().unwrap();
        let bridge = bridge_in(&dir);
        bridge.configure(&test_record("http://node.example")).await.unwrap();
        let session = bridge.session().await.unwrap();

        bridge.shutdown().await;
        assert!(session.rpc().is_closed());
        assert!(!bridge.is_configured().await);
    }
}
