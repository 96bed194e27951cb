// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use octra_bridge::{
    api::router,
    bridge::WalletBridge,
    config::{ServerConfig, WalletStore, LOG_FORMAT_ENV},
    state::AppState,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ServerConfig::from_env();
    let store = WalletStore::discover();
    let bridge = WalletBridge::new(store);

    match bridge.load_from_store().await {
        Ok(true) => {}
        Ok(false) => tracing::info!(
            path = %bridge.store().path().display(),
            "No wallet file found; waiting for setup through the UI"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            path = %bridge.store().path().display(),
            "Wallet file could not be loaded; waiting for setup through the UI"
        ),
    }

    let state = AppState::new(bridge);
    let app = router(state.clone(), &config.webui_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!(
        addr = %addr,
        webui = %config.webui_dir.display(),
        "Octra bridge listening on http://{addr} (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");

    state.bridge.shutdown().await;
}
