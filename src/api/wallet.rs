// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet setup and account state endpoints.

use axum::{extract::State, Json};

use super::extract::ApiJson;
use crate::{
    bridge::types::{
        SetupStatusResponse, SetupWalletRequest, StateResponse, WalletInfoResponse,
    },
    error::ApiError,
    state::AppState,
};

/// Whether a wallet is configured. Always available.
#[utoipa::path(
    get,
    path = "/api/setup-status",
    tag = "Wallet",
    responses(
        (status = 200, description = "Configuration status", body = SetupStatusResponse)
    )
)]
pub async fn setup_status(State(state): State<AppState>) -> Json<SetupStatusResponse> {
    Json(SetupStatusResponse {
        ok: true,
        configured: state.bridge.is_configured().await,
    })
}

/// Configure the wallet and write it to the wallet file.
#[utoipa::path(
    post,
    path = "/api/setup-wallet",
    tag = "Wallet",
    request_body = SetupWalletRequest,
    responses(
        (status = 200, description = "Wallet configured", body = SetupStatusResponse),
        (status = 400, description = "Invalid wallet data")
    )
)]
pub async fn setup_wallet(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SetupWalletRequest>,
) -> Result<Json<SetupStatusResponse>, ApiError> {
    state.bridge.setup_wallet(request).await?;
    Ok(Json(SetupStatusResponse {
        ok: true,
        configured: true,
    }))
}

#[utoipa::path(
    get,
    path = "/api/wallet",
    tag = "Wallet",
    responses(
        (status = 200, description = "Active wallet", body = WalletInfoResponse),
        (status = 409, description = "Wallet is not configured")
    )
)]
pub async fn wallet_info(
    State(state): State<AppState>,
) -> Result<Json<WalletInfoResponse>, ApiError> {
    Ok(Json(state.bridge.wallet_info().await?))
}

/// Balance, confidential balance, pending private transfers and history.
///
/// Each section carries its own `ok` flag; a failed section does not fail
/// the request.
#[utoipa::path(
    get,
    path = "/api/state",
    tag = "Wallet",
    responses(
        (status = 200, description = "Account state"),
        (status = 409, description = "Wallet is not configured")
    )
)]
pub async fn account_state(
    State(state): State<AppState>,
) -> Result<Json<StateResponse>, ApiError> {
    Ok(Json(state.bridge.state().await?))
}
