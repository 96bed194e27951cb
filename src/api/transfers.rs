// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer and confidential balance endpoints.

use axum::{extract::State, Json};

use super::extract::ApiJson;
use crate::{
    bridge::types::{
        BalanceChangeRequest, ClaimTransferRequest, PrivateSendRequest, SendRequest,
        SendResponse, SubmissionResponse,
    },
    error::ApiError,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/send",
    tag = "Transfers",
    request_body = SendRequest,
    responses(
        (status = 200, description = "Transaction accepted", body = SendResponse),
        (status = 400, description = "Invalid input or insufficient balance"),
        (status = 409, description = "Wallet is not configured"),
        (status = 502, description = "Node rejected the transaction or was unreachable")
    )
)]
pub async fn send(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    Ok(Json(state.bridge.send(request).await?))
}

#[utoipa::path(
    post,
    path = "/api/encrypt",
    tag = "Transfers",
    request_body = BalanceChangeRequest,
    responses(
        (status = 200, description = "Encrypted balance increased", body = SubmissionResponse),
        (status = 400, description = "Invalid amount"),
        (status = 409, description = "Wallet is not configured"),
        (status = 502, description = "Node error")
    )
)]
pub async fn encrypt(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BalanceChangeRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    Ok(Json(state.bridge.encrypt(request).await?))
}

#[utoipa::path(
    post,
    path = "/api/decrypt",
    tag = "Transfers",
    request_body = BalanceChangeRequest,
    responses(
        (status = 200, description = "Encrypted balance decreased", body = SubmissionResponse),
        (status = 400, description = "Invalid amount or insufficient encrypted balance"),
        (status = 409, description = "Wallet is not configured"),
        (status = 502, description = "Node error")
    )
)]
pub async fn decrypt(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BalanceChangeRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    Ok(Json(state.bridge.decrypt(request).await?))
}

#[utoipa::path(
    post,
    path = "/api/private-transfer",
    tag = "Transfers",
    request_body = PrivateSendRequest,
    responses(
        (status = 200, description = "Private transfer submitted", body = SubmissionResponse),
        (status = 400, description = "Invalid input or recipient has no public key"),
        (status = 409, description = "Wallet is not configured"),
        (status = 502, description = "Node error")
    )
)]
pub async fn private_transfer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PrivateSendRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    Ok(Json(state.bridge.private_transfer(request).await?))
}

#[utoipa::path(
    post,
    path = "/api/claim",
    tag = "Transfers",
    request_body = ClaimTransferRequest,
    responses(
        (status = 200, description = "Transfer claimed", body = SubmissionResponse),
        (status = 400, description = "Missing transfer id"),
        (status = 409, description = "Wallet is not configured"),
        (status = 502, description = "Node error")
    )
)]
pub async fn claim(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ClaimTransferRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    Ok(Json(state.bridge.claim(request).await?))
}
