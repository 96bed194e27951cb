// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::any::Any;
use std::path::Path;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    bridge::types::{
        BalanceChangeRequest, BalanceView, ClaimTransferRequest, Direction, EncryptedBalanceView,
        HistoryEntry, HistoryView, PendingTransfersView, PrivateSendRequest, SendRequest,
        SendResponse, SetupStatusResponse, SetupWalletRequest, SubmissionResponse,
        WalletInfoResponse,
    },
    error::ApiError,
    state::AppState,
};

pub mod extract;
pub mod health;
pub mod transfers;
pub mod wallet;

/// Build the bridge router. The browser UI is served from `webui_dir`:
/// `index.html` at `/` and every file under `/static/`.
pub fn router(state: AppState, webui_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/setup-status", get(wallet::setup_status))
        .route("/setup-wallet", post(wallet::setup_wallet))
        .route("/wallet", get(wallet::wallet_info))
        .route("/state", get(wallet::account_state))
        .route("/send", post(transfers::send))
        .route("/encrypt", post(transfers::encrypt))
        .route("/decrypt", post(transfers::decrypt))
        .route("/private-transfer", post(transfers::private_transfer))
        .route("/claim", post(transfers::claim));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route_service("/", ServeFile::new(webui_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(webui_dir))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    ApiError::internal().into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        wallet::setup_status,
        wallet::setup_wallet,
        wallet::wallet_info,
        wallet::account_state,
        transfers::send,
        transfers::encrypt,
        transfers::decrypt,
        transfers::private_transfer,
        transfers::claim,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            SetupWalletRequest,
            SetupStatusResponse,
            WalletInfoResponse,
            SendRequest,
            SendResponse,
            BalanceChangeRequest,
            PrivateSendRequest,
            ClaimTransferRequest,
            SubmissionResponse,
            BalanceView,
            EncryptedBalanceView,
            PendingTransfersView,
            HistoryView,
            HistoryEntry,
            Direction,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Wallet", description = "Wallet setup and account state"),
        (name = "Transfers", description = "Transfers and confidential balance"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
