// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::bridge::WalletBridge;

/// Context shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<WalletBridge>,
}

impl AppState {
    pub fn new(bridge: WalletBridge) -> Self {
        Self {
            bridge: Arc::new(bridge),
        }
    }
}
