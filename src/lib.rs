// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Octra Bridge - Local Wallet Bridge
//!
//! Runs on the user's machine, holds a single account's signing key, and
//! relays signed transfers and confidential balance updates from the browser
//! UI to a remote Octra RPC node.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `bridge` - Account operations and session lifecycle
//! - `rpc` - Transport and endpoint schemas for the remote node
//! - `wallet` - Keys, amounts, signing and balance encryption

pub mod api;
pub mod bridge;
pub mod config;
pub mod error;
pub mod rpc;
pub mod state;
pub mod wallet;

#[cfg(test)]
mod test_support;
