// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote Octra RPC node integration.
//!
//! This module provides:
//! - A transport with a single uniform failure channel
//! - Typed request bodies and response schemas per endpoint

pub mod client;
pub mod types;

pub use client::{HttpMethod, RpcClient, RpcResponse, DEFAULT_TIMEOUT, PRIVATE_KEY_HEADER};
