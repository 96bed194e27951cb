// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account-side primitives for the Octra ledger.
//!
//! This module provides:
//! - Address validation
//! - Amount conversion into smallest units
//! - Key material loading and signing
//! - Client-side encryption of the confidential balance
//! - Canonical transfer construction

pub mod address;
pub mod amount;
pub mod codec;
pub mod keys;
pub mod transaction;

pub use address::{is_valid_address, validate_recipient};
pub use amount::{Amount, MICRO};
pub use keys::KeyMaterial;
pub use transaction::{SignedTransaction, TransactionBuilder};
