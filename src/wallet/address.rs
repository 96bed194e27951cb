// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Octra address validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{BridgeError, BridgeResult};

/// `oct` followed by 44 base58 characters (no `0`, `O`, `I`, `l`).
pub const ADDRESS_PATTERN: &str = r"^oct[1-9A-HJ-NP-Za-km-z]{44}$";

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ADDRESS_PATTERN).expect("address pattern compiles"));

/// Whether `address` is a well-formed Octra account identifier.
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

/// Validate a recipient address, trimming surrounding whitespace.
pub fn validate_recipient(address: &str) -> BridgeResult<String> {
    let address = address.trim();
    if !is_valid_address(address) {
        return Err(BridgeError::invalid_input("invalid recipient address"));
    }
    Ok(address.to_string())
}
