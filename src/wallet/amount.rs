// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Amounts in smallest units.
//!
//! The UI sends human-readable decimal amounts ("1.5"); the ledger signs and
//! stores integers scaled by [`MICRO`]. Conversion happens exactly once, in
//! [`Amount::parse`], so the signed amount and the amount used in balance
//! comparisons can never drift apart.

use std::fmt;

use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};

/// Smallest units per whole OCT.
pub const MICRO: u64 = 1_000_000;

/// Number of decimal places carried by [`MICRO`].
const DECIMALS: usize = 6;

/// Amounts below this many whole units are tagged as operation class `"1"`.
const SMALL_TRANSFER_LIMIT: u64 = 1_000;

/// A non-negative amount in smallest units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    /// Display value in whole units.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / MICRO as f64
    }

    /// Parse a user-supplied amount (JSON number or numeric string) that must
    /// be strictly positive.
    pub fn parse(value: &Value) -> BridgeResult<Self> {
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            _ => return Err(BridgeError::invalid_input("amount must be a number")),
        };

        let raw = decimal_to_raw(&text)
            .ok_or_else(|| BridgeError::invalid_input("amount must be a number"))?;
        if raw <= 0 {
            return Err(BridgeError::invalid_input("amount must be > 0"));
        }

        u64::try_from(raw)
            .map(Self)
            .map_err(|_| BridgeError::invalid_input("amount is too large"))
    }

    /// Parse a non-negative decimal reported by the remote node. Values such
    /// as `"12.5 OCT"` are read by their first token.
    pub fn parse_remote(text: &str) -> Option<Self> {
        let token = text.split_whitespace().next().unwrap_or("0");
        let raw = decimal_to_raw(token)?;
        u64::try_from(raw.max(0)).ok().map(Self)
    }

    /// Operation-class tag consumed by the node for fee classification.
    pub fn op_class(self) -> &'static str {
        if self.0 < SMALL_TRANSFER_LIMIT * MICRO {
            "1"
        } else {
            "3"
        }
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / MICRO,
            self.0 % MICRO,
            width = DECIMALS
        )
    }
}

/// Convert a decimal string into smallest units, truncating digits beyond
/// the sixth decimal place. Exponent notation falls back to float parsing.
pub(crate) fn decimal_to_raw(text: &str) -> Option<i128> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.contains(['e', 'E']) {
        let value: f64 = text.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        return Some((value * MICRO as f64).trunc() as i128);
    }

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: i128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let kept = &fraction[..fraction.len().min(DECIMALS)];
    let fraction: i128 = format!("{kept:0<width$}", width = DECIMALS).parse().ok()?;

    let raw = whole.checked_mul(MICRO as i128)?.checked_add(fraction)?;
    Some(if negative { -raw } else { raw })
}
