// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account key material.
//!
//! ## Security
//!
//! - The secret key is held in zeroizing buffers and never logged
//! - The only place it leaves the process is the authenticated header and
//!   request bodies sent to the operator-configured RPC node
//! - Derivation failures are reported as `InvalidWalletData` without the
//!   underlying crypto library's message

use std::fmt;

use base64ct::{Base64, Encoding};
use ed25519_dalek::{Signature, Signer, SigningKey, SECRET_KEY_LENGTH};
use zeroize::Zeroizing;

use super::address::is_valid_address;
use crate::config::{WalletRecord, DEFAULT_RPC_URL};
use crate::error::{BridgeError, BridgeResult};

/// Length of a secret key that carries its public half (`seed || public`).
const KEYPAIR_LENGTH: usize = 64;

/// Validated signing key, address and RPC endpoint for one account.
///
/// Instances are immutable; reconfiguration replaces the whole value.
pub struct KeyMaterial {
    secret_b64: Zeroizing<String>,
    secret_bytes: Zeroizing<Vec<u8>>,
    signing_key: SigningKey,
    public_key_b64: String,
    address: String,
    rpc_url: String,
}

impl KeyMaterial {
    /// Load and validate key material from a wallet record.
    pub fn load(record: &WalletRecord) -> BridgeResult<Self> {
        let secret_b64 = record.priv_key.trim();
        let address = record.addr.trim();
        if secret_b64.is_empty() || address.is_empty() {
            return Err(BridgeError::invalid_wallet("wallet record is missing priv/addr"));
        }
        if !is_valid_address(address) {
            return Err(BridgeError::invalid_wallet("invalid address"));
        }

        let secret_bytes = Zeroizing::new(
            Base64::decode_vec(secret_b64)
                .map_err(|_| BridgeError::invalid_wallet("invalid private key format"))?,
        );
        let signing_key = signing_key_from_bytes(&secret_bytes)?;
        let public_key_b64 = Base64::encode_string(signing_key.verifying_key().as_bytes());

        let rpc = record.rpc.trim();
        let rpc = if rpc.is_empty() { DEFAULT_RPC_URL } else { rpc };

        Ok(Self {
            secret_b64: Zeroizing::new(secret_b64.to_string()),
            secret_bytes,
            signing_key,
            public_key_b64,
            address: address.to_string(),
            rpc_url: rpc.trim_end_matches('/').to_string(),
        })
    }

    /// Account address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Base64 public key, safe to disclose.
    pub fn public_key(&self) -> &str {
        &self.public_key_b64
    }

    /// RPC base URL without trailing slash.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Base64 secret key as it appears in the wallet record.
    pub(crate) fn secret_b64(&self) -> &str {
        &self.secret_b64
    }

    /// Decoded secret key bytes.
    pub(crate) fn secret_bytes(&self) -> &[u8] {
        &self.secret_bytes
    }

    /// Sign `message` with the account key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("address", &self.address)
            .field("public_key", &self.public_key_b64)
            .field("rpc_url", &self.rpc_url)
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn signing_key_from_bytes(bytes: &[u8]) -> BridgeResult<SigningKey> {
    match bytes.len() {
        SECRET_KEY_LENGTH => {
            let mut seed = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
            seed.copy_from_slice(bytes);
            Ok(SigningKey::from_bytes(&seed))
        }
        KEYPAIR_LENGTH => {
            let mut pair = Zeroizing::new([0u8; KEYPAIR_LENGTH]);
            pair.copy_from_slice(bytes);
            SigningKey::from_keypair_bytes(&pair)
                .map_err(|_| BridgeError::invalid_wallet("invalid private key format"))
        }
        _ => Err(BridgeError::invalid_wallet("invalid private key format")),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::wallet::address::tests::ALICE;
    use ed25519_dalek::Verifier;

    /// Deterministic 32-byte seed used across the test suite.
    pub(crate) const TEST_SEED: [u8; 32] = [7u8; 32];

    pub(crate) fn test_secret_b64() -> String {
        Base64::encode_string(&TEST_SEED)
    }

    pub(crate) fn test_record(rpc: &str) -> WalletRecord {
        WalletRecord {
            priv_key: test_secret_b64(),
            addr: ALICE.to_string(),
            rpc: rpc.to_string(),
        }
    }

    pub(crate) fn test_keys() -> KeyMaterial {
        KeyMaterial::load(&test_record("https://node.example/")).unwrap()
    }

    #[test]
    fn load_derives_public_key_and_strips_rpc_slash() {
        let keys = test_keys();
        let expected = SigningKey::from_bytes(&TEST_SEED).verifying_key();
        assert_eq!(keys.public_key(), Base64::encode_string(expected.as_bytes()));
        assert_eq!(keys.address(), ALICE);
        assert_eq!(keys.rpc_url(), "https://node.example");
        assert_eq!(keys.secret_bytes(), &TEST_SEED);
    }

    #[test]
    fn accepts_keypair_encoding() {
        let signing = SigningKey::from_bytes(&TEST_SEED);
        let mut record = test_record("https://node.example");
        record.priv_key = Base64::encode_string(&signing.to_keypair_bytes());

        let keys = KeyMaterial::load(&record).unwrap();
        assert_eq!(keys.public_key(), test_keys().public_key());
    }

    #[test]
    fn rejects_mismatched_keypair() {
        let mut pair = SigningKey::from_bytes(&TEST_SEED).to_keypair_bytes();
        pair[40] ^= 0xff;
        let mut record = test_record("https://node.example");
        record.priv_key = Base64::encode_string(&pair);

        assert_eq!(
            KeyMaterial::load(&record).unwrap_err(),
            BridgeError::invalid_wallet("invalid private key format")
        );
    }

    #[test]
    fn rejects_bad_base64_and_lengths() {
        for priv_key in ["not base64!!", &Base64::encode_string(&[1u8; 16])] {
            let mut record = test_record("https://node.example");
            record.priv_key = priv_key.to_string();
            assert!(matches!(
                KeyMaterial::load(&record),
                Err(BridgeError::InvalidWalletData(_))
            ));
        }
    }

    #[test]
    fn rejects_missing_fields() {
        let mut record = test_record("https://node.example");
        record.addr.clear();
        assert_eq!(
            KeyMaterial::load(&record).unwrap_err(),
            BridgeError::invalid_wallet("wallet record is missing priv/addr")
        );
    }

    #[test]
    fn empty_rpc_uses_default() {
        let keys = KeyMaterial::load(&test_record("")).unwrap();
        assert_eq!(keys.rpc_url(), DEFAULT_RPC_URL.trim_end_matches('/'));
    }

    #[test]
    fn signatures_verify() {
        let keys = test_keys();
        let signature = keys.sign(b"payload");
        let verifying = SigningKey::from_bytes(&TEST_SEED).verifying_key();
        assert!(verifying.verify(b"payload", &signature).is_ok());
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", test_keys());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&test_secret_b64()));
    }
}
