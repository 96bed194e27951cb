// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-side encryption of the confidential balance.
//!
//! The node stores the ciphertext but cannot produce it: the key is derived
//! from the account secret. Tokens have the form
//! `v2|base64(nonce[12] || ciphertext || tag[16])`.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{BridgeError, BridgeResult};

/// Version prefix of encrypted balance tokens.
pub const TOKEN_PREFIX: &str = "v2|";

/// Domain-separation tag mixed into the key derivation.
const KEY_DOMAIN: &[u8] = b"octra_encrypted_balance_v2";

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Derive the symmetric balance key from the account secret.
///
/// Deterministic: the same secret always yields the same key.
pub fn derive_key(secret: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut hasher = Sha256::new();
    hasher.update(KEY_DOMAIN);
    hasher.update(secret);
    let digest = hasher.finalize();

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&digest[..KEY_LEN]);
    key
}

/// Encrypt a raw balance under a fresh random nonce.
pub fn encrypt_balance(raw: u64, secret: &[u8]) -> BridgeResult<String> {
    let key = derive_key(secret);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, raw.to_string().as_bytes())
        .map_err(|_| BridgeError::Internal("balance encryption failed".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    Ok(format!("{TOKEN_PREFIX}{}", Base64::encode_string(&blob)))
}

/// Decrypt a token produced by [`encrypt_balance`].
pub fn decrypt_balance(token: &str, secret: &[u8]) -> BridgeResult<u64> {
    let encoded = token
        .strip_prefix(TOKEN_PREFIX)
        .ok_or_else(|| BridgeError::invalid_input("unsupported balance token version"))?;
    let blob = Base64::decode_vec(encoded)
        .map_err(|_| BridgeError::invalid_input("malformed balance token"))?;
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(BridgeError::invalid_input("malformed balance token"));
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let key = derive_key(secret);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| BridgeError::invalid_input("balance token authentication failed"))?,
    );

    std::str::from_utf8(&plaintext)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| BridgeError::invalid_input("malformed balance token"))
}
