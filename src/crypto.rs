// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{Error, Result};
use aes_gcm::{
    aead::{Aead, OsRng},
    AeadCore, Aes256Gcm, Key, KeyInit, Nonce,
};

/// Length of an AES-256 key in bytes
pub const KEY_LEN: usize = 32;

/// Length of the per-file GCM nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Whole-file encryption algorithm
///
/// Only AES-256-GCM is defined; other algorithms are reserved.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EncryptionType {
    /// AES-256 in Galois/Counter mode
    Aes256Gcm,
}

/// A validated 32-byte symmetric key
///
/// The key is never persisted; it only lives inside the session (or the
/// consolidation call) it was handed to.
#[derive(Clone)]
pub struct EncryptionKey {
    bytes: [u8; KEY_LEN],
}

impl EncryptionKey {
    /// Validates and wraps raw key bytes.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` if the key is not exactly 32 bytes.
    pub fn new(encryption_type: EncryptionType, bytes: &[u8]) -> Result<Self> {
        let EncryptionType::Aes256Gcm = encryption_type;

        let bytes = bytes
            .try_into()
            .map_err(|_| Error::InvalidArgument("encryption key must be 32 bytes"))?;

        Ok(Self { bytes })
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncryptionKey(<redacted>)")
    }
}

/// Encrypts a fragment blob, producing `nonce || ciphertext || tag`.
///
/// The nonce is random per file; reusing a key across any number of
/// fragments is safe.
pub fn seal(key: &EncryptionKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.bytes));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| Error::Io(std::io::Error::other("encryption failure")))?;

    let mut bytes = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    bytes.extend_from_slice(nonce.as_slice());
    bytes.extend_from_slice(&ciphertext);
    Ok(bytes)
}

/// Decrypts a sealed blob, verifying the authentication tag.
///
/// # Errors
///
/// Fails with `AuthenticationFailed` if the blob is too short to hold a
/// nonce and tag, the tag does not verify, or the key is wrong.
pub fn open(key: &EncryptionKey, bytes: &[u8]) -> Result<Vec<u8>> {
    let Some((nonce, ciphertext)) = bytes.split_at_checked(NONCE_LEN) else {
        return Err(Error::AuthenticationFailed);
    };

    if ciphertext.len() < TAG_LEN {
        return Err(Error::AuthenticationFailed);
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.bytes));

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::AuthenticationFailed)
}
