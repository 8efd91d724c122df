//! Uniform AEAD backend contract shared by the three execution strategies.
//!
//! Backends only ever exchange raw bytes: a 32-byte key, a 12-byte nonce,
//! and a sealed buffer (ciphertext followed by a 16-byte tag). Everything
//! backend-specific (cipher instances, worker channels, native pointers)
//! stays behind [`AeadBackend`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod keys;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Aes256Gcm,
    ChaCha20Poly1305,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Aes256Gcm, Algorithm::ChaCha20Poly1305];

    pub fn token(&self) -> &'static str {
        match self {
            Algorithm::Aes256Gcm => "aes-256-gcm",
            Algorithm::ChaCha20Poly1305 => "chacha20-poly1305",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// In-process AEAD library call, executed on a background worker.
    Library,
    /// Native provider reached through a message-passing bridge.
    BridgedNative,
    /// Direct foreign-function call into the native provider.
    DirectNative,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::Library,
        BackendKind::BridgedNative,
        BackendKind::DirectNative,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            BackendKind::Library => "library",
            BackendKind::BridgedNative => "bridged-native",
            BackendKind::DirectNative => "direct-native",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid nonce length: expected {expected} bytes, got {got}")]
    InvalidNonceLength { expected: usize, got: usize },

    #[error("sealed input too short: got {got} bytes, need at least {min}")]
    InvalidInputLength { min: usize, got: usize },

    #[error("authentication failed (tag mismatch or wrong key)")]
    AuthenticationFailure,

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("algorithm unavailable: {0}")]
    AlgorithmUnavailable(Algorithm),

    #[error("bridge transport failure: {0}")]
    Transport(String),

    #[error("internal backend error: {0}")]
    Internal(String),
}

/// One encrypt/decrypt capability pair over raw bytes.
///
/// `seal` returns ciphertext with the 16-byte tag appended. `open` rejects
/// tag mismatch, wrong keys, and inputs shorter than the tag as an `Err`,
/// never a panic. The nonce is carried by the caller between the two calls;
/// no backend embeds it in its output.
pub trait AeadBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn seal(
        &self,
        algorithm: Algorithm,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, BackendError>;

    fn open(
        &self,
        algorithm: Algorithm,
        key: &[u8],
        nonce: &[u8],
        sealed: &[u8],
    ) -> Result<Vec<u8>, BackendError>;
}

pub fn check_key(key: &[u8]) -> Result<(), BackendError> {
    if key.len() != KEY_LEN {
        return Err(BackendError::InvalidKeyLength {
            expected: KEY_LEN,
            got: key.len(),
        });
    }
    Ok(())
}

pub fn check_nonce(nonce: &[u8]) -> Result<(), BackendError> {
    if nonce.len() != NONCE_LEN {
        return Err(BackendError::InvalidNonceLength {
            expected: NONCE_LEN,
            got: nonce.len(),
        });
    }
    Ok(())
}

pub fn check_sealed(sealed: &[u8]) -> Result<(), BackendError> {
    if sealed.len() < TAG_LEN {
        return Err(BackendError::InvalidInputLength {
            min: TAG_LEN,
            got: sealed.len(),
        });
    }
    Ok(())
}
