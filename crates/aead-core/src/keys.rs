//! Session key material and per-operation nonces.
//!
//! Keys are generated once per session per algorithm family and never
//! mutated afterwards; runs borrow them read-only. Nonces come fresh from
//! the OS random source for every encrypt call. Uniqueness per key rests
//! on the 96-bit random space, which is sufficient at benchmark iteration
//! counts.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::{Algorithm, KEY_LEN, NONCE_LEN};

#[derive(Clone)]
pub struct SessionKeys {
    aes: [u8; KEY_LEN],
    chacha: [u8; KEY_LEN],
}

impl SessionKeys {
    pub fn generate() -> Self {
        let mut aes = [0u8; KEY_LEN];
        let mut chacha = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut aes);
        OsRng.fill_bytes(&mut chacha);
        Self { aes, chacha }
    }

    pub fn for_algorithm(&self, algorithm: Algorithm) -> &[u8; KEY_LEN] {
        match algorithm {
            Algorithm::Aes256Gcm => &self.aes,
            Algorithm::ChaCha20Poly1305 => &self.chacha,
        }
    }
}

pub fn fresh_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

pub fn random_plaintext(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}
