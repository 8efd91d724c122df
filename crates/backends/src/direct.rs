//! Direct foreign-function backend.
//!
//! Calls straight into the native provider's C ABI on the caller's thread:
//! raw pointers, caller-allocated output buffers, integer status codes.
//! Buffers are plain `Vec`s scoped to each call, so they are released on
//! every exit path, early errors included.

use aead_core::{
    check_key, check_nonce, check_sealed, AeadBackend, Algorithm, BackendError, BackendKind,
    TAG_LEN,
};
use libc::c_int;

type NativeAeadFn = unsafe extern "C" fn(
    *const u8,
    usize,
    *const u8,
    *const u8,
    usize,
    *const u8,
    usize,
    *mut u8,
) -> c_int;

pub struct DirectBackend;

impl DirectBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DirectBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn seal_fn(algorithm: Algorithm) -> NativeAeadFn {
    match algorithm {
        Algorithm::Aes256Gcm => native_aead::aead_seal_aes256gcm,
        Algorithm::ChaCha20Poly1305 => native_aead::aead_seal_chacha20poly1305,
    }
}

fn open_fn(algorithm: Algorithm) -> NativeAeadFn {
    match algorithm {
        Algorithm::Aes256Gcm => native_aead::aead_open_aes256gcm,
        Algorithm::ChaCha20Poly1305 => native_aead::aead_open_chacha20poly1305,
    }
}

fn interpret_status(status: c_int, mut out: Vec<u8>) -> Result<Vec<u8>, BackendError> {
    match status {
        n if n >= 0 => {
            out.truncate(n as usize);
            Ok(out)
        }
        -2 => Err(BackendError::AuthenticationFailure),
        -1 => Err(BackendError::InvalidArguments("native provider rejected the call".into())),
        other => Err(BackendError::Internal(format!("unknown native status {other}"))),
    }
}

impl AeadBackend for DirectBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::DirectNative
    }

    fn seal(
        &self,
        algorithm: Algorithm,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, BackendError> {
        check_key(key)?;
        check_nonce(nonce)?;
        let mut out = vec![0u8; plaintext.len() + TAG_LEN];
        let status = unsafe {
            seal_fn(algorithm)(
                plaintext.as_ptr(),
                plaintext.len(),
                key.as_ptr(),
                nonce.as_ptr(),
                nonce.len(),
                std::ptr::null(),
                0,
                out.as_mut_ptr(),
            )
        };
        interpret_status(status, out)
    }

    fn open(
        &self,
        algorithm: Algorithm,
        key: &[u8],
        nonce: &[u8],
        sealed: &[u8],
    ) -> Result<Vec<u8>, BackendError> {
        check_key(key)?;
        check_nonce(nonce)?;
        check_sealed(sealed)?;
        let mut out = vec![0u8; sealed.len().saturating_sub(TAG_LEN)];
        let status = unsafe {
            open_fn(algorithm)(
                sealed.as_ptr(),
                sealed.len(),
                key.as_ptr(),
                nonce.as_ptr(),
                nonce.len(),
                std::ptr::null(),
                0,
                out.as_mut_ptr(),
            )
        };
        interpret_status(status, out)
    }
}
