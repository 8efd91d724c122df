//! C-ABI AEAD provider (ring-backed).
//!
//! Exposes seal/open for AES-256-GCM and ChaCha20-Poly1305 over raw
//! pointers with caller-allocated output buffers, so the harness can
//! exercise a real foreign-function calling convention in-process and the
//! cdylib artifact stays loadable from C.
//!
//! Status codes, shared by all four entry points:
//! - `>= 0`: number of bytes written to the output buffer
//! - `-1`:   null pointer, bad nonce length, or provider init failure
//! - `-2`:   authentication failure on open, or sealed input shorter
//!           than the 16-byte tag
//!
//! Output buffer sizing is the caller's job: `plaintext_len + 16` for
//! seal, `sealed_len - 16` for open.

use libc::{c_int, size_t};
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey};

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

unsafe fn slice_or_empty<'a>(ptr: *const u8, len: size_t) -> Option<&'a [u8]> {
    if len == 0 {
        Some(&[])
    } else if ptr.is_null() {
        None
    } else {
        Some(std::slice::from_raw_parts(ptr, len))
    }
}

unsafe fn seal_impl(
    algorithm: &'static aead::Algorithm,
    plaintext: *const u8,
    plaintext_len: size_t,
    key: *const u8,
    nonce: *const u8,
    nonce_len: size_t,
    aad: *const u8,
    aad_len: size_t,
    out: *mut u8,
) -> c_int {
    if key.is_null() || nonce.is_null() || out.is_null() {
        return -1;
    }
    if nonce_len != NONCE_LEN {
        return -1;
    }
    // Output length is reported through a c_int; refuse inputs that cannot.
    if plaintext_len > (c_int::MAX as size_t) - TAG_LEN {
        return -1;
    }
    let pt = match slice_or_empty(plaintext, plaintext_len) {
        Some(s) => s,
        None => return -1,
    };
    let aad = match slice_or_empty(aad, aad_len) {
        Some(s) => s,
        None => return -1,
    };
    let key = std::slice::from_raw_parts(key, KEY_LEN);
    let nonce = std::slice::from_raw_parts(nonce, NONCE_LEN);

    let unbound = match UnboundKey::new(algorithm, key) {
        Ok(k) => k,
        Err(_) => return -1,
    };
    let sealing_key = LessSafeKey::new(unbound);
    let nonce = match Nonce::try_assume_unique_for_key(nonce) {
        Ok(n) => n,
        Err(_) => return -1,
    };

    let mut buf = pt.to_vec();
    if sealing_key
        .seal_in_place_append_tag(nonce, Aad::from(aad), &mut buf)
        .is_err()
    {
        return -1;
    }
    std::ptr::copy_nonoverlapping(buf.as_ptr(), out, buf.len());
    buf.len() as c_int
}

unsafe fn open_impl(
    algorithm: &'static aead::Algorithm,
    sealed: *const u8,
    sealed_len: size_t,
    key: *const u8,
    nonce: *const u8,
    nonce_len: size_t,
    aad: *const u8,
    aad_len: size_t,
    out: *mut u8,
) -> c_int {
    if sealed.is_null() || key.is_null() || nonce.is_null() || out.is_null() {
        return -1;
    }
    if nonce_len != NONCE_LEN {
        return -1;
    }
    if sealed_len < TAG_LEN {
        return -2;
    }
    if sealed_len > c_int::MAX as size_t {
        return -1;
    }
    let sealed = std::slice::from_raw_parts(sealed, sealed_len);
    let aad = match slice_or_empty(aad, aad_len) {
        Some(s) => s,
        None => return -1,
    };
    let key = std::slice::from_raw_parts(key, KEY_LEN);
    let nonce = std::slice::from_raw_parts(nonce, NONCE_LEN);

    let unbound = match UnboundKey::new(algorithm, key) {
        Ok(k) => k,
        Err(_) => return -1,
    };
    let opening_key = LessSafeKey::new(unbound);
    let nonce = match Nonce::try_assume_unique_for_key(nonce) {
        Ok(n) => n,
        Err(_) => return -1,
    };

    let mut buf = sealed.to_vec();
    let pt = match opening_key.open_in_place(nonce, Aad::from(aad), &mut buf) {
        Ok(pt) => pt,
        Err(_) => return -2,
    };
    std::ptr::copy_nonoverlapping(pt.as_ptr(), out, pt.len());
    pt.len() as c_int
}

/// # Safety
/// `key` must point to 32 readable bytes, `nonce` to `nonce_len` readable
/// bytes, `plaintext` to `plaintext_len` readable bytes (may be null only
/// when the length is 0, same for `aad`), and `out` to at least
/// `plaintext_len + 16` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn aead_seal_aes256gcm(
    plaintext: *const u8,
    plaintext_len: size_t,
    key: *const u8,
    nonce: *const u8,
    nonce_len: size_t,
    aad: *const u8,
    aad_len: size_t,
    out: *mut u8,
) -> c_int {
    seal_impl(
        &aead::AES_256_GCM,
        plaintext,
        plaintext_len,
        key,
        nonce,
        nonce_len,
        aad,
        aad_len,
        out,
    )
}

/// # Safety
/// `key` must point to 32 readable bytes, `nonce` to `nonce_len` readable
/// bytes, `sealed` to `sealed_len` readable bytes, `aad` as in
/// [`aead_seal_aes256gcm`], and `out` to at least `sealed_len - 16`
/// writable bytes.
#[no_mangle]
pub unsafe extern "C" fn aead_open_aes256gcm(
    sealed: *const u8,
    sealed_len: size_t,
    key: *const u8,
    nonce: *const u8,
    nonce_len: size_t,
    aad: *const u8,
    aad_len: size_t,
    out: *mut u8,
) -> c_int {
    open_impl(
        &aead::AES_256_GCM,
        sealed,
        sealed_len,
        key,
        nonce,
        nonce_len,
        aad,
        aad_len,
        out,
    )
}

/// # Safety
/// Same contract as [`aead_seal_aes256gcm`].
#[no_mangle]
pub unsafe extern "C" fn aead_seal_chacha20poly1305(
    plaintext: *const u8,
    plaintext_len: size_t,
    key: *const u8,
    nonce: *const u8,
    nonce_len: size_t,
    aad: *const u8,
    aad_len: size_t,
    out: *mut u8,
) -> c_int {
    seal_impl(
        &aead::CHACHA20_POLY1305,
        plaintext,
        plaintext_len,
        key,
        nonce,
        nonce_len,
        aad,
        aad_len,
        out,
    )
}

/// # Safety
/// Same contract as [`aead_open_aes256gcm`].
#[no_mangle]
pub unsafe extern "C" fn aead_open_chacha20poly1305(
    sealed: *const u8,
    sealed_len: size_t,
    key: *const u8,
    nonce: *const u8,
    nonce_len: size_t,
    aad: *const u8,
    aad_len: size_t,
    out: *mut u8,
) -> c_int {
    open_impl(
        &aead::CHACHA20_POLY1305,
        sealed,
        sealed_len,
        key,
        nonce,
        nonce_len,
        aad,
        aad_len,
        out,
    )
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    use super::*;

    fn seal_chacha(key: &[u8; 32], nonce: &[u8; 12], pt: &[u8]) -> (c_int, Vec<u8>) {
        let mut out = vec![0u8; pt.len() + TAG_LEN];
        let rc = unsafe {
            aead_seal_chacha20poly1305(
                pt.as_ptr(),
                pt.len(),
                key.as_ptr(),
                nonce.as_ptr(),
                nonce.len(),
                std::ptr::null(),
                0,
                out.as_mut_ptr(),
            )
        };
        (rc, out)
    }

    fn open_chacha(key: &[u8; 32], nonce: &[u8; 12], sealed: &[u8]) -> (c_int, Vec<u8>) {
        let mut out = vec![0u8; sealed.len().saturating_sub(TAG_LEN)];
        let rc = unsafe {
            aead_open_chacha20poly1305(
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
        (rc, out)
    }

    #[test]
    fn roundtrip_both_algorithms() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut key = [0u8; 32];
        let mut nonce = [0u8; 12];
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut nonce);
        let mut pt = vec![0u8; 1024];
        rng.fill_bytes(&mut pt);

        let mut sealed = vec![0u8; pt.len() + TAG_LEN];
        let rc = unsafe {
            aead_seal_aes256gcm(
                pt.as_ptr(),
                pt.len(),
                key.as_ptr(),
                nonce.as_ptr(),
                nonce.len(),
                std::ptr::null(),
                0,
                sealed.as_mut_ptr(),
            )
        };
        assert_eq!(rc as usize, pt.len() + TAG_LEN);

        let mut opened = vec![0u8; pt.len()];
        let rc = unsafe {
            aead_open_aes256gcm(
                sealed.as_ptr(),
                sealed.len(),
                key.as_ptr(),
                nonce.as_ptr(),
                nonce.len(),
                std::ptr::null(),
                0,
                opened.as_mut_ptr(),
            )
        };
        assert_eq!(rc as usize, pt.len());
        assert_eq!(opened, pt);

        let (rc, sealed) = seal_chacha(&key, &nonce, &pt);
        assert_eq!(rc as usize, pt.len() + TAG_LEN);
        let (rc, opened) = open_chacha(&key, &nonce, &sealed);
        assert_eq!(rc as usize, pt.len());
        assert_eq!(opened, pt);
    }

    #[test]
    fn empty_plaintext_seals_to_tag_only() {
        let key = [3u8; 32];
        let nonce = [4u8; 12];
        let (rc, sealed) = seal_chacha(&key, &nonce, &[]);
        assert_eq!(rc as usize, TAG_LEN);
        let (rc, opened) = open_chacha(&key, &nonce, &sealed[..TAG_LEN]);
        assert_eq!(rc, 0);
        assert!(opened.is_empty());
    }

    #[test]
    fn tampered_tag_fails_with_minus_two() {
        let key = [5u8; 32];
        let nonce = [6u8; 12];
        let (_, mut sealed) = seal_chacha(&key, &nonce, b"payload");
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        let (rc, _) = open_chacha(&key, &nonce, &sealed);
        assert_eq!(rc, -2);
    }

    #[test]
    fn short_sealed_input_fails_with_minus_two() {
        let key = [7u8; 32];
        let nonce = [8u8; 12];
        let (rc, _) = open_chacha(&key, &nonce, &[0u8; 10]);
        assert_eq!(rc, -2);
    }

    #[test]
    fn bad_nonce_length_fails_with_minus_one() {
        let key = [9u8; 32];
        let pt = b"x";
        let nonce = [0u8; 16];
        let mut out = vec![0u8; pt.len() + TAG_LEN];
        let rc = unsafe {
            aead_seal_aes256gcm(
                pt.as_ptr(),
                pt.len(),
                key.as_ptr(),
                nonce.as_ptr(),
                nonce.len(),
                std::ptr::null(),
                0,
                out.as_mut_ptr(),
            )
        };
        assert_eq!(rc, -1);
    }

    #[test]
    fn null_output_fails_with_minus_one() {
        let key = [1u8; 32];
        let nonce = [2u8; 12];
        let pt = b"x";
        let rc = unsafe {
            aead_seal_aes256gcm(
                pt.as_ptr(),
                pt.len(),
                key.as_ptr(),
                nonce.as_ptr(),
                nonce.len(),
                std::ptr::null(),
                0,
                std::ptr::null_mut(),
            )
        };
        assert_eq!(rc, -1);
    }
}
