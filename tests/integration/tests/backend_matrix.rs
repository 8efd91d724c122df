//! Cross-backend contract checks: every execution strategy produces the
//! same wire shape and honors the same failure taxonomy.

use backends::{backend_for, Algorithm, BackendError, BackendKind};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const TAG_LEN: usize = 16;

fn keyed_rng() -> (StdRng, [u8; 32], [u8; 12]) {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut key = [0u8; 32];
    let mut nonce = [0u8; 12];
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut nonce);
    (rng, key, nonce)
}

#[test]
fn round_trip_law_across_backends_and_sizes() {
    let (mut rng, key, nonce) = keyed_rng();
    // 0 (empty), small, block-boundary, and a ≥4 MiB payload.
    for size in [0usize, 1, 1024, 4 * 1024 * 1024] {
        let mut pt = vec![0u8; size];
        rng.fill_bytes(&mut pt);
        for kind in BackendKind::ALL {
            let backend = backend_for(kind);
            for algorithm in Algorithm::ALL {
                let sealed = backend.seal(algorithm, &key, &nonce, &pt).unwrap();
                assert_eq!(sealed.len(), size + TAG_LEN, "{kind}/{algorithm}/{size}");
                let opened = backend.open(algorithm, &key, &nonce, &sealed).unwrap();
                assert_eq!(opened, pt, "{kind}/{algorithm}/{size}");
            }
        }
    }
}

#[test]
fn empty_plaintext_seals_to_exactly_the_tag() {
    let (_, key, nonce) = keyed_rng();
    for kind in BackendKind::ALL {
        let backend = backend_for(kind);
        for algorithm in Algorithm::ALL {
            let sealed = backend.seal(algorithm, &key, &nonce, &[]).unwrap();
            assert_eq!(sealed.len(), TAG_LEN);
            let opened = backend.open(algorithm, &key, &nonce, &sealed).unwrap();
            assert!(opened.is_empty());
        }
    }
}

#[test]
fn flipping_any_single_tag_bit_breaks_authentication() {
    let (mut rng, key, nonce) = keyed_rng();
    let mut pt = vec![0u8; 256];
    rng.fill_bytes(&mut pt);
    for kind in BackendKind::ALL {
        let backend = backend_for(kind);
        for algorithm in Algorithm::ALL {
            let sealed = backend.seal(algorithm, &key, &nonce, &pt).unwrap();
            let tag_start = sealed.len() - TAG_LEN;
            for byte in tag_start..sealed.len() {
                for bit in 0..8 {
                    let mut bad = sealed.clone();
                    bad[byte] ^= 1 << bit;
                    let err = backend.open(algorithm, &key, &nonce, &bad).unwrap_err();
                    assert_eq!(
                        err,
                        BackendError::AuthenticationFailure,
                        "{kind}/{algorithm} byte {byte} bit {bit}"
                    );
                }
            }
        }
    }
}

#[test]
fn sixteen_byte_key_is_rejected_as_invalid_key_length() {
    let nonce = [0u8; 12];
    for kind in BackendKind::ALL {
        let backend = backend_for(kind);
        let err = backend
            .seal(Algorithm::ChaCha20Poly1305, &[0u8; 16], &nonce, b"pt")
            .unwrap_err();
        assert_eq!(err, BackendError::InvalidKeyLength { expected: 32, got: 16 }, "{kind}");
    }
}

#[test]
fn ten_byte_sealed_input_is_rejected_as_invalid_input_length() {
    let (_, key, nonce) = keyed_rng();
    for kind in BackendKind::ALL {
        let backend = backend_for(kind);
        for algorithm in Algorithm::ALL {
            let err = backend.open(algorithm, &key, &nonce, &[0u8; 10]).unwrap_err();
            assert_eq!(err, BackendError::InvalidInputLength { min: 16, got: 10 }, "{kind}");
        }
    }
}

#[test]
fn algorithms_are_not_interchangeable() {
    let (mut rng, key, nonce) = keyed_rng();
    let mut pt = vec![0u8; 64];
    rng.fill_bytes(&mut pt);
    for kind in BackendKind::ALL {
        let backend = backend_for(kind);
        let sealed = backend.seal(Algorithm::Aes256Gcm, &key, &nonce, &pt).unwrap();
        let err = backend
            .open(Algorithm::ChaCha20Poly1305, &key, &nonce, &sealed)
            .unwrap_err();
        assert_eq!(err, BackendError::AuthenticationFailure, "{kind}");
    }
}
