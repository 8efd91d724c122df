//! Native provider behind a message-passing bridge.
//!
//! Models the platform-bridge call convention: the request crosses the
//! channel as a named-argument bundle of raw bytes, the response carries
//! either the output bytes or a structured failure with a string code
//! that the caller maps back into the shared error taxonomy. The provider
//! itself (ring) lives on its own worker thread; a dead channel surfaces
//! as a transport failure, never a panic.

use std::sync::mpsc;
use std::thread;

use aead_core::{
    check_key, check_nonce, check_sealed, AeadBackend, Algorithm, BackendError, BackendKind,
    KEY_LEN, NONCE_LEN, TAG_LEN,
};
use parking_lot::Mutex;
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey};

const CODE_INVALID_KEY_LENGTH: &str = "INVALID_KEY_LENGTH";
const CODE_INVALID_NONCE_LENGTH: &str = "INVALID_NONCE_LENGTH";
const CODE_INVALID_INPUT_LENGTH: &str = "INVALID_INPUT_LENGTH";
const CODE_AUTH_FAILED: &str = "AUTH_FAILED";
const CODE_INTERNAL: &str = "INTERNAL_ERROR";

enum BridgeOp {
    Seal,
    Open,
}

struct BridgeFailure {
    code: String,
    message: String,
}

struct BridgeRequest {
    op: BridgeOp,
    algorithm: Algorithm,
    key: Vec<u8>,
    nonce: Vec<u8>,
    payload: Vec<u8>,
    reply: mpsc::Sender<Result<Vec<u8>, BridgeFailure>>,
}

pub struct BridgedBackend {
    requests: Mutex<mpsc::Sender<BridgeRequest>>,
}

impl BridgedBackend {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<BridgeRequest>();
        thread::spawn(move || {
            while let Ok(request) = rx.recv() {
                let reply = request.reply.clone();
                let _ = reply.send(serve(request));
            }
        });
        Self { requests: Mutex::new(tx) }
    }

    fn call(
        &self,
        op: BridgeOp,
        algorithm: Algorithm,
        key: &[u8],
        nonce: &[u8],
        payload: &[u8],
    ) -> Result<Vec<u8>, BackendError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        let request = BridgeRequest {
            op,
            algorithm,
            key: key.to_vec(),
            nonce: nonce.to_vec(),
            payload: payload.to_vec(),
            reply: reply_tx,
        };
        self.requests
            .lock()
            .send(request)
            .map_err(|_| BackendError::Transport("bridge worker is gone".into()))?;
        let response = reply_rx
            .recv()
            .map_err(|_| BackendError::Transport("bridge worker dropped the reply".into()))?;
        response.map_err(map_failure)
    }
}

impl Default for BridgedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AeadBackend for BridgedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::BridgedNative
    }

    fn seal(
        &self,
        algorithm: Algorithm,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, BackendError> {
        // Validate before crossing the bridge; a malformed call never leaves
        // this side.
        check_key(key)?;
        check_nonce(nonce)?;
        self.call(BridgeOp::Seal, algorithm, key, nonce, plaintext)
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
        self.call(BridgeOp::Open, algorithm, key, nonce, sealed)
    }
}

fn ring_algorithm(algorithm: Algorithm) -> &'static aead::Algorithm {
    match algorithm {
        Algorithm::Aes256Gcm => &aead::AES_256_GCM,
        Algorithm::ChaCha20Poly1305 => &aead::CHACHA20_POLY1305,
    }
}

fn failure(code: &str, message: String) -> BridgeFailure {
    BridgeFailure { code: code.to_string(), message }
}

/// Provider side of the bridge. Re-validates its inputs and answers with
/// string codes, the same contract a remote provider would honor.
fn serve(request: BridgeRequest) -> Result<Vec<u8>, BridgeFailure> {
    if request.key.len() != KEY_LEN {
        return Err(failure(
            CODE_INVALID_KEY_LENGTH,
            format!("provider requires a {}-byte key, got {}", KEY_LEN, request.key.len()),
        ));
    }
    if request.nonce.len() != NONCE_LEN {
        return Err(failure(
            CODE_INVALID_NONCE_LENGTH,
            format!("provider requires a {}-byte nonce, got {}", NONCE_LEN, request.nonce.len()),
        ));
    }
    let unbound = UnboundKey::new(ring_algorithm(request.algorithm), &request.key)
        .map_err(|_| failure(CODE_INTERNAL, "provider key init failed".into()))?;
    let provider_key = LessSafeKey::new(unbound);
    let nonce = Nonce::try_assume_unique_for_key(&request.nonce)
        .map_err(|_| failure(CODE_INVALID_NONCE_LENGTH, "provider nonce init failed".into()))?;

    match request.op {
        BridgeOp::Seal => {
            let mut buf = request.payload;
            provider_key
                .seal_in_place_append_tag(nonce, Aad::empty(), &mut buf)
                .map_err(|_| failure(CODE_INTERNAL, "provider seal failed".into()))?;
            Ok(buf)
        }
        BridgeOp::Open => {
            if request.payload.len() < TAG_LEN {
                return Err(failure(
                    CODE_INVALID_INPUT_LENGTH,
                    format!("sealed input of {} bytes is shorter than the tag", request.payload.len()),
                ));
            }
            let mut buf = request.payload;
            let plaintext_len = provider_key
                .open_in_place(nonce, Aad::empty(), &mut buf)
                .map_err(|_| failure(CODE_AUTH_FAILED, "tag verification failed".into()))?
                .len();
            buf.truncate(plaintext_len);
            Ok(buf)
        }
    }
}

fn map_failure(f: BridgeFailure) -> BackendError {
    match f.code.as_str() {
        CODE_AUTH_FAILED => BackendError::AuthenticationFailure,
        CODE_INVALID_KEY_LENGTH | CODE_INVALID_NONCE_LENGTH | CODE_INVALID_INPUT_LENGTH => {
            BackendError::InvalidArguments(f.message)
        }
        _ => BackendError::Internal(f.message),
    }
}
