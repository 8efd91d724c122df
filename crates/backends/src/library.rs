//! In-process AEAD library backend.
//!
//! Uses the pure-Rust RustCrypto ciphers, executed by a long-lived
//! background worker thread. Callers submit a job over a channel and block
//! on the reply; the submit-await hand-off is deliberately inside the
//! caller's timing bracket, since that latency is one of the quantities
//! the benchmark compares.

use std::sync::mpsc;
use std::thread;

use aead_core::{
    check_key, check_nonce, check_sealed, AeadBackend, Algorithm, BackendError, BackendKind,
};
use aes_gcm::aead::generic_array::typenum::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, Nonce};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use parking_lot::Mutex;

enum Op {
    Seal,
    Open,
}

struct Job {
    op: Op,
    algorithm: Algorithm,
    key: Vec<u8>,
    nonce: Vec<u8>,
    payload: Vec<u8>,
    reply: mpsc::Sender<Result<Vec<u8>, BackendError>>,
}

pub struct LibraryBackend {
    // Mutex makes the channel end shareable across threads.
    jobs: Mutex<mpsc::Sender<Job>>,
}

impl LibraryBackend {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                let result = execute(&job);
                let _ = job.reply.send(result);
            }
        });
        Self { jobs: Mutex::new(tx) }
    }

    fn submit(
        &self,
        op: Op,
        algorithm: Algorithm,
        key: &[u8],
        nonce: &[u8],
        payload: &[u8],
    ) -> Result<Vec<u8>, BackendError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        let job = Job {
            op,
            algorithm,
            key: key.to_vec(),
            nonce: nonce.to_vec(),
            payload: payload.to_vec(),
            reply: reply_tx,
        };
        self.jobs
            .lock()
            .send(job)
            .map_err(|_| BackendError::Transport("library worker is gone".into()))?;
        reply_rx
            .recv()
            .map_err(|_| BackendError::Transport("library worker dropped the reply".into()))?
    }
}

impl Default for LibraryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AeadBackend for LibraryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Library
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
        self.submit(Op::Seal, algorithm, key, nonce, plaintext)
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
        self.submit(Op::Open, algorithm, key, nonce, sealed)
    }
}

fn execute(job: &Job) -> Result<Vec<u8>, BackendError> {
    match job.algorithm {
        Algorithm::Aes256Gcm => {
            let cipher = Aes256Gcm::new_from_slice(&job.key).map_err(|_| {
                BackendError::InvalidKeyLength { expected: aead_core::KEY_LEN, got: job.key.len() }
            })?;
            run_cipher(&cipher, job)
        }
        Algorithm::ChaCha20Poly1305 => {
            let cipher = ChaCha20Poly1305::new_from_slice(&job.key).map_err(|_| {
                BackendError::InvalidKeyLength { expected: aead_core::KEY_LEN, got: job.key.len() }
            })?;
            run_cipher(&cipher, job)
        }
    }
}

fn run_cipher<C>(cipher: &C, job: &Job) -> Result<Vec<u8>, BackendError>
where
    C: Aead + AeadCore<NonceSize = U12>,
{
    let nonce = Nonce::<C>::from_slice(&job.nonce);
    match job.op {
        Op::Seal => cipher
            .encrypt(nonce, job.payload.as_slice())
            .map_err(|_| BackendError::Internal("library cipher rejected encrypt".into())),
        Op::Open => cipher
            .decrypt(nonce, job.payload.as_slice())
            .map_err(|_| BackendError::AuthenticationFailure),
    }
}
