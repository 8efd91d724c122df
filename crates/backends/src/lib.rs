//! The three AEAD execution strategies behind one uniform trait.
//!
//! All three produce the same wire shape (ciphertext followed by a 16-byte
//! tag), so sealed buffers are interchangeable across backends for the
//! same algorithm, key, and nonce. That is what makes the benchmark an
//! apples-to-apples comparison.

mod bridged;
mod direct;
mod library;

pub use bridged::BridgedBackend;
pub use direct::DirectBackend;
pub use library::LibraryBackend;

pub use aead_core::{AeadBackend, Algorithm, BackendError, BackendKind};

pub fn backend_for(kind: BackendKind) -> Box<dyn AeadBackend> {
    match kind {
        BackendKind::Library => Box::new(LibraryBackend::new()),
        BackendKind::BridgedNative => Box::new(BridgedBackend::new()),
        BackendKind::DirectNative => Box::new(DirectBackend::new()),
    }
}
