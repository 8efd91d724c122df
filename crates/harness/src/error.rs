//! Run-level error taxonomy.

use aead_core::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{op} failed at iteration {iteration}: {source}")]
    Backend {
        op: &'static str,
        iteration: u32,
        #[source]
        source: BackendError,
    },

    #[error("verification failed at iteration {iteration}: decrypted output differs from the original plaintext")]
    Verification { iteration: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_text_carries_operation_and_index() {
        let e = HarnessError::Backend {
            op: "encrypt",
            iteration: 7,
            source: BackendError::AuthenticationFailure,
        };
        assert_eq!(
            e.to_string(),
            "encrypt failed at iteration 7: authentication failed (tag mismatch or wrong key)"
        );
    }
}
