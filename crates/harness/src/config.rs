//! Run configuration.

use aead_core::{Algorithm, BackendKind};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// The four inputs that parameterize one benchmark run. Immutable once the
/// run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub backend: BackendKind,
    pub algorithm: Algorithm,
    pub data_size: usize,
    pub iterations: u32,
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.data_size == 0 {
            return Err(HarnessError::InvalidConfiguration(
                "data size must be a positive number of bytes".into(),
            ));
        }
        if self.iterations == 0 {
            return Err(HarnessError::InvalidConfiguration(
                "iteration count must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(data_size: usize, iterations: u32) -> BenchmarkConfig {
        BenchmarkConfig {
            backend: BackendKind::DirectNative,
            algorithm: Algorithm::Aes256Gcm,
            data_size,
            iterations,
        }
    }

    #[test]
    fn rejects_zero_size_and_zero_iterations() {
        assert!(config(0, 10).validate().is_err());
        assert!(config(1024, 0).validate().is_err());
        assert!(config(1, 1).validate().is_ok());
    }
}
