//! The benchmark runner.
//!
//! Drives one configuration through
//! `Validating → Preparing → Iterating → Aggregating`, checking the cancel
//! token before every state transition and every iteration. A cancelled
//! run abandons cleanly and emits no result; every other outcome produces
//! exactly one immutable [`BenchmarkResult`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use aead_core::keys::{self, SessionKeys};
use aead_core::AeadBackend;
use tracing::{debug, info, trace, warn};

use crate::config::BenchmarkConfig;
use crate::error::HarnessError;
use crate::result::BenchmarkResult;
use crate::sampler::{time_call, CpuTimer, MemorySampler};

/// Iterations between cooperative yields, so a long run does not starve
/// the rest of the process. Outside the timed brackets.
const YIELD_EVERY: u32 = 100;

#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Runner<'a> {
    backend: &'a dyn AeadBackend,
    keys: &'a SessionKeys,
    cancel: CancelToken,
}

impl<'a> Runner<'a> {
    pub fn new(backend: &'a dyn AeadBackend, keys: &'a SessionKeys) -> Self {
        Self::with_cancel(backend, keys, CancelToken::new())
    }

    pub fn with_cancel(
        backend: &'a dyn AeadBackend,
        keys: &'a SessionKeys,
        cancel: CancelToken,
    ) -> Self {
        Self { backend, keys, cancel }
    }

    /// Run one configuration with a freshly generated random plaintext.
    pub fn run(&self, config: &BenchmarkConfig) -> Option<BenchmarkResult> {
        self.run_with_plaintext(config, None)
    }

    /// `shared` lets a suite reuse one plaintext buffer across every cell
    /// of the same data size. Returns `None` only when the run was
    /// cancelled.
    pub fn run_with_plaintext(
        &self,
        config: &BenchmarkConfig,
        shared: Option<&[u8]>,
    ) -> Option<BenchmarkResult> {
        // Validating
        if self.cancel.is_cancelled() {
            return None;
        }
        if let Err(e) = config.validate() {
            return Some(self.fail(config, e));
        }
        if let Some(buf) = shared {
            if buf.len() != config.data_size {
                return Some(self.fail(
                    config,
                    HarnessError::InvalidConfiguration(format!(
                        "shared plaintext is {} bytes but the configuration says {}",
                        buf.len(),
                        config.data_size
                    )),
                ));
            }
        }

        // Preparing
        let owned;
        let plaintext: &[u8] = match shared {
            Some(buf) => buf,
            None => {
                owned = keys::random_plaintext(config.data_size);
                &owned
            }
        };
        let key = self.keys.for_algorithm(config.algorithm);
        if self.cancel.is_cancelled() {
            return None;
        }
        debug!(
            backend = %config.backend,
            algorithm = %config.algorithm,
            data_size = config.data_size,
            iterations = config.iterations,
            "run starting"
        );
        let mut memory = MemorySampler::start();
        let cpu = CpuTimer::start();
        let mut encrypt_us = Vec::with_capacity(config.iterations as usize);
        let mut decrypt_us = Vec::with_capacity(config.iterations as usize);

        // Iterating
        for iteration in 1..=config.iterations {
            if self.cancel.is_cancelled() {
                debug!(iteration, "run abandoned mid-iteration");
                return None;
            }
            let nonce = keys::fresh_nonce();
            trace!(iteration, nonce = %hex::encode(nonce), "iteration nonce");

            let (sealed, elapsed) =
                time_call(|| self.backend.seal(config.algorithm, key, &nonce, plaintext));
            let sealed = match sealed {
                Ok(bytes) => bytes,
                Err(source) => {
                    return Some(self.fail(
                        config,
                        HarnessError::Backend { op: "encrypt", iteration, source },
                    ))
                }
            };
            encrypt_us.push(elapsed);

            let (opened, elapsed) =
                time_call(|| self.backend.open(config.algorithm, key, &nonce, &sealed));
            let opened = match opened {
                Ok(bytes) => bytes,
                Err(source) => {
                    return Some(self.fail(
                        config,
                        HarnessError::Backend { op: "decrypt", iteration, source },
                    ))
                }
            };
            decrypt_us.push(elapsed);

            // Byte-exact compare. Not constant-time: this is a measurement
            // harness verifying its own round-trip, not a crypto boundary.
            if opened != plaintext {
                return Some(self.fail(config, HarnessError::Verification { iteration }));
            }

            memory.sample();
            if iteration % YIELD_EVERY == 0 {
                thread::yield_now();
            }
        }

        // Aggregating
        if self.cancel.is_cancelled() {
            return None;
        }
        let memory = memory.finish();
        let result =
            BenchmarkResult::success(config, &encrypt_us, &decrypt_us, memory, cpu.elapsed_ms());
        info!(
            backend = %config.backend,
            algorithm = %config.algorithm,
            data_size = config.data_size,
            encrypt_mean_us = result.encrypt_mean_us,
            decrypt_mean_us = result.decrypt_mean_us,
            "run finished"
        );
        Some(result)
    }

    fn fail(&self, config: &BenchmarkConfig, error: HarnessError) -> BenchmarkResult {
        warn!(
            backend = %config.backend,
            algorithm = %config.algorithm,
            %error,
            "run failed"
        );
        BenchmarkResult::failure(config, error.to_string())
    }
}
