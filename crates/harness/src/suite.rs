//! The planned-sweep driver: every backend × algorithm × data size,
//! strictly sequentially, with a cool-down between runs.

use std::thread;
use std::time::Duration;

use aead_core::keys::{self, SessionKeys};
use aead_core::{AeadBackend, Algorithm, BackendKind};
use backends::backend_for;
use tracing::{info, warn};

use crate::config::BenchmarkConfig;
use crate::history::History;
use crate::runner::{CancelToken, Runner};

#[derive(Debug, Clone)]
pub struct SuitePlan {
    pub sizes: Vec<usize>,
    pub iterations: u32,
    /// Pause between runs, letting transient system load and allocator
    /// effects settle so one cell does not bleed into the next.
    pub cooldown: Duration,
}

impl Default for SuitePlan {
    fn default() -> Self {
        Self {
            sizes: vec![1024, 16 * 1024, 256 * 1024, 1024 * 1024, 4 * 1024 * 1024],
            iterations: 50,
            cooldown: Duration::from_secs(1),
        }
    }
}

/// Drives the whole matrix. Runs never overlap, so memory and CPU
/// readings stay attributable to a single configuration. Returns the
/// number of results recorded; cancellation between or during runs stops
/// the sweep but keeps everything already recorded.
pub fn run_suite(
    plan: &SuitePlan,
    keys: &SessionKeys,
    history: &History,
    cancel: &CancelToken,
) -> usize {
    let backends: Vec<Box<dyn AeadBackend>> =
        BackendKind::ALL.into_iter().map(backend_for).collect();
    let mut completed = 0usize;

    for &size in &plan.sizes {
        // One plaintext per size, shared read-only by every cell at that
        // size, so the data-size variable is controlled across backends
        // and algorithms.
        let plaintext = keys::random_plaintext(size);
        for backend in &backends {
            for algorithm in Algorithm::ALL {
                if cancel.is_cancelled() {
                    info!(completed, "suite cancelled");
                    return completed;
                }
                let config = BenchmarkConfig {
                    backend: backend.kind(),
                    algorithm,
                    data_size: size,
                    iterations: plan.iterations,
                };
                info!(
                    backend = %config.backend,
                    algorithm = %config.algorithm,
                    data_size = size,
                    "suite cell starting"
                );
                let runner = Runner::with_cancel(backend.as_ref(), keys, cancel.clone());
                match runner.run_with_plaintext(&config, Some(&plaintext)) {
                    Some(result) => {
                        if !result.success {
                            warn!(error = ?result.error, "suite cell failed; moving on");
                        }
                        history.push(result);
                        completed += 1;
                    }
                    None => {
                        info!(completed, "suite cancelled mid-run");
                        return completed;
                    }
                }
                if cancel.is_cancelled() {
                    info!(completed, "suite cancelled");
                    return completed;
                }
                thread::sleep(plan.cooldown);
            }
        }
    }
    info!(completed, "suite finished");
    completed
}
