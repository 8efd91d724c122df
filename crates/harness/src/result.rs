//! The immutable per-run result record.

use aead_core::{Algorithm, BackendKind};
use serde::Serialize;

use crate::config::BenchmarkConfig;
use crate::sampler::MemoryStats;

/// One finished benchmark run. Constructed exactly once, on the success or
/// the failure path, and never mutated afterwards.
///
/// Durations are microseconds; the encrypt and decrypt series stay
/// independent (separate means, stdevs, and sums), and combined figures
/// are derived at render time only.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub backend: BackendKind,
    pub algorithm: Algorithm,
    pub data_size: usize,
    pub iterations: u32,

    pub encrypt_mean_us: f64,
    pub encrypt_stdev_us: f64,
    pub encrypt_total_us: f64,
    pub decrypt_mean_us: f64,
    pub decrypt_stdev_us: f64,
    pub decrypt_total_us: f64,

    pub mem_initial_bytes: u64,
    pub mem_peak_bytes: u64,
    pub mem_final_bytes: u64,
    pub mem_avg_bytes: f64,

    /// Accumulated process CPU time over the run; `-1` when the platform
    /// cannot report it.
    pub cpu_time_ms: i64,

    pub success: bool,
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// Failure-path record: config echo plus the verbatim error text, all
    /// metrics zeroed and CPU sentineled.
    pub fn failure(config: &BenchmarkConfig, error: String) -> Self {
        Self {
            backend: config.backend,
            algorithm: config.algorithm,
            data_size: config.data_size,
            iterations: config.iterations,
            encrypt_mean_us: 0.0,
            encrypt_stdev_us: 0.0,
            encrypt_total_us: 0.0,
            decrypt_mean_us: 0.0,
            decrypt_stdev_us: 0.0,
            decrypt_total_us: 0.0,
            mem_initial_bytes: 0,
            mem_peak_bytes: 0,
            mem_final_bytes: 0,
            mem_avg_bytes: 0.0,
            cpu_time_ms: -1,
            success: false,
            error: Some(error),
        }
    }

    pub(crate) fn success(
        config: &BenchmarkConfig,
        encrypt_us: &[f64],
        decrypt_us: &[f64],
        memory: MemoryStats,
        cpu_time_ms: i64,
    ) -> Self {
        use crate::stats::{mean, population_stddev};
        Self {
            backend: config.backend,
            algorithm: config.algorithm,
            data_size: config.data_size,
            iterations: config.iterations,
            encrypt_mean_us: mean(encrypt_us),
            encrypt_stdev_us: population_stddev(encrypt_us),
            encrypt_total_us: encrypt_us.iter().sum(),
            decrypt_mean_us: mean(decrypt_us),
            decrypt_stdev_us: population_stddev(decrypt_us),
            decrypt_total_us: decrypt_us.iter().sum(),
            mem_initial_bytes: memory.initial_bytes,
            mem_peak_bytes: memory.peak_bytes,
            mem_final_bytes: memory.final_bytes,
            mem_avg_bytes: memory.average_bytes,
            cpu_time_ms,
            success: true,
            error: None,
        }
    }

    /// Sum of the two independent wall-time series.
    pub fn wall_total_us(&self) -> f64 {
        self.encrypt_total_us + self.decrypt_total_us
    }
}
