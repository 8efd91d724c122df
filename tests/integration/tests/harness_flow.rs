//! End-to-end harness checks against the real backends: runner, suite,
//! history, and CSV export working together.

use std::time::Duration;

use aead_core::keys::SessionKeys;
use aead_core::{Algorithm, BackendKind};
use backends::backend_for;
use harness::export::{self, CSV_HEADER};
use harness::{suite, BenchmarkConfig, CancelToken, History, Runner, SuitePlan};

#[test]
fn direct_aes_gcm_1024_by_10_succeeds_with_positive_means() {
    let keys = SessionKeys::generate();
    let backend = backend_for(BackendKind::DirectNative);
    let config = BenchmarkConfig {
        backend: BackendKind::DirectNative,
        algorithm: Algorithm::Aes256Gcm,
        data_size: 1024,
        iterations: 10,
    };
    let result = Runner::new(backend.as_ref(), &keys).run(&config).unwrap();
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.data_size, 1024);
    assert_eq!(result.iterations, 10);
    assert!(result.encrypt_mean_us > 0.0);
    assert!(result.decrypt_mean_us > 0.0);
    assert!(result.encrypt_stdev_us >= 0.0);
    assert!(result.decrypt_stdev_us >= 0.0);
    assert!(result.encrypt_total_us >= result.encrypt_mean_us);
    assert!(result.error.is_none());
}

#[test]
fn zero_data_size_fails_validation_before_any_crypto() {
    let keys = SessionKeys::generate();
    let backend = backend_for(BackendKind::Library);
    let config = BenchmarkConfig {
        backend: BackendKind::Library,
        algorithm: Algorithm::ChaCha20Poly1305,
        data_size: 0,
        iterations: 10,
    };
    let result = Runner::new(backend.as_ref(), &keys).run(&config).unwrap();
    assert!(!result.success);
    assert!(result.error.unwrap().contains("invalid configuration"));
    assert_eq!(result.cpu_time_ms, -1);
}

#[test]
fn single_iteration_single_byte_still_produces_a_full_record() {
    let keys = SessionKeys::generate();
    let backend = backend_for(BackendKind::BridgedNative);
    let config = BenchmarkConfig {
        backend: BackendKind::BridgedNative,
        algorithm: Algorithm::Aes256Gcm,
        data_size: 1,
        iterations: 1,
    };
    let result = Runner::new(backend.as_ref(), &keys).run(&config).unwrap();
    assert!(result.success, "{:?}", result.error);
    // A single sample has no spread.
    assert_eq!(result.encrypt_stdev_us, 0.0);
    assert_eq!(result.decrypt_stdev_us, 0.0);
}

#[test]
fn quick_suite_fills_history_and_exports_in_run_order() {
    let keys = SessionKeys::generate();
    let history = History::new();
    let plan = SuitePlan { sizes: vec![64], iterations: 2, cooldown: Duration::ZERO };
    let completed = suite::run_suite(&plan, &keys, &history, &CancelToken::new());
    assert_eq!(completed, 6);

    let snapshot = history.snapshot();
    assert_eq!(snapshot.len(), 6);
    assert!(snapshot.iter().all(|r| r.success));

    let csv = export::to_csv(&snapshot);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], CSV_HEADER);
    // Export is oldest-first: the sweep starts with the library backend on
    // AES, ends with direct on ChaCha.
    assert!(lines[1].starts_with("library;aes-256-gcm;64;2;"), "{}", lines[1]);
    assert!(
        lines[6].starts_with("direct-native;chacha20-poly1305;64;2;"),
        "{}",
        lines[6]
    );
}

#[test]
fn failed_runs_stay_in_history_with_their_error_text() {
    let keys = SessionKeys::generate();
    let history = History::new();
    let backend = backend_for(BackendKind::DirectNative);
    let bad = BenchmarkConfig {
        backend: BackendKind::DirectNative,
        algorithm: Algorithm::Aes256Gcm,
        data_size: 1024,
        iterations: 0,
    };
    let good = BenchmarkConfig { iterations: 2, ..bad };

    let runner = Runner::new(backend.as_ref(), &keys);
    history.push(runner.run(&bad).unwrap());
    history.push(runner.run(&good).unwrap());

    let snapshot = history.snapshot();
    assert_eq!(snapshot.len(), 2);
    // Newest first: the good run sits at the front.
    assert!(snapshot[0].success);
    assert!(!snapshot[1].success);
    assert!(snapshot[1].error.as_deref().unwrap().contains("invalid configuration"));

    // The failed row still exports, zeroed, with CPU marked unavailable.
    let csv = export::to_csv(&snapshot);
    let oldest_row = csv.lines().nth(1).unwrap();
    assert!(oldest_row.contains(";N/A;"), "{oldest_row}");
}
