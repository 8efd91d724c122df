//! Result rendering: a human-readable block per run and the
//! semicolon-delimited CSV export.
//!
//! CSV semantics match the downstream analysis scripts: `WallTime_*_ms`
//! columns are the summed series over all iterations (per-operation means
//! are recovered as sum/Iterations), RAM columns are megabytes, CPU time
//! is integer milliseconds or `N/A`. Rows are written oldest to newest,
//! regardless of the newest-first in-memory order.

use std::fmt::Write as _;

use crate::result::BenchmarkResult;

pub const CSV_HEADER: &str = "Implementation;Algorithm;DataSize_B;Iterations;\
WallTime_Encrypt_ms;Stdev_Encrypt_ms;WallTime_Decrypt_ms;Stdev_Decrypt_ms;\
WallTime_Sum_ms;CPUTime_ms;RAM_Avg_MB;RAM_Peak_MB";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn ms(us: f64) -> f64 {
    us / 1000.0
}

fn mb(bytes: f64) -> f64 {
    bytes / BYTES_PER_MB
}

fn csv_row(r: &BenchmarkResult) -> String {
    let cpu = if r.cpu_time_ms < 0 { "N/A".to_string() } else { r.cpu_time_ms.to_string() };
    format!(
        "{};{};{};{};{:.3};{:.3};{:.3};{:.3};{:.3};{};{:.3};{:.3}",
        r.backend,
        r.algorithm,
        r.data_size,
        r.iterations,
        ms(r.encrypt_total_us),
        ms(r.encrypt_stdev_us),
        ms(r.decrypt_total_us),
        ms(r.decrypt_stdev_us),
        ms(r.wall_total_us()),
        cpu,
        mb(r.mem_avg_bytes),
        mb(r.mem_peak_bytes as f64),
    )
}

/// Render a newest-first snapshot as CSV, oldest row first.
pub fn to_csv(results: &[BenchmarkResult]) -> String {
    let mut out = String::with_capacity(128 + results.len() * 96);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for r in results.iter().rev() {
        out.push_str(&csv_row(r));
        out.push('\n');
    }
    out
}

/// Human-readable block for one result. Failed runs keep their error text
/// verbatim and are visually distinct from successful ones.
pub fn render_block(r: &BenchmarkResult) -> String {
    let mut out = String::new();
    if r.success {
        let _ = writeln!(
            out,
            "[ OK ] {} / {} / {} B x {}",
            r.backend, r.algorithm, r.data_size, r.iterations
        );
        let _ = writeln!(
            out,
            "       encrypt  mean {:>10.3} us   stdev {:>10.3} us   total {:>12.3} ms",
            r.encrypt_mean_us,
            r.encrypt_stdev_us,
            ms(r.encrypt_total_us)
        );
        let _ = writeln!(
            out,
            "       decrypt  mean {:>10.3} us   stdev {:>10.3} us   total {:>12.3} ms",
            r.decrypt_mean_us,
            r.decrypt_stdev_us,
            ms(r.decrypt_total_us)
        );
        let _ = writeln!(
            out,
            "       memory   avg {:>8.3} MB   peak {:>8.3} MB",
            mb(r.mem_avg_bytes),
            mb(r.mem_peak_bytes as f64)
        );
        if r.cpu_time_ms >= 0 {
            let _ = writeln!(out, "       cpu      {} ms", r.cpu_time_ms);
        } else {
            let _ = writeln!(out, "       cpu      N/A");
        }
    } else {
        let _ = writeln!(
            out,
            "[FAIL] {} / {} / {} B x {}",
            r.backend, r.algorithm, r.data_size, r.iterations
        );
        let _ = writeln!(out, "       {}", r.error.as_deref().unwrap_or("unknown error"));
    }
    out
}
