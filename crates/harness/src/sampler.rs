//! Timing, resident-memory, and CPU-time sampling.

use std::thread;
use std::time::{Duration, Instant};

use sysinfo::{Pid, System};

/// Settling delay before the first and after the last memory reading, to
/// let allocator churn from setup/teardown drain out of the RSS signal.
const SETTLE: Duration = Duration::from_millis(30);

/// Wraps a single call with a monotonic timer. The bracket sits
/// immediately around the invocation, so worker hand-off and marshalling
/// cost land inside the measured duration; that cost is part of what the
/// benchmark compares.
pub fn time_call<R>(f: impl FnOnce() -> R) -> (R, f64) {
    let start = Instant::now();
    let out = f();
    let elapsed_us = start.elapsed().as_secs_f64() * 1e6;
    (out, elapsed_us)
}

/// Summary of the resident-set-size checkpoints taken around a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryStats {
    pub initial_bytes: u64,
    pub peak_bytes: u64,
    pub final_bytes: u64,
    /// Mean of the per-iteration samples (checkpoints excluded).
    pub average_bytes: f64,
}

/// Samples the current process RSS: once before the run, once per
/// iteration, once after, with a running peak across all readings.
pub struct MemorySampler {
    sys: System,
    pid: Option<Pid>,
    initial: u64,
    peak: u64,
    sum: f64,
    count: u64,
}

impl MemorySampler {
    pub fn start() -> Self {
        let mut sampler = Self {
            sys: System::new(),
            pid: sysinfo::get_current_pid().ok(),
            initial: 0,
            peak: 0,
            sum: 0.0,
            count: 0,
        };
        thread::sleep(SETTLE);
        sampler.initial = sampler.read();
        sampler.peak = sampler.initial;
        sampler
    }

    fn read(&mut self) -> u64 {
        let Some(pid) = self.pid else { return 0 };
        self.sys.refresh_process(pid);
        self.sys.process(pid).map(|p| p.memory()).unwrap_or(0)
    }

    /// Per-iteration checkpoint.
    pub fn sample(&mut self) {
        let rss = self.read();
        self.peak = self.peak.max(rss);
        self.sum += rss as f64;
        self.count += 1;
    }

    pub fn finish(mut self) -> MemoryStats {
        thread::sleep(SETTLE);
        let final_bytes = self.read();
        let peak_bytes = self.peak.max(final_bytes);
        let average_bytes = if self.count == 0 { 0.0 } else { self.sum / self.count as f64 };
        MemoryStats {
            initial_bytes: self.initial,
            peak_bytes,
            final_bytes,
            average_bytes,
        }
    }
}

/// Accumulated process CPU time (user + system). Platforms without
/// `getrusage` report the `-1` sentinel.
pub struct CpuTimer {
    start_ms: Option<i64>,
}

impl CpuTimer {
    pub fn start() -> Self {
        Self { start_ms: process_cpu_ms() }
    }

    /// CPU milliseconds consumed since `start`, or `-1` when unavailable.
    pub fn elapsed_ms(&self) -> i64 {
        match (self.start_ms, process_cpu_ms()) {
            (Some(start), Some(now)) => (now - start).max(0),
            _ => -1,
        }
    }
}

#[cfg(unix)]
fn process_cpu_ms() -> Option<i64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    let usage = unsafe { usage.assume_init() };
    let secs = usage.ru_utime.tv_sec + usage.ru_stime.tv_sec;
    let usecs = usage.ru_utime.tv_usec + usage.ru_stime.tv_usec;
    Some(secs as i64 * 1000 + usecs as i64 / 1000)
}

#[cfg(not(unix))]
fn process_cpu_ms() -> Option<i64> {
    None
}
