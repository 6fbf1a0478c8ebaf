// Reconciler metrics
//
// Lightweight counters for how often the reconciler ticked, what it wrote and how often it failed

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Reconciler counters
///
/// Uses atomic operations so the tick task and the lifecycle calls can record
/// without locks. Summarized in the log when the reconciler stops.
#[derive(Debug)]
pub struct Metrics {
    /// Ticks that ran to completion (with or without a write)
    pub ticks: AtomicU64,

    /// Successful `dnd` writes
    pub dnd_writes: AtomicU64,

    /// Successful baseline restore writes, including the one issued by `stop()`
    pub restore_writes: AtomicU64,

    /// Ticks that decided a status but skipped the write (transition policy)
    pub unchanged_ticks: AtomicU64,

    /// Ticks that found the reconciler no longer running and bailed out
    pub aborted_ticks: AtomicU64,

    /// Presence source failures
    pub presence_failures: AtomicU64,

    /// Status sink write failures
    pub write_failures: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            dnd_writes: AtomicU64::new(0),
            restore_writes: AtomicU64::new(0),
            unchanged_ticks: AtomicU64::new(0),
            aborted_ticks: AtomicU64::new(0),
            presence_failures: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dnd_write(&self) {
        self.dnd_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_restore_write(&self) {
        self.restore_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unchanged_tick(&self) {
        self.unchanged_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_aborted_tick(&self) {
        self.aborted_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_presence_failure(&self) {
        self.presence_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Total failures of either kind
    pub fn failures(&self) -> u64 {
        self.presence_failures.load(Ordering::Relaxed) + self.write_failures.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!(
            "Reconciler metrics: {} ticks ({} unchanged, {} aborted), {} dnd writes, {} restore writes, {} presence failures, {} write failures, uptime {:.0}s",
            self.ticks.load(Ordering::Relaxed),
            self.unchanged_ticks.load(Ordering::Relaxed),
            self.aborted_ticks.load(Ordering::Relaxed),
            self.dnd_writes.load(Ordering::Relaxed),
            self.restore_writes.load(Ordering::Relaxed),
            self.presence_failures.load(Ordering::Relaxed),
            self.write_failures.load(Ordering::Relaxed),
            self.uptime().as_secs_f64()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
