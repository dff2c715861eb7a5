use parking_lot::Mutex;
use serde::Serialize;

use super::Sample;

// ─── Public types ────────────────────────────────────────────────

/// Thread-safe benchmark aggregate.
/// The sampler calls `record()` / `record_unknown()`, handlers call
/// `snapshot_average()` and `unknown_count()`.
pub struct BenchmarkStore {
    inner: Mutex<Inner>,
}

/// Point-in-time averages over every sample recorded so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkAverage {
    pub average_hash_rate: f64,
    pub average_time_ms: f64,
    pub total_tests: usize,
}

// ─── Internal state ──────────────────────────────────────────────

/// `hash_rates` and `times_ms` are parallel and always the same length.
#[derive(Default)]
struct Inner {
    hash_rates: Vec<f64>,
    times_ms: Vec<f64>,
    unknown_count: u64,
}

// ─── BenchmarkStore impl ─────────────────────────────────────────

impl BenchmarkStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Append one parsed sample.
    pub fn record(&self, sample: Sample) {
        self.inner.lock().record(sample);
    }

    /// Count one sampling interval whose output could not be parsed.
    pub fn record_unknown(&self) {
        self.inner.lock().unknown_count += 1;
    }

    /// `None` until the first sample lands.
    pub fn snapshot_average(&self) -> Option<BenchmarkAverage> {
        self.inner.lock().average()
    }

    pub fn unknown_count(&self) -> u64 {
        self.inner.lock().unknown_count
    }
}

impl Default for BenchmarkStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Inner impl ──────────────────────────────────────────────────

impl Inner {
    fn record(&mut self, sample: Sample) {
        self.hash_rates.push(sample.hash_rate);
        self.times_ms.push(sample.latency_ms);
        debug_assert_eq!(self.hash_rates.len(), self.times_ms.len());
    }

    fn average(&self) -> Option<BenchmarkAverage> {
        let total = self.hash_rates.len();
        if total == 0 {
            return None;
        }

        let mean = |values: &[f64]| values.iter().sum::<f64>() / values.len() as f64;

        Some(BenchmarkAverage {
            average_hash_rate: mean(&self.hash_rates),
            average_time_ms: mean(&self.times_ms),
            total_tests: total,
        })
    }
}
