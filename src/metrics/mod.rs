pub mod collector;
pub mod parser;

pub use collector::BenchmarkStore;
pub use parser::{parse_speed, SpeedReading};

/// One benchmark observation pulled out of the hashcat output.
/// The sampler creates these and pushes them into the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Raw digits of the `H/s` figure; any k/M/G/T prefix is dropped
    pub hash_rate: f64,
    /// Per-iteration latency reported in parentheses, in milliseconds
    pub latency_ms: f64,
}

impl Sample {
    pub fn new(hash_rate: f64, latency_ms: f64) -> Self {
        Self {
            hash_rate,
            latency_ms,
        }
    }
}
