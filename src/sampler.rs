use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::metrics::{parse_speed, BenchmarkStore, SpeedReading};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ─── Public entry point ──────────────────────────────────────────

/// Samples the hashcat output file forever.
///
/// The pause comes after each iteration's work, so the period drifts by
/// however long the read takes. A failed iteration is logged and skipped;
/// nothing stops the loop.
pub async fn run(store: Arc<BenchmarkStore>, hashcat_out: PathBuf, interval: Duration) {
    tracing::info!(
        path = %hashcat_out.display(),
        interval_secs = interval.as_secs_f64(),
        "Starting the hashcat benchmark sampler"
    );

    loop {
        if let Err(e) = sample_once(&store, &hashcat_out).await {
            tracing::error!(error = %e, "Benchmark sample failed");
        }

        tokio::time::sleep(interval).await;
    }
}

// ─── Single iteration ────────────────────────────────────────────

/// Read the output file once and fold the result into `store`.
///
/// A read failure records nothing. An unparseable dump counts as unknown.
pub async fn sample_once(
    store: &BenchmarkStore,
    hashcat_out: &Path,
) -> Result<SpeedReading, SampleError> {
    let output = tokio::fs::read_to_string(hashcat_out)
        .await
        .map_err(|source| SampleError::Read {
            path: hashcat_out.to_path_buf(),
            source,
        })?;

    let reading = parse_speed(&output);
    match reading {
        SpeedReading::Matched(sample) => {
            tracing::debug!(
                hash_rate = sample.hash_rate,
                latency_ms = sample.latency_ms,
                "Recorded benchmark sample"
            );
            store.record(sample);
        }
        SpeedReading::Unmatched => {
            tracing::debug!("No speed line in hashcat output, counting as unknown");
            store.record_unknown();
        }
    }

    Ok(reading)
}
