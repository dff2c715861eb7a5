use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

use super::{on_probe, AppError};

const MIB_PER_GIB: f64 = 1024.0;

// ─── Response types ──────────────────────────────────────────────

/// `data` is serialized as `null` when there is nothing to report yet.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: &'static str,
    pub data: Option<BenchmarkInfo>,
}

#[derive(Debug, Serialize)]
pub struct BenchmarkInfo {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Average raw hash rate scaled to per-minute
    pub rpm: f64,
    pub elapsed_sec: f64,
    /// First GPU only
    pub total_gpu_memory_gib: f64,
}

// ─── GET / and GET /result ───────────────────────────────────────

pub async fn get_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InfoResponse>, AppError> {
    let Some(average) = state.store.snapshot_average() else {
        tracing::error!("Benchmark data is None");
        return Ok(Json(InfoResponse {
            message: "Benchmark data is None",
            data: None,
        }));
    };

    tracing::debug!(
        total_tests = average.total_tests,
        unknown_count = state.store.unknown_count(),
        average_time_ms = average.average_time_ms,
        "Composing benchmark summary"
    );

    let elapsed_sec = state.started_at.elapsed().as_secs_f64();

    let memory = on_probe(&state, |gpu| gpu.gpu_memory())
        .await
        .map_err(AppError::reported)?;
    let first_gpu = memory
        .and_then(|gpus| gpus.into_iter().next())
        .ok_or_else(|| AppError::Reported("no GPU memory info available".into()))?;

    Ok(Json(InfoResponse {
        message: "Got info",
        data: Some(BenchmarkInfo {
            kind: "hash",
            rpm: average.average_hash_rate * 60.0,
            elapsed_sec,
            total_gpu_memory_gib: first_gpu.total_mb as f64 / MIB_PER_GIB,
        }),
    }))
}
