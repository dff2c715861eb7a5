use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::gpu::GpuMemory;
use crate::AppState;

use super::{on_probe, AppError};

// ─── Response types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GpuCountResponse {
    pub message: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct GpuMemoryResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_mem_info: Option<Vec<GpuMemory>>,
}

// ─── GET /check_gpu ──────────────────────────────────────────────

pub async fn check_gpu(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GpuCountResponse>, AppError> {
    let count = on_probe(&state, |gpu| gpu.gpu_count()).await?;

    Ok(Json(GpuCountResponse {
        message: "Got GPU count",
        count,
    }))
}

// ─── GET /check_gpu_memory ───────────────────────────────────────

pub async fn check_gpu_memory(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GpuMemoryResponse>, AppError> {
    let memory = on_probe(&state, |gpu| gpu.gpu_memory()).await?;

    let response = match memory {
        Some(gpus) if !gpus.is_empty() => GpuMemoryResponse {
            message: "Got GPU memory info",
            gpu_mem_info: Some(gpus),
        },
        _ => GpuMemoryResponse {
            message: "Could not get GPU memory info",
            gpu_mem_info: None,
        },
    };

    Ok(Json(response))
}
