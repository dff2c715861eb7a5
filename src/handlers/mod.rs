pub mod files;
pub mod gpu;
pub mod result;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::gpu::GpuProbe;
use crate::AppState;

// ─── Unified error type ──────────────────────────────────────────

/// Failures caught at the handler boundary.
///
/// Only the plain-text file routes turn into an error status; everything
/// else stays a 200 with a JSON body describing what went wrong.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read {0}")]
    FileRead(String),
    /// Body carries only the generic message; the detail goes to the log.
    #[error("{0}")]
    Internal(String),
    /// Body carries the generic message plus the detail as `error`.
    #[error("{0}")]
    Reported(String),
}

impl AppError {
    /// Surface the detail in the response body as well as the log.
    pub fn reported(self) -> Self {
        match self {
            Self::Internal(msg) => Self::Reported(msg),
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        match self {
            Self::FileRead(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while reading the log file.",
            )
                .into_response(),
            Self::Internal(_) => {
                let body = serde_json::json!({ "message": "An error occurred" });
                (StatusCode::OK, Json(body)).into_response()
            }
            Self::Reported(msg) => {
                let body = serde_json::json!({
                    "message": "An error occurred",
                    "error":   msg,
                });
                (StatusCode::OK, Json(body)).into_response()
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Run a GPU query on the blocking pool; `nvidia-smi` can stall.
/// A panic inside the query comes back as `AppError::Internal`.
pub(crate) async fn on_probe<T, F>(state: &AppState, query: F) -> Result<T, AppError>
where
    F: FnOnce(&dyn GpuProbe) -> T + Send + 'static,
    T: Send + 'static,
{
    let gpu = state.gpu.clone();
    tokio::task::spawn_blocking(move || query(gpu.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("GPU query aborted: {e}")))
}
