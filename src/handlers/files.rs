use axum::extract::State;
use std::path::Path;
use std::sync::Arc;

use crate::AppState;

use super::AppError;

// ─── GET /hashcat_out ────────────────────────────────────────────

pub async fn hashcat_out(State(state): State<Arc<AppState>>) -> Result<String, AppError> {
    read_text(&state.config.hashcat_out).await
}

// ─── GET /logs ───────────────────────────────────────────────────

pub async fn logs(State(state): State<Arc<AppState>>) -> Result<String, AppError> {
    read_text(&state.config.log_file).await
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Whole-file read, re-opened on every request. `String` responds as
/// `text/plain; charset=utf-8`.
async fn read_text(path: &Path) -> Result<String, AppError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::FileRead(format!("{}: {e}", path.display())))
}
