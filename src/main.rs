use std::sync::Arc;
use std::time::Instant;

mod config;
mod gpu;
mod handlers;
mod logging;
mod metrics;
mod middleware;
mod sampler;
mod server;

use config::Config;
use gpu::{GpuProbe, NvidiaSmi};
use metrics::BenchmarkStore;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Benchmark aggregate. The sampler writes, handlers read.
    pub store: Arc<BenchmarkStore>,

    /// GPU inventory, queried on every request that needs it.
    pub gpu: Arc<dyn GpuProbe>,

    pub config: Config,

    /// Anchor for `elapsed_sec` in the benchmark summary.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, gpu: Arc<dyn GpuProbe>) -> Self {
        Self {
            store: Arc::new(BenchmarkStore::new()),
            gpu,
            config,
            started_at: Instant::now(),
        }
    }
}

#[tokio::main]
async fn main() {
    // ── 1. Configuration & logging ───────────────────────────────
    let config = Config::from_env();

    let _log_guard = logging::init(&config.log_file).unwrap_or_else(|e| {
        eprintln!("❌ Cannot open log file {}: {e}", config.log_file.display());
        std::process::exit(1);
    });

    // ── 2. Build shared state ────────────────────────────────────
    let gpu = Arc::new(NvidiaSmi::with_program(config.nvidia_smi.clone()));
    let state = Arc::new(AppState::new(config.clone(), gpu));

    // ── 3. Start the benchmark sampler ───────────────────────────
    // Runs for the life of the process; it may take its first sample
    // before or after the listener is up.
    tokio::spawn(sampler::run(
        state.store.clone(),
        config.hashcat_out.clone(),
        config.sample_interval,
    ));

    // ── 4. Build Axum router ─────────────────────────────────────
    let app = server::create_router(state);

    // ── 5. Bind & serve ──────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(addr = %config.bind_addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    tracing::info!(addr = %config.bind_addr, "Server listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server exited with error");
    }
}
