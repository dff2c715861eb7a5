use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::middleware::access_log;
use crate::AppState;

/// Builds the full Axum `Router` with all routes and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── GPU inventory ───────────────────────────────────────
        .route("/check_gpu", get(handlers::gpu::check_gpu))
        .route("/check_gpu_memory", get(handlers::gpu::check_gpu_memory))
        // ── Benchmark summary ───────────────────────────────────
        .route("/", get(handlers::result::get_info))
        .route("/result", get(handlers::result::get_info))
        // ── Raw files ───────────────────────────────────────────
        .route("/hashcat_out", get(handlers::files::hashcat_out))
        .route("/logs", get(handlers::files::logs))
        // ── Provide shared state to all routes above ────────────
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn(access_log::access_log))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::gpu::{GpuMemory, GpuProbe, StaticProbe};
    use crate::metrics::Sample;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct PanickingProbe;

    impl GpuProbe for PanickingProbe {
        fn gpu_count(&self) -> usize {
            panic!("driver wedged")
        }

        fn gpu_memory(&self) -> Option<Vec<GpuMemory>> {
            panic!("driver wedged")
        }
    }

    fn one_gpu() -> StaticProbe {
        StaticProbe {
            count: 1,
            memory: Some(vec![GpuMemory {
                total_mb: 24576,
                free_mb: 20000,
            }]),
        }
    }

    fn no_gpu() -> StaticProbe {
        StaticProbe {
            count: 0,
            memory: None,
        }
    }

    /// State whose files live in a fresh temp dir (created empty of files).
    fn test_state(probe: impl GpuProbe + 'static) -> (Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            log_file: dir.path().join("app.log"),
            hashcat_out: dir.path().join("hashcat.out"),
            ..Config::default()
        };
        (Arc::new(AppState::new(config, Arc::new(probe))), dir)
    }

    async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = create_router(state.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_json(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = get(state, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn root_without_samples_reports_no_data() {
        let (state, _dir) = test_state(one_gpu());

        for uri in ["/", "/result"] {
            let (status, json) = get_json(&state, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json, json!({"message": "Benchmark data is None", "data": null}));
        }
    }

    #[tokio::test]
    async fn result_composes_rpm_and_memory() {
        let (state, _dir) = test_state(one_gpu());
        state.store.record(Sample::new(100.0, 5.0));
        state.store.record(Sample::new(200.0, 7.0));
        state.store.record_unknown();

        let (status, json) = get_json(&state, "/result").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Got info");
        assert_eq!(json["data"]["type"], "hash");
        assert_eq!(json["data"]["rpm"], 9000.0);
        assert_eq!(json["data"]["total_gpu_memory_gib"], 24.0);
        assert!(json["data"]["elapsed_sec"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn result_without_gpu_memory_is_a_json_error() {
        let (state, _dir) = test_state(no_gpu());
        state.store.record(Sample::new(1.0, 1.0));

        let (status, json) = get_json(&state, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "An error occurred");
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn check_gpu_reports_count() {
        let (state, _dir) = test_state(one_gpu());
        let (status, json) = get_json(&state, "/check_gpu").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"message": "Got GPU count", "count": 1}));

        let (state, _dir) = test_state(no_gpu());
        let (_, json) = get_json(&state, "/check_gpu").await;
        assert_eq!(json["count"], 0);
    }

    #[tokio::test]
    async fn check_gpu_memory_lists_each_gpu() {
        let (state, _dir) = test_state(one_gpu());
        let (status, json) = get_json(&state, "/check_gpu_memory").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "message": "Got GPU memory info",
                "gpu_mem_info": [{"total_memory_MB": 24576, "free_memory_MB": 20000}],
            })
        );
    }

    #[tokio::test]
    async fn check_gpu_memory_without_data() {
        let (state, _dir) = test_state(no_gpu());
        let (status, json) = get_json(&state, "/check_gpu_memory").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"message": "Could not get GPU memory info"}));
    }

    #[tokio::test]
    async fn gpu_query_panic_is_caught_at_the_handler() {
        let (state, _dir) = test_state(PanickingProbe);

        for uri in ["/check_gpu", "/check_gpu_memory"] {
            let (status, json) = get_json(&state, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json, json!({"message": "An error occurred"}));
        }
    }

    #[tokio::test]
    async fn result_error_carries_detail() {
        let (state, _dir) = test_state(PanickingProbe);
        state.store.record(Sample::new(1.0, 1.0));

        let (status, json) = get_json(&state, "/result").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "An error occurred");
        assert!(json["error"].as_str().unwrap().contains("GPU query aborted"));
    }

    #[tokio::test]
    async fn hashcat_out_is_served_as_text() {
        let (state, dir) = test_state(one_gpu());
        let contents = "Speed.#1.........: 123.45 kH/s (6.78ms)\n";
        std::fs::write(dir.path().join("hashcat.out"), contents).unwrap();

        let (status, headers, body) = get(&state, "/hashcat_out").await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body, contents.as_bytes());
    }

    #[tokio::test]
    async fn missing_files_are_server_errors() {
        let (state, _dir) = test_state(one_gpu());

        for uri in ["/hashcat_out", "/logs"] {
            let (status, headers, body) = get(&state, uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/plain"));
            assert_eq!(body, b"An error occurred while reading the log file.");
        }
    }

    #[tokio::test]
    async fn logs_are_served_as_text() {
        let (state, dir) = test_state(one_gpu());
        std::fs::write(dir.path().join("app.log"), "INFO gpu_hash: started\n").unwrap();

        let (status, _, body) = get(&state, "/logs").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"INFO gpu_hash: started\n");
    }

    #[tokio::test]
    async fn every_route_passes_through_the_access_log() {
        let (state, dir) = test_state(one_gpu());
        std::fs::write(dir.path().join("app.log"), "").unwrap();

        for uri in ["/check_gpu", "/logs", "/hashcat_out"] {
            let (_, headers, _) = get(&state, uri).await;
            assert!(headers.contains_key("x-response-time-us"), "{uri}");
            assert!(headers.contains_key("server-timing"), "{uri}");
        }
    }
}
