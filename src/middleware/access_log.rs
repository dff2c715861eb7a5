//! Access log covering every route, `/logs` included, so `app.log` holds
//! the same request history the HTTP API is asked about.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};

const RESPONSE_TIME_US: HeaderName = HeaderName::from_static("x-response-time-us");
const SERVER_TIMING: HeaderName = HeaderName::from_static("server-timing");

pub async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let mut response = next.run(req).await;
    let elapsed = started.elapsed();

    stamp_elapsed(response.headers_mut(), elapsed);

    tracing::info!(
        %method,
        path = uri.path(),
        status = response.status().as_u16(),
        elapsed_us = elapsed.as_micros() as u64,
        "request"
    );

    response
}

/// Handler wall time as whole microseconds and as a `Server-Timing` entry in ms.
fn stamp_elapsed(headers: &mut HeaderMap, elapsed: Duration) {
    headers.insert(RESPONSE_TIME_US, HeaderValue::from(elapsed.as_micros() as u64));

    let timing = format!("app;dur={:.3}", elapsed.as_secs_f64() * 1000.0);
    if let Ok(value) = HeaderValue::from_str(&timing) {
        headers.insert(SERVER_TIMING, value);
    }
}
