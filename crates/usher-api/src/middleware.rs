// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Request-timing middleware.
//!
//! Timing travels with the request through this layer's locals rather than
//! any shared state; every response, success or failure, leaves with an
//! `elapsed` header carrying the processing time in seconds.

use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use tracing::debug;

/// Name of the response header carrying the request-processing time.
pub const ELAPSED_HEADER: &str = "elapsed";

/// Times the request, stamps the `elapsed` header and records request
/// metrics.
pub async fn timing_layer(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    let elapsed = started.elapsed();
    let status = response.status().as_u16();

    if let Ok(value) = HeaderValue::from_str(&format!("{:.6}", elapsed.as_secs_f64())) {
        response.headers_mut().insert(HeaderName::from_static(ELAPSED_HEADER), value);
    }

    counter!(
        "usher_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("usher_http_request_duration_seconds").record(elapsed.as_secs_f64());

    debug!(
        method = %method,
        path = %path,
        status = status,
        elapsed_us = elapsed.as_micros() as u64,
        "Handled request"
    );

    response
}
