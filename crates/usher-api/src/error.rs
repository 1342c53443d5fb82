// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! API error type and plain-text response formatting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use usher_core::Error as CoreError;

/// An error that can be converted into a plain-text HTTP response.
///
/// The director never leaks internals in bodies: configuration-class
/// failures are logged with their detail and surface as a generic 500.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an API error with an explicit status and body.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// The status this error responds with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            [("content-type", "text/plain; charset=utf-8")],
            format!("{}\n", self.message),
        )
            .into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        error!(error = %err, "Request failed");
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, "internal server error")
    }
}
