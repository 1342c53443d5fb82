// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Request handlers for the director and storage-node surfaces.

pub mod node;
pub mod object;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A plain-text response, the director's only body format.
pub(crate) fn plain(status: StatusCode, body: String) -> Response {
    (status, [("content-type", "text/plain; charset=utf-8")], body).into_response()
}

/// A redirect response with an explicit status code.
///
/// The director uses 307 for writes (the client must repeat the PUT with
/// its body) and 302 for reads.
pub(crate) fn redirect(status: StatusCode, url: &str) -> Response {
    (status, [("location", url)], String::new()).into_response()
}
