// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Storage-node routes: object upload/download, stat and liveness.
//!
//! Objects are namespaced by the `Host` header the node was addressed as,
//! matching the address the director handed out in its redirect.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;
use usher_core::ObjectKey;
use usher_storage::BlobInfo;

use super::plain;
use crate::error::ApiError;
use crate::router::NodeState;

/// Query flags on the node's object route.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NodeFlags {
    info: Option<String>,
}

/// `GET /ping` - liveness.
pub(crate) async fn ping() -> &'static str {
    "pong\n"
}

/// `PUT /{account}/{bucket}/{object}` - store the payload and answer with
/// its content checksum.
pub(crate) async fn put_object(
    State(state): State<NodeState>,
    Path((account, bucket, object)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let key = ObjectKey::new(&account, &bucket, &object);
    let host = host_of(&headers);

    let checksum = state.store.put(host, &key, &body).await?;
    Ok(plain(StatusCode::OK, format!("OK {checksum}\n")))
}

/// `GET /{account}/{bucket}/{object}[?info]` - object bytes, or metadata
/// when the `info` flag is present.
pub(crate) async fn get_object(
    State(state): State<NodeState>,
    Path((account, bucket, object)): Path<(String, String, String)>,
    Query(flags): Query<NodeFlags>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let key = ObjectKey::new(&account, &bucket, &object);
    let host = host_of(&headers);

    if flags.info.is_some() {
        return match state.store.stat(host, &key).await? {
            Some(info) => Ok(plain(StatusCode::OK, render_stat(host, &key, &info))),
            None => Ok(plain(StatusCode::NOT_FOUND, String::new())),
        };
    }

    match state.store.get(host, &key).await? {
        Some(data) => {
            debug!(host = %host, key = %key, size = data.len(), "Serving object");
            Ok((
                StatusCode::OK,
                [("content-type", "application/octet-stream")],
                data,
            )
                .into_response())
        }
        None => Ok(plain(StatusCode::NOT_FOUND, String::new())),
    }
}

fn host_of(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
}

fn render_stat(host: &str, key: &ObjectKey, info: &BlobInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!("host = {host}\n"));
    out.push_str(&format!("account = {}\n", key.account));
    out.push_str(&format!("bucket = {}\n", key.bucket));
    out.push_str(&format!("object = {}\n", key.object));
    out.push_str(&format!("path = {}\n", info.path.display()));
    out.push_str(&format!("mtime = {}\n", info.mtime));
    out.push_str(&format!("size = {}\n", info.size));
    out
}
