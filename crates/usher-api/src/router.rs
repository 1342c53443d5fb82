// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Router construction for the director and storage-node surfaces.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;
use usher_core::DirectorConfig;
use usher_probe::ProbeClient;
use usher_storage::BlobStore;

use crate::handlers::{node, object};
use crate::middleware::timing_layer;

/// Shared state for director request handlers.
///
/// Everything here is read-only for the lifetime of the process; per-request
/// state (topology snapshot, flags, candidates) is built inside the handler
/// and dropped with it.
#[derive(Clone)]
pub struct DirectorState {
    /// Placement counts, salt, topology location and probe budget.
    pub director: Arc<DirectorConfig>,
    /// Probe client used on the GET path.
    pub probe: Arc<dyn ProbeClient>,
}

/// Shared state for storage-node request handlers.
#[derive(Clone)]
pub struct NodeState {
    /// The blob store backing this node.
    pub store: Arc<BlobStore>,
}

/// Builds the director router.
#[must_use]
pub fn create_director_router(state: DirectorState, log_requests: bool) -> Router {
    let mut router = Router::new()
        .route(
            "/{account}/{bucket}/{object}",
            get(object::get_object).put(object::put_object),
        )
        .with_state(state);

    if log_requests {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.layer(axum_middleware::from_fn(timing_layer))
}

/// Builds the storage-node router.
#[must_use]
pub fn create_node_router(
    store: Arc<BlobStore>,
    max_body_size: usize,
    log_requests: bool,
) -> Router {
    let mut router = Router::new()
        .route("/ping", get(node::ping))
        .route(
            "/{account}/{bucket}/{object}",
            get(node::get_object).put(node::put_object),
        )
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(NodeState { store });

    if log_requests {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.layer(axum_middleware::from_fn(timing_layer))
}
