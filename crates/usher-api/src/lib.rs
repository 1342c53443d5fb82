// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! HTTP surfaces for usher.
//!
//! Two routers live here:
//! - the **director** surface: `GET`/`PUT /{account}/{bucket}/{object}`
//!   with the `debug`, `nodes` and `info` diagnostic flags, answering every
//!   request with a redirect to a storage node or a plain-text body;
//! - the **storage node** surface: the same object routes backed by a
//!   [`usher_storage::BlobStore`], plus `/ping` for liveness probes.
//!
//! Both carry the timing middleware that stamps an `elapsed` header on
//! every response.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use error::ApiError;
pub use router::{create_director_router, create_node_router, DirectorState, NodeState};
