// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Storage backend for usher storage nodes.
//!
//! A deliberately small collaborator to the director: a file-backed blob
//! store that keeps one file per object and verifies content with SHA-256
//! checksums. Objects are namespaced by the host name the node was
//! addressed as, so one store directory can back several logical nodes
//! (which is also what makes single-machine test clusters possible).

pub mod store;

pub use store::{content_checksum, BlobInfo, BlobStore};
