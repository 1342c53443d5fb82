// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Core types and utilities for the usher routing director.
//!
//! This crate provides the building blocks shared by the other usher
//! components:
//! - Configuration management (TOML server config, YAML topology snapshots)
//! - The shared error taxonomy
//! - Object identity: path-segment sanitization and the object key hash

pub mod config;
pub mod error;
pub mod topology;
pub mod types;

pub use config::{Config, DirectorConfig, LogFormat, StorageConfig};
pub use error::{Error, Result};
pub use topology::Topology;
pub use types::{KeyHash, ObjectKey};
