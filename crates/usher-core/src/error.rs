// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for usher.

use thiserror::Error;

/// A specialized `Result` type for usher operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or serving placement decisions.
///
/// Only configuration-class failures cross the request boundary as hard
/// errors; per-node probe failures are captured as status data and never
/// appear here.
#[derive(Debug, Error)]
pub enum Error {
    /// The topology snapshot could not be read or parsed. Fatal to the
    /// request that triggered the load.
    #[error("topology unavailable: {0}")]
    Topology(String),

    /// A ring lookup was issued against a ring with no points. Upstream
    /// emptiness checks make this unreachable in normal operation.
    #[error("hash ring is empty")]
    EmptyRing,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the HTTP status code this error maps to at the API boundary.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Topology(_) | Self::EmptyRing | Self::Config(_) | Self::Io(_) => 500,
        }
    }
}
