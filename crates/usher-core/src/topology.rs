// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! The region topology snapshot.
//!
//! The topology maps region names to the storage nodes inside them. It is
//! re-read from its YAML file on every director request and treated as an
//! immutable snapshot for the lifetime of that request; topology edits take
//! effect on the next request with no coordination protocol.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mapping from region name to the `host:port` addresses of its nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topology {
    regions: BTreeMap<String, Vec<String>>,
}

impl Topology {
    /// Creates an empty topology.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a topology snapshot from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Topology`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Topology(format!("{}: {e}", path.display())))?;
        Self::parse(&content)
    }

    /// Parses a topology snapshot from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Topology`] if the string is not a valid
    /// region-to-nodes mapping.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Topology(e.to_string()))
    }

    /// Adds a region with its nodes, replacing any previous entry.
    pub fn add_region(&mut self, name: impl Into<String>, nodes: Vec<String>) {
        self.regions.insert(name.into(), nodes);
    }

    /// Region names in sorted order.
    #[must_use]
    pub fn region_names(&self) -> Vec<String> {
        self.regions.keys().cloned().collect()
    }

    /// The nodes of a region, if the region exists.
    #[must_use]
    pub fn nodes(&self, region: &str) -> Option<&[String]> {
        self.regions.get(region).map(Vec::as_slice)
    }

    /// Number of configured regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Whether no regions are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
