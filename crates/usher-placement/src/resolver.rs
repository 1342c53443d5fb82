// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Two-stage placement resolution: regions first, then nodes per region.
//!
//! Both stages use the same primitive, [`select_distinct`]: build an
//! ephemeral ring over the candidates, then repeatedly take the owner of
//! the object's key hash and remove it before asking again. Reusing one
//! key hash for every sub-selection makes the whole candidate list a
//! deterministic function of `(hash, topology, counts)`: no randomness
//! enters placement.

use usher_core::{KeyHash, Result, Topology};

use crate::ring::HashRing;

/// Selects up to `count` distinct members for a key hash, in preference
/// order.
///
/// Returns `min(count, |members|)` members; running out of members early
/// is not an error.
///
/// # Errors
///
/// Propagates [`usher_core::Error::EmptyRing`], which the emptiness checks
/// here make unreachable for well-formed input.
pub fn select_distinct(hash: &KeyHash, members: &[String], count: usize) -> Result<Vec<String>> {
    let mut ring = HashRing::new();
    for member in members {
        ring.add(member);
    }

    let mut selected = Vec::with_capacity(count.min(members.len()));
    for _ in 0..count {
        if ring.is_empty() {
            break;
        }
        let winner = ring.owner_of(hash.as_str())?.to_string();
        ring.remove(&winner);
        selected.push(winner);
    }
    Ok(selected)
}

/// Selects the regions an object belongs to, in preference order.
///
/// # Errors
///
/// See [`select_distinct`].
pub fn select_regions(
    hash: &KeyHash,
    topology: &Topology,
    region_count: usize,
) -> Result<Vec<String>> {
    select_distinct(hash, &topology.region_names(), region_count)
}

/// Selects replica nodes for each given region, concatenated in region
/// order.
///
/// Regions missing from the topology are skipped. The result is
/// duplicate-free within each region's slice; its length is at most
/// `regions.len() * replica_count`.
///
/// # Errors
///
/// See [`select_distinct`].
pub fn select_nodes(
    hash: &KeyHash,
    topology: &Topology,
    replica_count: usize,
    regions: &[String],
) -> Result<Vec<String>> {
    let mut selected = Vec::with_capacity(regions.len() * replica_count);
    for region in regions {
        if let Some(nodes) = topology.nodes(region) {
            selected.extend(select_distinct(hash, nodes, replica_count)?);
        }
    }
    Ok(selected)
}
