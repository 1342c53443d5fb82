// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! The consistent-hash ring.
//!
//! Each member occupies [`DEFAULT_VNODES`] points on a circular 64-bit
//! keyspace. The owner of a key is the first point encountered walking
//! counter-clockwise from the key's partition value: a point at key `k`
//! owns the half-open arc `(k, next point's key]`, and lookups past either
//! edge wrap around to the last point.

use sha2::{Digest, Sha256};
use usher_core::{Error, Result};

/// Number of virtual points placed on the ring per member.
///
/// More points smooth out the partition sizes each member receives, at the
/// cost of `O(vnodes log n)` insertion work per member.
pub const DEFAULT_VNODES: usize = 200;

/// Maps a string onto the ring's 64-bit keyspace.
///
/// Deterministic and uniform: the leading 8 bytes of SHA-256, wide enough
/// that collisions are negligible (and tolerated when they happen).
#[must_use]
pub fn partition(value: &str) -> u64 {
    let digest = Sha256::digest(value.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// A consistent-hash ring over string members.
///
/// Rings are request-scoped: build one, query it, drop it. There is no
/// shared-state contract.
#[derive(Debug, Clone)]
pub struct HashRing {
    /// Points sorted by `(partition key, member)`; the member tiebreak
    /// keeps ordering deterministic if two points ever collide.
    points: Vec<(u64, String)>,
    vnodes: usize,
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new()
    }
}

impl HashRing {
    /// Creates an empty ring with [`DEFAULT_VNODES`] points per member.
    #[must_use]
    pub fn new() -> Self {
        Self::with_vnodes(DEFAULT_VNODES)
    }

    /// Creates an empty ring with a custom number of points per member.
    #[must_use]
    pub fn with_vnodes(vnodes: usize) -> Self {
        Self { points: Vec::new(), vnodes }
    }

    /// Inserts a member's virtual points, keeping the ring sorted.
    pub fn add(&mut self, member: &str) {
        for i in 0..self.vnodes {
            let key = partition(&format!("{member}.{i}"));
            let pos = self.points.partition_point(|(k, m)| (*k, m.as_str()) < (key, member));
            self.points.insert(pos, (key, member.to_string()));
        }
    }

    /// Removes every point belonging to a member.
    pub fn remove(&mut self, member: &str) {
        self.points.retain(|(_, m)| m != member);
    }

    /// Returns the member owning the given key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRing`] when the ring has no points.
    pub fn owner_of(&self, key: &str) -> Result<&str> {
        self.owner_at(partition(key))
    }

    /// Owner lookup on a raw partition value.
    ///
    /// Lower-bound search for the first point with key >= `p`, then one
    /// step back with wraparound; a key equal to a point's partition value
    /// therefore belongs to the predecessor point.
    fn owner_at(&self, p: u64) -> Result<&str> {
        if self.points.is_empty() {
            return Err(Error::EmptyRing);
        }
        let i = self.points.partition_point(|(k, _)| *k < p);
        let at = (i + self.points.len() - 1) % self.points.len();
        Ok(&self.points[at].1)
    }

    /// Number of points currently on the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the ring has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Builds a ring with hand-placed points, bypassing `add`.
    fn raw_ring(points: &[(u64, &str)]) -> HashRing {
        HashRing {
            points: points.iter().map(|(k, m)| (*k, (*m).to_string())).collect(),
            vnodes: DEFAULT_VNODES,
        }
    }

    #[test]
    fn test_partition_deterministic() {
        assert_eq!(partition("node-1.0"), partition("node-1.0"));
        assert_ne!(partition("node-1.0"), partition("node-1.1"));
    }

    #[test]
    fn test_add_places_vnodes() {
        let mut ring = HashRing::new();
        ring.add("n1");
        assert_eq!(ring.len(), DEFAULT_VNODES);
        ring.add("n2");
        assert_eq!(ring.len(), 2 * DEFAULT_VNODES);
    }

    #[test]
    fn test_points_stay_sorted() {
        let mut ring = HashRing::new();
        for member in ["n1", "n2", "n3"] {
            ring.add(member);
        }
        assert!(ring.points.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_remove_drops_all_member_points() {
        let mut ring = HashRing::new();
        ring.add("n1");
        ring.add("n2");
        ring.remove("n1");
        assert_eq!(ring.len(), DEFAULT_VNODES);
        assert!(ring.points.iter().all(|(_, m)| m == "n2"));
    }

    #[test]
    fn test_owner_between_points() {
        let ring = raw_ring(&[(10, "a"), (50, "b"), (90, "c")]);
        assert_eq!(ring.owner_at(11).unwrap(), "a");
        assert_eq!(ring.owner_at(55).unwrap(), "b");
        assert_eq!(ring.owner_at(89).unwrap(), "b");
    }

    #[test]
    fn test_owner_wraps_below_first_point() {
        let ring = raw_ring(&[(10, "a"), (50, "b"), (90, "c")]);
        assert_eq!(ring.owner_at(5).unwrap(), "c");
        assert_eq!(ring.owner_at(0).unwrap(), "c");
    }

    #[test]
    fn test_owner_wraps_past_last_point() {
        let ring = raw_ring(&[(10, "a"), (50, "b"), (90, "c")]);
        assert_eq!(ring.owner_at(91).unwrap(), "c");
        assert_eq!(ring.owner_at(u64::MAX).unwrap(), "c");
    }

    #[test]
    fn test_exact_match_belongs_to_predecessor() {
        // A point at k owns (k, next]; the key k itself is the end of the
        // previous arc.
        let ring = raw_ring(&[(10, "a"), (50, "b"), (90, "c")]);
        assert_eq!(ring.owner_at(10).unwrap(), "c");
        assert_eq!(ring.owner_at(50).unwrap(), "a");
        assert_eq!(ring.owner_at(90).unwrap(), "b");
    }

    #[test]
    fn test_colliding_points_do_not_break_lookup() {
        let ring = raw_ring(&[(10, "a"), (10, "b"), (50, "c")]);
        assert_eq!(ring.owner_at(10).unwrap(), "c");
        assert_eq!(ring.owner_at(11).unwrap(), "b");
    }

    #[test]
    fn test_empty_ring_is_an_error() {
        let ring = HashRing::new();
        assert!(matches!(ring.owner_of("anything"), Err(Error::EmptyRing)));
    }

    #[test]
    fn test_single_member_owns_everything() {
        let mut ring = HashRing::new();
        ring.add("only");
        for key in ["k1", "k2", "k3"] {
            assert_eq!(ring.owner_of(key).unwrap(), "only");
        }
    }

    #[test]
    fn test_distribution_roughly_uniform() {
        let mut ring = HashRing::new();
        let members = ["n1", "n2", "n3", "n4"];
        for member in members {
            ring.add(member);
        }

        let mut counts: HashMap<String, u32> = HashMap::new();
        for i in 0..4000 {
            let owner = ring.owner_of(&format!("object-{i}")).unwrap().to_string();
            *counts.entry(owner).or_default() += 1;
        }

        let expected = 4000.0 / members.len() as f64;
        for member in members {
            let ratio = f64::from(*counts.get(member).unwrap_or(&0)) / expected;
            assert!(ratio > 0.5 && ratio < 1.5, "distribution too skewed for {member}: {ratio}");
        }
    }

    #[test]
    fn test_removal_only_moves_removed_members_keys() {
        let mut ring = HashRing::new();
        for member in ["n1", "n2", "n3", "n4", "n5"] {
            ring.add(member);
        }

        let keys: Vec<String> = (0..200).map(|i| format!("key-{i}")).collect();
        let before: Vec<String> =
            keys.iter().map(|k| ring.owner_of(k).unwrap().to_string()).collect();

        ring.remove("n3");

        for (key, old_owner) in keys.iter().zip(&before) {
            let new_owner = ring.owner_of(key).unwrap();
            if old_owner != "n3" {
                assert_eq!(new_owner, old_owner, "key {key} moved although its owner stayed");
            } else {
                assert_ne!(new_owner, "n3");
            }
        }
    }
}
