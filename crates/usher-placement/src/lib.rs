// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Deterministic placement for the usher routing director.
//!
//! This crate answers one question: given an object key hash and a topology
//! snapshot, which nodes should hold the object's replicas? The answer is a
//! pure function of its inputs:
//! - a consistent-hash [`ring`] maps a key to the member owning it, with
//!   many virtual points per member for smooth load distribution;
//! - the [`resolver`] layers two selection stages on top of the ring, first
//!   picking regions, then replica nodes inside each region.
//!
//! Rings are ephemeral: every resolution builds its own instances and drops
//! them when done, so no locking is needed and node churn is picked up on
//! the next request. Removing a member only reassigns the keys that member
//! owned; everything else keeps its placement, which is what keeps
//! rebalancing cheap.

#![warn(missing_docs)]

pub mod resolver;
pub mod ring;

pub use resolver::{select_distinct, select_nodes, select_regions};
pub use ring::{partition, HashRing, DEFAULT_VNODES};
