// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Director object routes: placement-driven GET and PUT redirects.
//!
//! Each request loads a fresh topology snapshot, resolves placement from
//! the object key hash, and (on GET only) folds in live probe results
//! before answering with a redirect, a diagnostic body or `not found`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use tracing::debug;
use usher_core::{DirectorConfig, KeyHash, ObjectKey, Topology};
use usher_placement::{select_nodes, select_regions};
use usher_probe::{probe_all, UNREACHABLE_STATUS};

use super::{plain, redirect};
use crate::error::ApiError;
use crate::router::DirectorState;

/// Presence-only query flags on the object routes. `?debug`, `?nodes` and
/// `?info` need no values and compose freely.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ObjectFlags {
    debug: Option<String>,
    nodes: Option<String>,
    info: Option<String>,
}

impl ObjectFlags {
    fn debug(&self) -> bool {
        self.debug.is_some()
    }

    fn nodes(&self) -> bool {
        self.nodes.is_some()
    }

    fn info(&self) -> bool {
        self.info.is_some()
    }
}

/// Per-request placement: the hash and the resolved regions/candidates.
struct Placement {
    key: ObjectKey,
    hash: KeyHash,
    regions: Vec<String>,
    candidates: Vec<String>,
}

/// Loads the topology snapshot and resolves placement for one object.
///
/// Topology load failure aborts the request with a 500 before any other
/// work happens; an empty topology is a legal snapshot that resolves to an
/// empty candidate list.
fn resolve_placement(director: &DirectorConfig, key: ObjectKey) -> Result<Placement, ApiError> {
    let topology = Topology::from_file(&director.topology_file)?;
    let hash = KeyHash::compute(director.salt.as_deref(), &key);
    let regions = select_regions(&hash, &topology, director.region_count)?;
    let candidates = select_nodes(&hash, &topology, director.replica_count, &regions)?;

    debug!(
        key = %key,
        hash = %hash,
        regions = regions.len(),
        candidates = candidates.len(),
        "Resolved placement"
    );

    Ok(Placement { key, hash, regions, candidates })
}

/// `GET /{account}/{bucket}/{object}` - probe the candidates and redirect
/// to a healthy replica, or render one of the diagnostic modes.
pub(crate) async fn get_object(
    State(state): State<DirectorState>,
    Path((account, bucket, object)): Path<(String, String, String)>,
    Query(flags): Query<ObjectFlags>,
) -> Result<Response, ApiError> {
    let placement = resolve_placement(&state.director, ObjectKey::new(&account, &bucket, &object))?;

    let statuses = {
        let probe = Arc::clone(&state.probe);
        let key = placement.key.clone();
        probe_all(&placement.candidates, state.director.probe_timeout(), move |node| {
            let probe = Arc::clone(&probe);
            let key = key.clone();
            async move { probe.object_status(&node, &key).await }
        })
        .await
    };

    if flags.nodes() {
        let status = if placement.candidates.is_empty() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        };
        return Ok(plain(status, render_node_listing(&placement.candidates, &statuses)));
    }

    // Placement-only fallback target; `info` shows it when no candidate is
    // currently healthy.
    let placement_url = placement
        .candidates
        .choose(&mut rand::rng())
        .map(|node| placement.key.object_url(node));

    let healthy: Vec<&String> = placement
        .candidates
        .iter()
        .filter(|node| statuses.get(node.as_str()) == Some(&200))
        .collect();
    let selected_url =
        healthy.choose(&mut rand::rng()).map(|node| placement.key.object_url(node.as_str()));

    if flags.info() {
        let url = selected_url.as_deref().or(placement_url.as_deref());
        return Ok(plain(StatusCode::OK, render_info(&placement, &state.director, &statuses, url)));
    }

    match selected_url {
        Some(url) if flags.debug() => Ok(plain(StatusCode::OK, format!("{url}\n"))),
        Some(url) => Ok(redirect(StatusCode::FOUND, &url)),
        None => Ok(plain(StatusCode::NOT_FOUND, "not found\n".to_string())),
    }
}

/// `PUT /{account}/{bucket}/{object}` - redirect the write to a candidate.
///
/// No probing happens here: placement alone chooses the target, and an
/// unreachable node is the storage tier's concern on writes.
pub(crate) async fn put_object(
    State(state): State<DirectorState>,
    Path((account, bucket, object)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let placement = resolve_placement(&state.director, ObjectKey::new(&account, &bucket, &object))?;

    match placement.candidates.choose(&mut rand::rng()) {
        Some(node) => {
            let url = placement.key.object_url(node);
            debug!(key = %placement.key, node = %node, "Redirecting write");
            Ok(redirect(StatusCode::TEMPORARY_REDIRECT, &url))
        }
        None => Ok(plain(StatusCode::NOT_FOUND, "not found\n".to_string())),
    }
}

fn status_of(statuses: &HashMap<String, u16>, node: &str) -> u16 {
    statuses.get(node).copied().unwrap_or(UNREACHABLE_STATUS)
}

/// The `nodes` diagnostic: one `addr [status]` line per candidate.
fn render_node_listing(candidates: &[String], statuses: &HashMap<String, u16>) -> String {
    let mut out = String::new();
    for node in candidates {
        out.push_str(&format!("{node} [{}]\n", status_of(statuses, node)));
    }
    out
}

/// The `info` diagnostic: the full routing decision for one object.
fn render_info(
    placement: &Placement,
    director: &DirectorConfig,
    statuses: &HashMap<String, u16>,
    url: Option<&str>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("account = {}\n", placement.key.account));
    out.push_str(&format!("bucket = {}\n", placement.key.bucket));
    out.push_str(&format!("object = {}\n", placement.key.object));
    out.push_str(&format!("replicas_per_region = {}\n", director.replica_count));
    out.push_str(&format!("regions = {}\n", director.region_count));
    out.push_str(&format!("hash = {}\n", placement.hash));
    for node in &placement.candidates {
        out.push_str(&format!("node = {node} [{}]\n", status_of(statuses, node)));
    }
    for region in &placement.regions {
        out.push_str(&format!("region = {region}\n"));
    }
    if let Some(url) = url {
        out.push_str(&format!("url = {url}\n"));
    }
    out
}
