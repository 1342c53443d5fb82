// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Concurrent, bounded-timeout probing of storage nodes.
//!
//! The director needs a quick answer to "which of these candidate nodes can
//! actually serve this object right now?". [`probe_all`] fans out one probe
//! task per node, bounds each with the probe budget, and aggregates the
//! observed HTTP statuses keyed by node address. Every task carries its
//! node's identity in its return value, so a slow node's result can never
//! be attributed to a fast one regardless of completion order.
//!
//! Probe failures are data, not errors: a timeout, connection failure or
//! panicked task all normalize to [`UNREACHABLE_STATUS`].

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use metrics::{counter, histogram};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};
use usher_core::ObjectKey;

/// Status recorded for a node that could not be reached within the budget.
pub const UNREACHABLE_STATUS: u16 = 404;

/// A probe failed before producing an HTTP status.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The transport could not complete the request (connect failure,
    /// reset, malformed response).
    #[error("probe transport error: {0}")]
    Transport(String),
}

/// Issues single probes against one storage node.
///
/// Two flavors exist because the router asks different questions on
/// different paths: `ping` is pure liveness, `object_status` asks whether
/// this node holds a healthy copy of one specific object.
#[async_trait]
pub trait ProbeClient: Send + Sync {
    /// Liveness probe: `GET http://{node}/ping`.
    async fn ping(&self, node: &str) -> Result<u16, ProbeError>;

    /// Object-presence probe: `GET http://{node}/{account}/{bucket}/{object}?info`.
    async fn object_status(&self, node: &str, key: &ObjectKey) -> Result<u16, ProbeError>;
}

/// HTTP probe client backed by a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpProbeClient {
    client: reqwest::Client,
}

impl HttpProbeClient {
    /// Creates a probe client.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new() -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    async fn status_of(&self, url: &str) -> Result<u16, ProbeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl ProbeClient for HttpProbeClient {
    async fn ping(&self, node: &str) -> Result<u16, ProbeError> {
        self.status_of(&format!("http://{node}/ping")).await
    }

    async fn object_status(&self, node: &str, key: &ObjectKey) -> Result<u16, ProbeError> {
        self.status_of(&format!("{}?info", key.object_url(node))).await
    }
}

/// Probes every node concurrently and returns the statuses keyed by node.
///
/// One task per node, each bounded by `budget`. The call joins all tasks
/// before returning, so its latency floor is the budget, not the sum of
/// probe latencies. In-flight probes for a dropped caller run to their
/// timeout and are discarded; nothing is retried.
pub async fn probe_all<F, Fut>(
    nodes: &[String],
    budget: Duration,
    probe_fn: F,
) -> HashMap<String, u16>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<u16, ProbeError>> + Send + 'static,
{
    let started = std::time::Instant::now();

    let mut tasks = Vec::with_capacity(nodes.len());
    for node in nodes {
        let fut = probe_fn(node.clone());
        let task_node = node.clone();
        let handle = tokio::spawn(async move {
            match timeout(budget, fut).await {
                Ok(Ok(status)) => status,
                Ok(Err(err)) => {
                    debug!(node = %task_node, error = %err, "Probe failed");
                    counter!("usher_probe_unreachable_total").increment(1);
                    UNREACHABLE_STATUS
                }
                Err(_) => {
                    debug!(node = %task_node, budget_ms = budget.as_millis() as u64, "Probe timed out");
                    counter!("usher_probe_timeout_total").increment(1);
                    UNREACHABLE_STATUS
                }
            }
        });
        tasks.push((node.clone(), handle));
    }

    let mut report = HashMap::with_capacity(tasks.len());
    for (node, handle) in tasks {
        let status = match handle.await {
            Ok(status) => status,
            Err(err) => {
                warn!(node = %node, error = %err, "Probe task aborted");
                UNREACHABLE_STATUS
            }
        };
        report.insert(node, status);
    }

    histogram!("usher_probe_round_duration_seconds").record(started.elapsed().as_secs_f64());
    report
}
