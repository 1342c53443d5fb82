// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end director behavior over real storage nodes.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use usher_api::{create_director_router, create_node_router, DirectorState};
use usher_core::DirectorConfig;
use usher_probe::HttpProbeClient;
use usher_storage::{content_checksum, BlobStore};

/// One running test server (director or storage node).
struct TestServer {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
    _shutdown_tx: oneshot::Sender<()>,
    _temp_dir: TempDir,
}

impl TestServer {
    fn node(&self) -> String {
        self.addr.to_string()
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{path_and_query}", self.addr)
    }
}

async fn serve(app: axum::Router, temp_dir: TempDir) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local addr");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    TestServer { addr, _handle: handle, _shutdown_tx: shutdown_tx, _temp_dir: temp_dir }
}

async fn start_storage_node() -> TestServer {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = BlobStore::open(temp_dir.path().join("data"), temp_dir.path().join("tmp"))
        .await
        .expect("Failed to open store");

    serve(create_node_router(Arc::new(store), 64 * 1024 * 1024, false), temp_dir).await
}

async fn start_director(topology_yaml: &str, region_count: usize, replica_count: usize) -> TestServer {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let topology_file = temp_dir.path().join("topology.yml");
    std::fs::write(&topology_file, topology_yaml).expect("Failed to write topology");

    start_director_with(
        DirectorConfig {
            topology_file,
            region_count,
            replica_count,
            salt: None,
            probe_timeout_ms: 500,
        },
        temp_dir,
    )
    .await
}

async fn start_director_with(director: DirectorConfig, temp_dir: TempDir) -> TestServer {
    let state = DirectorState {
        director: Arc::new(director),
        probe: Arc::new(HttpProbeClient::new().expect("Failed to build probe client")),
    };
    serve(create_director_router(state, false), temp_dir).await
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client")
}

fn one_region_topology(nodes: &[&str]) -> String {
    let mut yaml = String::from("main:\n");
    for node in nodes {
        yaml.push_str(&format!("  - {node}\n"));
    }
    yaml
}

#[tokio::test]
async fn test_put_redirects_to_a_candidate_without_probing() {
    // Dead addresses on purpose: the write path must not probe.
    let topology = one_region_topology(&["127.0.0.1:9", "127.0.0.1:19"]);
    let director = start_director(&topology, 1, 2).await;

    let response = client()
        .put(director.url("/acct/bkt/report.pdf"))
        .body("payload")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 307);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(
        location == "http://127.0.0.1:9/acct/bkt/report.pdf"
            || location == "http://127.0.0.1:19/acct/bkt/report.pdf",
        "unexpected redirect target: {location}"
    );
}

#[tokio::test]
async fn test_put_with_empty_topology_is_not_found() {
    let director = start_director("{}\n", 2, 2).await;

    let response =
        client().put(director.url("/acct/bkt/obj")).body("payload").send().await.unwrap();

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(response.text().await.unwrap(), "not found\n");
}

#[tokio::test]
async fn test_get_with_no_healthy_node_is_not_found() {
    let topology = one_region_topology(&["127.0.0.1:9", "127.0.0.1:19"]);
    let director = start_director(&topology, 1, 2).await;

    let response = client().get(director.url("/acct/bkt/obj")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(response.text().await.unwrap(), "not found\n");
}

#[tokio::test]
async fn test_write_then_read_through_the_director() {
    let node_a = start_storage_node().await;
    let node_b = start_storage_node().await;
    let topology = one_region_topology(&[&node_a.node(), &node_b.node()]);
    let director = start_director(&topology, 1, 2).await;
    let client = client();

    // Writes get redirected to one of the two candidates; the client
    // repeats the PUT against the target.
    let payload = b"the quick brown fox".as_slice();
    let response = client.put(director.url("/acct/bkt/obj")).body(payload).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 307);
    let target = response.headers()["location"].to_str().unwrap().to_string();

    let stored = client.put(&target).body(payload).send().await.unwrap();
    assert_eq!(stored.status().as_u16(), 200);
    assert_eq!(stored.text().await.unwrap(), format!("OK {}\n", content_checksum(payload)));

    // Reads probe both candidates and redirect to the one holding the
    // object, which is exactly where the write landed.
    let response = client.get(director.url("/acct/bkt/obj")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(response.headers()["location"].to_str().unwrap(), target);

    // Following the redirect yields the payload.
    let body = client.get(&target).send().await.unwrap().bytes().await.unwrap();
    assert_eq!(body.as_ref(), payload);
}

#[tokio::test]
async fn test_get_debug_returns_url_instead_of_redirect() {
    let node = start_storage_node().await;
    let topology = one_region_topology(&[&node.node()]);
    let director = start_director(&topology, 1, 1).await;
    let client = client();

    let response = client.put(director.url("/acct/bkt/obj")).body("x").send().await.unwrap();
    let target = response.headers()["location"].to_str().unwrap().to_string();
    client.put(&target).body("x").send().await.unwrap();

    let response = client.get(director.url("/acct/bkt/obj?debug")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().get("location").is_none());
    assert_eq!(response.text().await.unwrap().trim_end(), target);
}

#[tokio::test]
async fn test_nodes_flag_lists_every_candidate_with_status() {
    let node_a = start_storage_node().await;
    let node_b = start_storage_node().await;
    let topology = one_region_topology(&[&node_a.node(), &node_b.node()]);
    let director = start_director(&topology, 1, 2).await;
    let client = client();

    // Nothing stored yet: nodes are up but the object probe sees 404
    // everywhere. The listing still answers 200 because candidates exist.
    let response = client.get(director.url("/acct/bkt/obj?nodes")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let listing = response.text().await.unwrap();
    assert!(listing.contains(&format!("{} [404]", node_a.node())));
    assert!(listing.contains(&format!("{} [404]", node_b.node())));

    // Store the object on its redirect target, then the listing shows one
    // healthy replica.
    let response = client.put(director.url("/acct/bkt/obj")).body("x").send().await.unwrap();
    let target = response.headers()["location"].to_str().unwrap().to_string();
    client.put(&target).body("x").send().await.unwrap();

    let listing =
        client.get(director.url("/acct/bkt/obj?nodes")).send().await.unwrap().text().await.unwrap();
    assert!(listing.contains("[200]"), "no healthy replica in listing: {listing}");
}

#[tokio::test]
async fn test_nodes_flag_with_empty_topology_is_404() {
    let director = start_director("{}\n", 1, 2).await;

    let response = client().get(director.url("/acct/bkt/obj?nodes")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(response.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_info_flag_renders_diagnostics() {
    let node = start_storage_node().await;
    let topology = one_region_topology(&[&node.node()]);
    let director = start_director(&topology, 1, 1).await;

    let response = client().get(director.url("/acct/bkt/obj?info")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let info = response.text().await.unwrap();
    assert!(info.contains("account = acct\n"));
    assert!(info.contains("bucket = bkt\n"));
    assert!(info.contains("object = obj\n"));
    assert!(info.contains("replicas_per_region = 1\n"));
    assert!(info.contains("hash = "));
    assert!(info.contains(&format!("node = {} [404]\n", node.node())));
    assert!(info.contains("region = main\n"));
    assert!(info.contains(&format!("url = http://{}/acct/bkt/obj\n", node.node())));
}

#[tokio::test]
async fn test_missing_topology_file_aborts_with_500() {
    let temp_dir = TempDir::new().unwrap();
    let director = start_director_with(
        DirectorConfig {
            topology_file: PathBuf::from("/nonexistent/topology.yml"),
            ..DirectorConfig::default()
        },
        temp_dir,
    )
    .await;
    let client = client();

    let response = client.get(director.url("/acct/bkt/obj")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(response.text().await.unwrap(), "internal server error\n");

    let response = client.put(director.url("/acct/bkt/obj")).body("x").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn test_malformed_topology_aborts_with_500() {
    let director = start_director("main: [unclosed\n", 1, 2).await;

    let response = client().get(director.url("/acct/bkt/obj")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn test_every_response_carries_elapsed_header() {
    let director = start_director("{}\n", 1, 2).await;
    let client = client();

    let ok_404 = client.get(director.url("/acct/bkt/obj")).send().await.unwrap();
    assert!(ok_404.headers().contains_key("elapsed"));

    let put = client.put(director.url("/acct/bkt/obj")).body("x").send().await.unwrap();
    let elapsed: f64 =
        put.headers()["elapsed"].to_str().unwrap().parse().expect("elapsed is a float");
    assert!(elapsed >= 0.0);
}

#[tokio::test]
async fn test_placement_is_stable_across_requests() {
    // Same key, same topology: the PUT target must not change between
    // requests beyond the random choice among the fixed candidate set.
    let topology = one_region_topology(&["127.0.0.1:9"]);
    let director = start_director(&topology, 1, 1).await;
    let client = client();

    let mut targets = std::collections::HashSet::new();
    for _ in 0..5 {
        let response =
            client.put(director.url("/acct/bkt/stable")).body("x").send().await.unwrap();
        targets.insert(response.headers()["location"].to_str().unwrap().to_string());
    }

    assert_eq!(targets.len(), 1, "single-candidate placement moved: {targets:?}");
}
