// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Usher: a routing director for sharded object storage.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use usher_api::{create_director_router, create_node_router, DirectorState};
use usher_core::config::LogFormat;
use usher_core::Config;
use usher_probe::HttpProbeClient;
use usher_storage::BlobStore;

mod cli;

use cli::{Cli, Commands, ServeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Director(args) => run_director(args).await,
        Commands::Storage(args) => run_storage(args).await,
        Commands::Version => {
            println!("usher {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_director(args: ServeArgs) -> Result<()> {
    let config = load_config(&args)?;
    init_logging(&config);
    init_metrics(&config)?;

    let probe = HttpProbeClient::new().context("Failed to build probe client")?;
    let state = DirectorState {
        director: Arc::new(config.director.clone()),
        probe: Arc::new(probe),
    };
    let app = create_director_router(state, config.logging.log_requests);

    info!(
        topology = %config.director.topology_file.display(),
        region_count = config.director.region_count,
        replica_count = config.director.replica_count,
        probe_timeout_ms = config.director.probe_timeout_ms,
        "Director configured"
    );

    serve(app, config.server.bind, "director").await
}

async fn run_storage(args: ServeArgs) -> Result<()> {
    let config = load_config(&args)?;
    init_logging(&config);
    init_metrics(&config)?;

    let store = BlobStore::open(config.storage.data_dir.clone(), config.storage.temp_dir())
        .await
        .context("Failed to open blob store")?;
    let app =
        create_node_router(Arc::new(store), config.server.max_body_size, config.logging.log_requests);

    info!(data_dir = %config.storage.data_dir.display(), "Storage node configured");

    serve(app, config.server.bind, "storage node").await
}

fn load_config(args: &ServeArgs) -> Result<Config> {
    let mut config =
        Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    Ok(config)
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry().with(filter).with(fmt_layer.json()).init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry().with(filter).with(fmt_layer).init();
        }
    }
}

fn init_metrics(config: &Config) -> Result<()> {
    if !config.metrics.enabled {
        return Ok(());
    }

    let addr: SocketAddr = format!("{}:{}", config.metrics.bind, config.metrics.port)
        .parse()
        .context("Invalid metrics bind address")?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Metrics endpoint listening on http://{}/metrics", addr);
    Ok(())
}

async fn serve(app: axum::Router, addr: SocketAddr, role: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await.context("Failed to bind to address")?;

    info!("Usher {} listening on http://{}", role, addr);
    println!("\n  usher {role} ready on http://{addr}\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown");
        }
    }
}
