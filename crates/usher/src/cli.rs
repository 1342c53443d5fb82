// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Command line interface definition.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Usher: a routing director for sharded object storage.
#[derive(Parser)]
#[command(name = "usher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the routing director.
    Director(ServeArgs),
    /// Start a storage node.
    Storage(ServeArgs),
    /// Print version information.
    Version,
}

/// Arguments shared by the serving commands.
#[derive(Args)]
pub struct ServeArgs {
    /// Path to configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}
