// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # slotpool
//!
//! Command-line toolkit for the slot-pool allocator.
//!
//! ## Usage
//! ```bash
//! # Guided walkthrough of the allocation surface
//! slotpool demo
//!
//! # Concurrent churn workload (defaults: 8 threads x 5000 ops, 1000 slots)
//! slotpool stress --threads 8 --ops 5000
//!
//! # Same, driven by a TOML workload file
//! slotpool stress --config workload.toml --json
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "slotpool",
    about = "Fixed-capacity lock-free object pool toolkit",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through scoped/raw allocation, exhaustion, and snapshots.
    Demo {
        /// Slot count for the demo pool.
        #[arg(short, long, default_value_t = 8)]
        capacity: usize,
    },

    /// Run a multi-threaded churn workload and report the outcome.
    Stress {
        /// Path to a TOML workload file (flags below override its values).
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Slot count of the pool under test.
        #[arg(long)]
        capacity: Option<usize>,

        /// Worker thread count.
        #[arg(short, long)]
        threads: Option<usize>,

        /// Operations per thread.
        #[arg(long)]
        ops: Option<usize>,

        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Demo { capacity } => commands::demo::execute(capacity),
        Commands::Stress {
            config,
            capacity,
            threads,
            ops,
            json,
        } => commands::stress::execute(config, capacity, threads, ops, json),
    }
}
