// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `slotpool stress` command: run a churn workload and report the outcome.
//!
//! The workload comes from a TOML file, the command line, or both; flags
//! override file values, which override the defaults. Run the binary under
//! ThreadSanitizer with heavy parameters to hunt memory-ordering bugs.

use anyhow::Context;
use std::path::PathBuf;
use stress_harness::{run, WorkloadConfig};

pub fn execute(
    config_path: Option<PathBuf>,
    capacity: Option<usize>,
    threads: Option<usize>,
    ops: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    // ── Workload resolution ────────────────────────────────────
    let mut config = match config_path {
        Some(path) => WorkloadConfig::from_file(&path)
            .with_context(|| format!("loading workload '{}'", path.display()))?,
        None => WorkloadConfig::default(),
    };

    if let Some(capacity) = capacity {
        config.capacity = capacity;
    }
    if let Some(threads) = threads {
        config.threads = threads;
    }
    if let Some(ops) = ops {
        config.ops_per_thread = ops;
    }

    tracing::debug!(?config, "resolved workload");

    if !json {
        println!("╔══════════════════════════════════════════════════════╗");
        println!("║              slotpool · Churn Workload              ║");
        println!("╚══════════════════════════════════════════════════════╝");
        println!();
        println!("  Workload:");
        println!("   Capacity:   {} slots", config.capacity);
        println!("   Threads:    {}", config.threads);
        println!("   Ops/thread: {}", config.ops_per_thread);
        println!("   Alloc bias: {}%", config.alloc_bias_percent);
        println!("   Seed:       {}", config.seed);
        println!();
    }

    // ── Run ────────────────────────────────────────────────────
    let report = run(&config).context("running churn workload")?;

    // ── Report ─────────────────────────────────────────────────
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("  Results:");
    println!("   Duration:     {} ms", report.duration_ms);
    println!("   Allocations:  {}", report.allocations);
    println!("   Exhaustions:  {}", report.exhaustions);
    println!("   Releases:     {}", report.releases);
    println!(
        "   Final state:  {}  {}",
        report.final_stats.summary(),
        super::usage_bar(report.final_stats.utilization_percent),
    );
    println!();

    if report.balanced() {
        println!("  All objects returned to the pool.");
        Ok(())
    } else {
        anyhow::bail!(
            "workload left the pool unbalanced: {} allocations vs {} releases, {} slot(s) occupied",
            report.allocations,
            report.releases,
            report.final_stats.used,
        );
    }
}
