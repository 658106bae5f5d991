// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `slotpool demo` command: a guided tour of the allocation surface.
//!
//! Exercises the scoped and raw forms, exhaustion behavior, initializer
//! failure, the occupancy snapshot, and the per-type global registry, with
//! the pool state printed after each step.

use anyhow::Context;
use pool_registry::register_pool;
use slot_pool::Pool;

/// A demonstration object with a visible identity.
struct Ticket {
    id: u32,
    label: String,
}

/// Global-registry demo type: one process-wide pool of 32 messages.
struct Message {
    body: String,
}

register_pool!(Message, 32);

pub fn execute(capacity: usize) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            slotpool · Allocation Walkthrough        ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let pool: Pool<Ticket> = Pool::new(capacity);
    print_state("fresh pool", &pool);

    // ── Scoped allocation ──────────────────────────────────────
    println!("  Scoped allocation (handle returns the slot on drop)");
    {
        let first = pool
            .allocate_scoped(|| Ticket {
                id: 1,
                label: "first".into(),
            })
            .context("demo pool exhausted")?;
        let second = pool
            .allocate_scoped(|| Ticket {
                id: 2,
                label: "second".into(),
            })
            .context("demo pool exhausted")?;

        println!("   held: #{} '{}', #{} '{}'", first.id, first.label, second.id, second.label);
        print_state("two handles live", &pool);
    }
    print_state("handles dropped", &pool);

    // ── Raw allocation ─────────────────────────────────────────
    println!("  Raw allocation (manual release, null on exhaustion)");
    let raw = pool.allocate_raw(|| Ticket {
        id: 3,
        label: "raw".into(),
    });
    if !raw.is_null() {
        unsafe {
            println!("   got #{} '{}'", (*raw).id, (*raw).label);
            pool.release_raw(raw);
        }
    }
    print_state("raw released", &pool);

    // ── Exhaustion ─────────────────────────────────────────────
    println!("  Exhaustion (reported immediately, never waited on)");
    let mut held = Vec::new();
    loop {
        match pool.allocate_scoped(|| Ticket {
            id: 0,
            label: "filler".into(),
        }) {
            Some(h) => held.push(h),
            None => break,
        }
    }
    println!("   filled {} slots; next request refused", held.len());
    print_state("pool full", &pool);
    held.clear();
    print_state("drained", &pool);

    // ── Initializer failure ────────────────────────────────────
    println!("  Initializer failure (raw form reports it; slot comes back)");
    let outcome: Result<*mut Ticket, String> =
        pool.try_allocate_raw(|| Err("refused to build".into()));
    if let Err(reason) = outcome {
        println!("   propagated error: {reason:?}");
    }
    print_state("after failed build", &pool);

    // ── Global registry ────────────────────────────────────────
    println!("  Per-type global pool (registered once, lives forever)");
    let msg = pool_registry::alloc_scoped(|| Message {
        body: "hello from the registry".into(),
    })
    .context("global demo pool exhausted")?;
    println!("   message: '{}'", msg.body);
    let stats = pool_registry::pool_stats::<Message>();
    println!(
        "   global Message pool: {}  {}",
        stats.summary(),
        super::usage_bar(stats.utilization_percent),
    );

    Ok(())
}

fn print_state(label: &str, pool: &Pool<Ticket>) {
    let stats = pool.snapshot();
    println!(
        "   [{label}] {}  {}",
        stats.summary(),
        super::usage_bar(stats.utilization_percent),
    );
    println!();
}
