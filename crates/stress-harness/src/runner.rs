// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The churn runner: worker threads hammering one shared pool.
//!
//! Each worker keeps a small set of held objects and, per operation, either
//! allocates (with a configurable bias) or releases a randomly chosen held
//! object. Payload contents are stamped with a recognisable pattern and
//! verified on release, so silent cross-thread storage corruption shows up
//! as an assertion rather than a statistic.

use crate::{StressError, StressReport, WorkloadConfig};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slot_pool::Pool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

/// The pooled object under test: a stamp plus enough payload bytes to make
/// storage reuse bugs visible.
struct Payload {
    stamp: u64,
    data: [u8; 120],
}

impl Payload {
    fn new(stamp: u64) -> Self {
        Self {
            stamp,
            data: [(stamp % 251) as u8; 120],
        }
    }

    fn verify(&self) {
        assert_eq!(
            self.data[0],
            (self.stamp % 251) as u8,
            "payload corrupted while held",
        );
    }
}

/// Runs the workload to completion and reports totals.
///
/// The pool lives on this function's stack and every worker borrows it, so
/// by construction nothing outlives the run.
pub fn run(config: &WorkloadConfig) -> Result<StressReport, StressError> {
    config.validate()?;

    tracing::info!(
        capacity = config.capacity,
        threads = config.threads,
        ops_per_thread = config.ops_per_thread,
        "starting churn workload",
    );

    let pool: Pool<Payload> = Pool::new(config.capacity);
    let allocations = AtomicU64::new(0);
    let exhaustions = AtomicU64::new(0);
    let releases = AtomicU64::new(0);

    let started = Instant::now();

    thread::scope(|s| {
        for t in 0..config.threads {
            let pool = &pool;
            let allocations = &allocations;
            let exhaustions = &exhaustions;
            let releases = &releases;
            s.spawn(move || {
                let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(t as u64));
                let mut held: Vec<*mut Payload> = Vec::with_capacity(config.max_held_per_thread);

                for i in 0..config.ops_per_thread {
                    let want_alloc = rng.gen_range(0..100u8) < config.alloc_bias_percent;
                    let must_alloc = held.is_empty();
                    let may_alloc = held.len() < config.max_held_per_thread;

                    if must_alloc || (want_alloc && may_alloc) {
                        let stamp = (t * 1_000_000 + i) as u64;
                        let p = pool.allocate_raw(move || Payload::new(stamp));
                        if p.is_null() {
                            exhaustions.fetch_add(1, Ordering::Relaxed);
                        } else {
                            unsafe { (*p).verify() };
                            held.push(p);
                            allocations.fetch_add(1, Ordering::Relaxed);
                        }
                    } else {
                        let idx = rng.gen_range(0..held.len());
                        let p = held.swap_remove(idx);
                        unsafe {
                            (*p).verify();
                            pool.release_raw(p);
                        }
                        releases.fetch_add(1, Ordering::Relaxed);
                    }

                    // Occasionally step aside to vary the interleaving.
                    if rng.gen_range(0..10u8) == 0 {
                        thread::yield_now();
                    }
                }

                // Drain whatever is still held.
                let drained = held.len() as u64;
                for p in held {
                    unsafe {
                        (*p).verify();
                        pool.release_raw(p);
                    }
                }
                releases.fetch_add(drained, Ordering::Relaxed);

                tracing::debug!(thread = t, "worker finished");
            });
        }
    });

    let duration = started.elapsed();
    let final_stats = pool.snapshot();

    let report = StressReport {
        threads: config.threads,
        ops_per_thread: config.ops_per_thread,
        allocations: allocations.load(Ordering::Relaxed),
        exhaustions: exhaustions.load(Ordering::Relaxed),
        releases: releases.load(Ordering::Relaxed),
        duration_ms: duration.as_millis() as u64,
        final_stats,
    };

    tracing::info!(summary = report.summary(), "workload finished");

    Ok(report)
}
