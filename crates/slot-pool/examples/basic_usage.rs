// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: a guided tour of the pool's allocation surface.
//!
//! Walks through scoped allocation, raw allocation, exhaustion, initializer
//! failure, and a rough pool-vs-heap timing loop.
//!
//! ```bash
//! cargo run -p slot-pool --example basic_usage
//! ```

use slot_pool::Pool;
use std::time::Instant;

/// A demonstration object with enough payload to make pooling worthwhile.
struct Session {
    id: u32,
    name: String,
    scratch: [u8; 64],
}

impl Session {
    fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            scratch: [0; 64],
        }
    }

    fn touch(&mut self) {
        self.scratch[0] = self.scratch[0].wrapping_add(1);
    }
}

/// Refuses one specific value, standing in for a constructor that can fail.
fn checked(value: u32) -> Result<u32, String> {
    if value == 666 {
        Err(format!("{value} is not allowed"))
    } else {
        Ok(value)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing.
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Scoped allocation (the default) ===");
    let pool: Pool<Session> = Pool::new(8);
    {
        let mut alice = pool.allocate_scoped(|| Session::new(1, "alice")).unwrap();
        let bob = pool.allocate_scoped(|| Session::new(2, "bob")).unwrap();

        alice.touch();
        println!("  alice: id={} name={}", alice.id, alice.name);
        println!("  bob:   id={} name={}", bob.id, bob.name);
        println!("  {}", pool.snapshot().summary());
        // Both handles drop here: destructors run, slots return.
    }
    println!("  after scope: {}", pool.snapshot().summary());

    println!("\n=== Raw allocation (manual release) ===");
    let p = pool.allocate_raw(|| Session::new(3, "carol"));
    if !p.is_null() {
        unsafe {
            (*p).touch();
            println!("  carol: id={} name={}", (*p).id, (*p).name);
            pool.release_raw(p);
        }
    }

    println!("\n=== Exhaustion is an outcome, not an error ===");
    let tiny: Pool<u32> = Pool::new(3);
    let held: Vec<_> = (0..3).map(|i| tiny.allocate_scoped(move || i).unwrap()).collect();
    match tiny.allocate_scoped(|| 99) {
        Some(_) => println!("  unexpected success"),
        None => println!("  fourth allocation refused: {}", tiny.snapshot().summary()),
    }
    drop(held);
    println!("  after releasing: {}", tiny.snapshot().summary());

    println!("\n=== Initializer failure returns the slot ===");
    let guarded: Pool<u32> = Pool::new(4);

    let outcome = guarded.try_allocate_raw(|| checked(666));
    println!("  raw form propagates: {outcome:?}");
    println!("  nothing leaked:      {}", guarded.snapshot().summary());

    let ok = guarded.try_allocate_raw(|| checked(7))?;
    println!("  pool still works:    {}", guarded.snapshot().summary());
    unsafe { guarded.release_raw(ok) };

    println!("\n=== Rough timing: pool vs heap ===");
    const ROUNDS: u32 = 100_000;
    let timing_pool: Pool<Session> = Pool::new(16);

    let start = Instant::now();
    for i in 0..ROUNDS {
        let mut s = timing_pool.allocate_scoped(|| Session::new(i, "pool")).unwrap();
        s.touch();
    }
    let pool_elapsed = start.elapsed();

    let start = Instant::now();
    for i in 0..ROUNDS {
        let mut s = Box::new(Session::new(i, "heap"));
        s.touch();
    }
    let heap_elapsed = start.elapsed();

    println!("  pool: {pool_elapsed:?} for {ROUNDS} cycles");
    println!("  heap: {heap_elapsed:?} for {ROUNDS} cycles");
    println!("  (numbers vary with system load; see benches/ for real measurements)");

    Ok(())
}
