// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # slot-pool
//!
//! A fixed-capacity, lock-free object pool for latency-sensitive paths:
//! request handlers, hot-path event objects, per-packet state — anywhere
//! general-purpose heap allocation is too slow or too jittery.
//!
//! One pool serves one concrete `T` and a slot count chosen at construction.
//! The pool never grows, never moves stored objects, and never blocks a
//! caller on a lock: allocation is a lock-free probe over an atomic-flag
//! array, and an exhausted pool reports so immediately instead of waiting.
//!
//! # Key Components
//!
//! - [`Pool`] — the allocator: claims a free slot with a weak CAS, builds
//!   the object in place, and takes an eventually-consistent [`PoolStats`]
//!   snapshot on demand.
//! - [`Pooled`] — an RAII handle to one allocated object. Dropping it runs
//!   the destructor and returns the slot. The borrow checker prevents
//!   use-after-free at compile time.
//! - A raw surface ([`Pool::allocate_raw`] / [`Pool::release_raw`]) for
//!   callers whose ownership structure can't carry a borrow, and for
//!   observing initializer errors.
//!
//! # Ownership Model
//!
//! ```text
//! Pool::allocate_scoped(init)
//!       │ claim slot (CAS) · construct in place
//!       ▼
//!   Pooled<'pool, T>  ◄── unique owner of the occupied slot
//!       │
//!       │  drop()
//!       ▼
//!   destructor runs, then the slot is published free (release store)
//! ```
//!
//! # Example
//! ```
//! use slot_pool::Pool;
//!
//! let pool: Pool<Vec<u8>> = Pool::new(64);
//!
//! // Scoped allocation: cannot leak a slot.
//! let mut buf = pool.allocate_scoped(|| Vec::with_capacity(1500)).unwrap();
//! buf.extend_from_slice(b"payload");
//! assert_eq!(pool.snapshot().used, 1);
//!
//! // Returning the slot is automatic.
//! drop(buf);
//! assert_eq!(pool.snapshot().used, 0);
//! ```

mod handle;
pub mod pool;
mod slot;
mod stats;

pub use handle::Pooled;
pub use pool::{Pool, MAX_SPURIOUS_RETRIES};
pub use stats::PoolStats;
