// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-capacity lock-free object pool.
//!
//! The [`Pool`] owns a contiguous array of slots, each sized for one `T`,
//! allocated once at construction and never resized or moved. Claiming a
//! slot is a linear probe starting from a shared advisory hint; each probe
//! is a weak compare-and-exchange on that slot's availability flag.
//! Releasing is a single release-store. No locks, no waiting: when every
//! slot is taken the pool says so immediately and the caller decides what
//! to do about it.
//!
//! # Thread Safety
//! `Pool<T>` is `Send + Sync` for `T: Send` — any number of threads may
//! allocate and release concurrently on a shared pool.
//!
//! # Two allocation forms
//! The *scoped* form returns a [`Pooled`] handle that destroys and releases
//! on drop and can never leak a slot. The *raw* form returns a bare pointer
//! for callers whose ownership structure doesn't fit a borrow, paired with
//! the explicit [`Pool::release_raw`]. The raw form is also the one that
//! reports initializer errors; the scoped form swallows them into `None`.

use crate::handle::Pooled;
use crate::slot::{ClaimAttempt, Slot};
use crate::stats::PoolStats;
use crossbeam_utils::CachePadded;
use std::convert::Infallible;
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicUsize, Ordering};

/// How many times a claim retries one slot after a spurious weak-CAS
/// failure before moving on to the next slot.
///
/// Spurious failures (the CAS fails although the flag was observed free)
/// are permitted on weak compare-and-exchange; a small bounded retry keeps
/// the probe from abandoning a genuinely free slot while still guaranteeing
/// the scan terminates.
pub const MAX_SPURIOUS_RETRIES: usize = 3;

/// A fixed-capacity, lock-free pool of `T` objects.
///
/// # Example
/// ```
/// use slot_pool::Pool;
///
/// let pool: Pool<String> = Pool::new(16);
///
/// let greeting = pool.allocate_scoped(|| String::from("hello")).unwrap();
/// assert_eq!(&*greeting, "hello");
/// assert_eq!(pool.snapshot().used, 1);
///
/// drop(greeting);
/// assert_eq!(pool.snapshot().used, 0);
/// ```
pub struct Pool<T> {
    /// The slot array. Boxed slice: contiguous, stable addresses, fixed
    /// length for the pool's whole lifetime.
    slots: Box<[Slot<T>]>,
    /// Advisory start index for the next claim probe. Padded onto its own
    /// cache line so hint churn doesn't invalidate slot lines. Correctness
    /// never depends on its value.
    hint: CachePadded<AtomicUsize>,
}

impl<T> Pool<T> {
    /// Creates a pool with `capacity` slots, all free.
    ///
    /// This is the only allocation the pool ever performs.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "pool capacity must be at least 1");
        Self {
            slots: (0..capacity).map(|_| Slot::new()).collect(),
            hint: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the fixed slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Allocates a `T` built by `init`, returning a scoped handle.
    ///
    /// Returns `None` when the pool is exhausted, an expected outcome under
    /// load rather than an error. `init` only runs after a slot has been claimed,
    /// so an exhausted pool costs nothing but the probe.
    pub fn allocate_scoped(&self, init: impl FnOnce() -> T) -> Option<Pooled<'_, T>> {
        self.try_allocate_scoped(|| Ok::<T, Infallible>(init()))
    }

    /// Like [`Pool::allocate_scoped`], with a fallible initializer.
    ///
    /// An initializer error is swallowed: the claimed slot is returned to
    /// the free state and the caller sees `None`, same as exhaustion. Use
    /// [`Pool::try_allocate_raw`] when the error itself matters.
    pub fn try_allocate_scoped<E>(
        &self,
        init: impl FnOnce() -> Result<T, E>,
    ) -> Option<Pooled<'_, T>> {
        let index = self.claim()?;
        match self.construct_in(index, init) {
            Ok(ptr) => Some(Pooled::new(self, ptr)),
            Err(_) => None,
        }
    }

    /// Allocates a `T` built by `init`, returning a raw pointer.
    ///
    /// Returns a null pointer when the pool is exhausted. A non-null result
    /// points to a live `T` and must be returned to *this* pool with
    /// [`Pool::release_raw`] exactly once.
    ///
    /// # Example
    /// ```
    /// use slot_pool::Pool;
    ///
    /// let pool: Pool<i32> = Pool::new(4);
    /// let p = pool.allocate_raw(|| 42);
    /// assert!(!p.is_null());
    /// unsafe {
    ///     assert_eq!(*p, 42);
    ///     pool.release_raw(p);
    /// }
    /// ```
    pub fn allocate_raw(&self, init: impl FnOnce() -> T) -> *mut T {
        match self.try_allocate_raw(|| Ok::<T, Infallible>(init())) {
            Ok(ptr) => ptr,
            Err(never) => match never {},
        }
    }

    /// Like [`Pool::allocate_raw`], with a fallible initializer.
    ///
    /// Exhaustion is still `Ok(null)`; it is not an error. An initializer
    /// error is propagated to the caller after the claimed slot has been
    /// returned to the free state, so a failed allocation never costs a
    /// slot.
    pub fn try_allocate_raw<E>(
        &self,
        init: impl FnOnce() -> Result<T, E>,
    ) -> Result<*mut T, E> {
        let Some(index) = self.claim() else {
            return Ok(ptr::null_mut());
        };
        self.construct_in(index, init).map(NonNull::as_ptr)
    }

    /// Destroys `*ptr` and returns its slot to the pool.
    ///
    /// A null `ptr` is a no-op. The destructor finishes before the slot is
    /// published as reusable, so the next claimer of this slot observes a
    /// fully destroyed object.
    ///
    /// # Safety
    /// `ptr` must be null, or a pointer previously returned by
    /// [`Pool::allocate_raw`] / [`Pool::try_allocate_raw`] /
    /// [`Pooled::into_raw`] on this pool that has not already been
    /// released. Anything else is undefined behavior; debug builds check
    /// that the pointer lands inside the slot array and panic if not.
    pub unsafe fn release_raw(&self, ptr: *mut T) {
        if ptr.is_null() {
            return;
        }

        let index = self.slot_index_of(ptr);
        debug_assert!(
            index < self.slots.len(),
            "released pointer does not belong to this pool",
        );

        unsafe { ptr::drop_in_place(ptr) };
        self.slots[index].release();
    }

    /// Takes an eventually-consistent occupancy snapshot.
    ///
    /// Each slot flag is read with relaxed ordering; under concurrent
    /// traffic the counts describe no single instant, but they always
    /// balance (`free + used == total`).
    pub fn snapshot(&self) -> PoolStats {
        let free = self.slots.iter().filter(|s| s.is_free_relaxed()).count();
        PoolStats::from_free_count(self.slots.len(), free)
    }

    /// Overwrites the probe-start hint. Test hook: the hint is advisory, so
    /// any value must leave every observable behavior intact.
    #[doc(hidden)]
    pub fn set_search_hint(&self, index: usize) {
        self.hint.store(index % self.slots.len(), Ordering::Relaxed);
    }

    /// Probes for a free slot and claims it.
    ///
    /// Starts at the shared hint (staleness is fine) and walks the array at
    /// most once, retrying each slot up to [`MAX_SPURIOUS_RETRIES`] times on
    /// spurious CAS failures. Returns `None` once every slot has been
    /// probed without success.
    fn claim(&self) -> Option<usize> {
        let capacity = self.slots.len();
        let start = self.hint.load(Ordering::Relaxed);

        for probe in 0..capacity {
            let index = (start + probe) % capacity;

            for _ in 0..MAX_SPURIOUS_RETRIES {
                match self.slots[index].try_claim_weak() {
                    ClaimAttempt::Claimed => {
                        // Move the hint past the claimed slot. Relaxed: the
                        // hint is a performance knob, not a synchronization
                        // point.
                        self.hint
                            .store((index + 1) % capacity, Ordering::Relaxed);
                        return Some(index);
                    }
                    ClaimAttempt::Occupied => break,
                    ClaimAttempt::Spurious => continue,
                }
            }
        }

        None
    }

    /// Runs `init` and moves its result into the claimed slot `index`.
    ///
    /// If `init` returns an error or panics, the claim is undone before the
    /// error (or the unwind) leaves this function; a failed construction
    /// never strands a slot in the occupied state.
    fn construct_in<E>(
        &self,
        index: usize,
        init: impl FnOnce() -> Result<T, E>,
    ) -> Result<NonNull<T>, E> {
        struct Unclaim<'a, U> {
            pool: &'a Pool<U>,
            index: usize,
            armed: bool,
        }

        impl<U> Drop for Unclaim<'_, U> {
            fn drop(&mut self) {
                if self.armed {
                    self.pool.slots[self.index].release();
                }
            }
        }

        let mut unclaim = Unclaim {
            pool: self,
            index,
            armed: true,
        };

        let value = init()?;
        let data = self.slots[index].data_ptr();
        unsafe { data.write(value) };
        unclaim.armed = false;

        // Slot storage comes from a live boxed slice; never null.
        Ok(unsafe { NonNull::new_unchecked(data) })
    }

    /// Recovers a slot index from a payload pointer by subtraction against
    /// the array base. Constant time; validity of the input is the caller's
    /// contract.
    fn slot_index_of(&self, ptr: *const T) -> usize {
        let base = self.slots.as_ptr() as usize;
        let offset = (ptr as usize).wrapping_sub(base);
        debug_assert!(
            offset % mem::size_of::<Slot<T>>() == 0,
            "released pointer is not a slot base address",
        );
        offset / mem::size_of::<Slot<T>>()
    }
}

// All slot storage is coordinated through the per-slot atomic flag, and
// objects travel between threads through the array, so both impls need
// T: Send (nothing needs T: Sync, since the pool never shares a &T).
unsafe impl<T: Send> Send for Pool<T> {}
unsafe impl<T: Send> Sync for Pool<T> {}

impl<T> Drop for Pool<T> {
    fn drop(&mut self) {
        // Occupied slots at teardown mean a raw pointer leaked past the
        // pool's lifetime. Loudly in debug; in release the objects are
        // abandoned undestroyed, since a caller may still hold the pointer.
        #[cfg(debug_assertions)]
        {
            let occupied = self
                .slots
                .iter()
                .filter(|s| !s.is_free_relaxed())
                .count();
            assert!(
                occupied == 0,
                "pool dropped with {occupied} slot(s) still occupied",
            );
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.snapshot();
        f.debug_struct("Pool")
            .field("capacity", &stats.total)
            .field("used", &stats.used)
            .field("free", &stats.free)
            .finish()
    }
}
