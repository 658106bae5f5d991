// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! One cell of the fixed slot array: raw storage plus an availability flag.
//!
//! The storage is uninitialized bytes sized and aligned for exactly one `T`;
//! the flag is the only locus of coordination for it. Whoever transitions the
//! flag from free to occupied owns the storage exclusively until the matching
//! release.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of a single weak compare-and-exchange claim attempt.
pub(crate) enum ClaimAttempt {
    /// The flag transitioned free → occupied; the caller now owns the storage.
    Claimed,
    /// Another owner holds the slot.
    Occupied,
    /// The CAS failed while the observed flag was still free. Weak CAS is
    /// allowed to do this; the caller may retry the same slot.
    Spurious,
}

/// A slot: storage first, flag second.
///
/// `repr(C)` pins the layout so the storage sits at offset zero: a pointer
/// to the contained `T` is also the slot's base address, which is what makes
/// constant-time pointer→index recovery possible on release.
#[repr(C)]
pub(crate) struct Slot<T> {
    storage: UnsafeCell<MaybeUninit<T>>,
    free: AtomicBool,
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            storage: UnsafeCell::new(MaybeUninit::uninit()),
            free: AtomicBool::new(true),
        }
    }

    /// Pointer to the slot's storage. Stable for the pool's lifetime; only
    /// valid to read as `T` while the slot is occupied and owned by the
    /// caller.
    pub(crate) fn data_ptr(&self) -> *mut T {
        self.storage.get().cast()
    }

    /// One weak CAS attempt to transition free → occupied.
    ///
    /// Success uses acquire-release ordering: acquire pairs with the previous
    /// owner's release store (so their destructor's writes are visible),
    /// release publishes this thread's claim. Failure is relaxed; it carries
    /// no synchronization.
    pub(crate) fn try_claim_weak(&self) -> ClaimAttempt {
        match self
            .free
            .compare_exchange_weak(true, false, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => ClaimAttempt::Claimed,
            Err(false) => ClaimAttempt::Occupied,
            Err(true) => ClaimAttempt::Spurious,
        }
    }

    /// Transition occupied → free with release ordering, pairing with the
    /// acquire of the next successful claim. The contained object must
    /// already have been destroyed (or never constructed).
    pub(crate) fn release(&self) {
        self.free.store(true, Ordering::Release);
    }

    /// Relaxed availability probe. Snapshot-only: the answer may be stale by
    /// the time the caller looks at it.
    pub(crate) fn is_free_relaxed(&self) -> bool {
        self.free.load(Ordering::Relaxed)
    }
}
