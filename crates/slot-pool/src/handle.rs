// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scoped owning handle that returns its slot to the pool on drop.
//!
//! [`Pooled`] is the safe face of the pool. Dropping it, on any exit path
//! including unwinding, runs the contained object's destructor and then
//! publishes the slot as free. The borrow checker ties the handle's lifetime
//! to the pool, so a handle can never outlive the storage it points into.

use crate::pool::Pool;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// An owning handle to one occupied slot of a [`Pool`].
///
/// Obtained from [`Pool::allocate_scoped`] or [`Pool::try_allocate_scoped`].
/// Dereferences to the contained `T`. Not cloneable: each handle is the
/// unique owner of its slot. Moving the handle transfers that ownership;
/// there is no moved-from state to worry about.
///
/// # Example
/// ```
/// use slot_pool::Pool;
///
/// let pool: Pool<u32> = Pool::new(4);
/// let mut value = pool.allocate_scoped(|| 41).unwrap();
/// *value += 1;
/// assert_eq!(*value, 42);
/// drop(value);                       // slot destroyed and released here
/// assert_eq!(pool.snapshot().used, 0);
/// ```
pub struct Pooled<'pool, T> {
    pool: &'pool Pool<T>,
    ptr: NonNull<T>,
}

impl<'pool, T> Pooled<'pool, T> {
    pub(crate) fn new(pool: &'pool Pool<T>, ptr: NonNull<T>) -> Self {
        Self { pool, ptr }
    }

    /// Returns the raw pointer without giving up ownership.
    ///
    /// Associated function (call as `Pooled::as_ptr(&handle)`) so it cannot
    /// shadow a method on `T` through deref.
    pub fn as_ptr(this: &Self) -> *mut T {
        this.ptr.as_ptr()
    }

    /// Consumes the handle and hands its slot to the raw API.
    ///
    /// The object is *not* destroyed; the caller takes over ownership and
    /// must eventually pass the pointer to [`Pool::release_raw`] on the same
    /// pool, exactly once.
    pub fn into_raw(this: Self) -> *mut T {
        let ptr = this.ptr.as_ptr();
        std::mem::forget(this);
        ptr
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // The handle is the unique owner of an occupied slot, so the storage
        // holds a live T for as long as the handle does.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { self.ptr.as_mut() }
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        // Destroy-before-release, in one step: the pointer came from this
        // pool's slot array and is released exactly once, here.
        unsafe { self.pool.release_raw(self.ptr.as_ptr()) };
    }
}

// The handle moves its T between threads when it moves, so Send needs
// T: Send. Shared references through the handle need T: Sync.
unsafe impl<T: Send> Send for Pooled<'_, T> {}
unsafe impl<T: Sync> Sync for Pooled<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Pooled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&**self).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_drop_runs_destructor_and_frees_slot() {
        let drops = Arc::new(AtomicUsize::new(0));
        let pool: Pool<DropCounter> = Pool::new(2);

        let handle = pool
            .allocate_scoped(|| DropCounter(Arc::clone(&drops)))
            .unwrap();
        assert_eq!(pool.snapshot().used, 1);
        assert_eq!(drops.load(Ordering::Relaxed), 0);

        drop(handle);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
        assert_eq!(pool.snapshot().used, 0);
    }

    #[test]
    fn test_deref_and_deref_mut() {
        let pool: Pool<Vec<u8>> = Pool::new(1);
        let mut handle = pool.allocate_scoped(|| vec![1, 2, 3]).unwrap();

        assert_eq!(handle.len(), 3);
        handle.push(4);
        assert_eq!(*handle, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_move_transfers_ownership() {
        let pool: Pool<u64> = Pool::new(3);
        let handle = pool.allocate_scoped(|| 7).unwrap();

        // Move into a container and keep using it through the new owner.
        let mut held = Vec::new();
        held.push(handle);
        assert_eq!(*held[0], 7);

        held.clear();
        assert_eq!(pool.snapshot().used, 0);
    }

    #[test]
    fn test_into_raw_defers_destruction() {
        let drops = Arc::new(AtomicUsize::new(0));
        let pool: Pool<DropCounter> = Pool::new(1);

        let handle = pool
            .allocate_scoped(|| DropCounter(Arc::clone(&drops)))
            .unwrap();
        let raw = Pooled::into_raw(handle);

        // Ownership has escaped the handle: nothing was destroyed yet.
        assert_eq!(drops.load(Ordering::Relaxed), 0);
        assert_eq!(pool.snapshot().used, 1);

        unsafe { pool.release_raw(raw) };
        assert_eq!(drops.load(Ordering::Relaxed), 1);
        assert_eq!(pool.snapshot().used, 0);
    }

    #[test]
    fn test_debug_format() {
        let pool: Pool<u32> = Pool::new(1);
        let handle = pool.allocate_scoped(|| 9).unwrap();
        assert_eq!(format!("{handle:?}"), "Pooled(9)");
    }
}
