// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # pool-registry
//!
//! Process-wide, per-type pools on top of [`slot_pool`].
//!
//! Some programs want exactly one pool per object type, reachable from
//! anywhere, without threading a pool reference through every call site.
//! This crate provides that as a thin layer: a type opts in with
//! [`register_pool!`], which installs a lazily-initialized global
//! `Pool<T>`, constructed on first use and never torn down (teardown order
//! against user code holding raw pointers is not a solvable problem, so the
//! pool simply lives for the whole process).
//!
//! The core pool does not know this layer exists; a `Pool` is still an
//! ordinary value with an explicit lifetime, and code that wants one can
//! ignore this crate entirely.
//!
//! # Example
//! ```
//! use pool_registry::{alloc_scoped, pool_stats, register_pool};
//!
//! struct Connection {
//!     id: u32,
//! }
//!
//! register_pool!(Connection, 64);
//!
//! let conn = alloc_scoped(|| Connection { id: 7 }).unwrap();
//! assert_eq!(conn.id, 7);
//! assert_eq!(pool_stats::<Connection>().total, 64);
//! ```

pub use slot_pool::{Pool, PoolStats, Pooled};

/// A type with a registered process-wide pool.
///
/// Implemented by [`register_pool!`]; rarely implemented by hand.
pub trait PooledType: Send + Sized + 'static {
    /// Slot count of the global pool for this type.
    const CAPACITY: usize;

    /// The global pool, constructed on first access.
    fn pool() -> &'static Pool<Self>;
}

/// Registers a process-wide pool for `$ty` with `$capacity` slots.
///
/// Expands to a [`PooledType`] impl backed by a `OnceLock` static: the pool
/// is built the first time any global helper touches it and is never
/// dropped.
#[macro_export]
macro_rules! register_pool {
    ($ty:ty, $capacity:expr) => {
        impl $crate::PooledType for $ty {
            const CAPACITY: usize = $capacity;

            fn pool() -> &'static $crate::Pool<Self> {
                static POOL: ::std::sync::OnceLock<$crate::Pool<$ty>> =
                    ::std::sync::OnceLock::new();
                POOL.get_or_init(|| $crate::new_registered_pool::<$ty>($capacity))
            }
        }
    };
}

/// Constructs the pool behind a [`register_pool!`] registration.
#[doc(hidden)]
pub fn new_registered_pool<T>(capacity: usize) -> Pool<T> {
    tracing::debug!(
        capacity,
        type_name = std::any::type_name::<T>(),
        "initializing global pool",
    );
    Pool::new(capacity)
}

/// Allocates from `T`'s global pool, returning a scoped handle.
///
/// `None` means the global pool is exhausted.
pub fn alloc_scoped<T: PooledType>(init: impl FnOnce() -> T) -> Option<Pooled<'static, T>> {
    T::pool().allocate_scoped(init)
}

/// Fallible-initializer variant of [`alloc_scoped`]; errors are swallowed
/// into `None`, matching the scoped form's contract.
pub fn try_alloc_scoped<T: PooledType, E>(
    init: impl FnOnce() -> Result<T, E>,
) -> Option<Pooled<'static, T>> {
    T::pool().try_allocate_scoped(init)
}

/// Allocates from `T`'s global pool, returning a raw pointer (null when
/// exhausted). Pair with [`free_raw`].
pub fn alloc_raw<T: PooledType>(init: impl FnOnce() -> T) -> *mut T {
    T::pool().allocate_raw(init)
}

/// Fallible-initializer variant of [`alloc_raw`]; initializer errors are
/// propagated, exhaustion is still `Ok(null)`.
pub fn try_alloc_raw<T: PooledType, E>(
    init: impl FnOnce() -> Result<T, E>,
) -> Result<*mut T, E> {
    T::pool().try_allocate_raw(init)
}

/// Returns a pointer obtained from [`alloc_raw`] / [`try_alloc_raw`] to
/// `T`'s global pool. Null is a no-op.
///
/// # Safety
/// Same contract as [`Pool::release_raw`]: the pointer must come from this
/// type's global pool and must not have been released already.
pub unsafe fn free_raw<T: PooledType>(ptr: *mut T) {
    unsafe { T::pool().release_raw(ptr) }
}

/// Occupancy snapshot of `T`'s global pool.
pub fn pool_stats<T: PooledType>() -> PoolStats {
    T::pool().snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct Foo {
        value: i32,
        name: String,
    }

    struct Bar {
        data: [f64; 10],
        counter: i32,
    }

    // Registered for exactly one test: the test harness runs tests
    // concurrently, so exact occupancy assertions need a private pool.
    struct Qux {
        data: [f64; 10],
        counter: i32,
    }

    register_pool!(Foo, 1000);
    register_pool!(Bar, 500);
    register_pool!(Qux, 250);

    #[test]
    fn test_scoped_and_raw_roundtrip() {
        let foo = alloc_scoped(|| Foo {
            value: 42,
            name: "global".into(),
        })
        .unwrap();
        assert_eq!(foo.value, 42);
        assert_eq!(foo.name, "global");

        let raw = alloc_raw(|| Foo {
            value: 100,
            name: "fast".into(),
        });
        assert!(!raw.is_null());
        unsafe {
            assert_eq!((*raw).value, 100);
            free_raw(raw);
        }
    }

    #[test]
    fn test_registered_capacities() {
        assert_eq!(Foo::CAPACITY, 1000);
        assert_eq!(pool_stats::<Foo>().total, 1000);
        assert_eq!(pool_stats::<Bar>().total, 500);
    }

    #[test]
    fn test_types_get_distinct_pools() {
        let qux = alloc_scoped(|| Qux {
            data: [1.5; 10],
            counter: 3,
        })
        .unwrap();
        assert_eq!(qux.counter, 3);
        assert_eq!(qux.data[9], 1.5);

        // Qux traffic is invisible to every other registered pool.
        assert_eq!(pool_stats::<Qux>().used, 1);
        assert_eq!(pool_stats::<Qux>().total, 250);
    }

    #[test]
    fn test_fallible_initializer() {
        let err: Result<*mut Bar, &str> = try_alloc_raw(|| Err("nope"));
        assert_eq!(err.unwrap_err(), "nope");

        assert!(try_alloc_scoped::<Bar, &str>(|| Err("nope")).is_none());

        // The failures cost nothing; a real allocation still goes through.
        let bar = try_alloc_scoped::<Bar, &str>(|| {
            Ok(Bar {
                data: [2.0; 10],
                counter: 1,
            })
        })
        .unwrap();
        assert_eq!(bar.counter, 1);
        assert_eq!(bar.data[0], 2.0);
    }

    #[test]
    fn test_concurrent_global_access() {
        let successes = AtomicUsize::new(0);

        thread::scope(|s| {
            for t in 0..4 {
                let successes = &successes;
                s.spawn(move || {
                    for i in 0..50 {
                        if let Some(foo) = alloc_scoped(|| Foo {
                            value: t * 100 + i,
                            name: format!("thread_{t}"),
                        }) {
                            assert_eq!(foo.value, t * 100 + i);
                            successes.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert!(successes.load(Ordering::Relaxed) > 0);
    }
}
