// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # stress-harness
//!
//! A configurable churn workload for shaking out concurrency bugs in the
//! pool: many threads allocating, holding, and releasing against one shared
//! [`slot_pool::Pool`], with payload verification on every release and a
//! conservation check at the end.
//!
//! Meant to be run both as a plain test (fast parameters) and under
//! ThreadSanitizer with the CLI's `stress` subcommand (heavy parameters),
//! where any missing happens-before edge in the pool shows up as a reported
//! race.
//!
//! # Example
//! ```
//! use stress_harness::{run, WorkloadConfig};
//!
//! let config = WorkloadConfig {
//!     capacity: 32,
//!     threads: 2,
//!     ops_per_thread: 100,
//!     ..WorkloadConfig::default()
//! };
//!
//! let report = run(&config).unwrap();
//! assert!(report.balanced());
//! ```

mod config;
mod error;
mod report;
mod runner;

pub use config::WorkloadConfig;
pub use error::StressError;
pub use report::StressReport;
pub use runner::run;
