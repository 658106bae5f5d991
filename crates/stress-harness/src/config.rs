// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Workload configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! capacity = 1000
//! threads = 8
//! ops_per_thread = 5000
//! alloc_bias_percent = 70
//! max_held_per_thread = 50
//! seed = 42
//! ```

use crate::StressError;
use std::path::Path;

/// Parameters of one churn workload.
///
/// All fields have defaults, so a TOML file only needs to name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Slot count of the pool under test.
    pub capacity: usize,
    /// Number of worker threads churning the pool.
    pub threads: usize,
    /// Operations (allocation attempts or releases) per thread.
    pub ops_per_thread: usize,
    /// Percentage of operations that try to allocate; the rest release a
    /// held object. Workers always allocate when holding nothing.
    pub alloc_bias_percent: u8,
    /// Upper bound on objects a single worker holds at once; at the cap the
    /// worker releases instead of allocating.
    pub max_held_per_thread: usize,
    /// RNG seed. The per-thread stream is derived from this, so a fixed
    /// seed gives a reproducible operation mix (not a reproducible
    /// interleaving; the scheduler still owns that).
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            threads: 8,
            ops_per_thread: 5000,
            alloc_bias_percent: 70,
            max_held_per_thread: 50,
            seed: 42,
        }
    }
}

impl WorkloadConfig {
    /// Loads a workload from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, StressError> {
        let content = std::fs::read_to_string(path).map_err(|e| StressError::ConfigRead {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parses a workload from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, StressError> {
        toml::from_str(toml_str).map_err(|e| StressError::ConfigParse(e.to_string()))
    }

    /// Serialises the workload to TOML.
    pub fn to_toml(&self) -> Result<String, StressError> {
        toml::to_string_pretty(self).map_err(|e| StressError::ConfigParse(e.to_string()))
    }

    /// Checks that the workload is runnable.
    pub fn validate(&self) -> Result<(), StressError> {
        if self.capacity == 0 {
            return Err(StressError::InvalidWorkload("capacity must be at least 1".into()));
        }
        if self.threads == 0 {
            return Err(StressError::InvalidWorkload("threads must be at least 1".into()));
        }
        if self.ops_per_thread == 0 {
            return Err(StressError::InvalidWorkload(
                "ops_per_thread must be at least 1".into(),
            ));
        }
        if self.alloc_bias_percent > 100 {
            return Err(StressError::InvalidWorkload(
                "alloc_bias_percent must be in 0..=100".into(),
            ));
        }
        if self.max_held_per_thread == 0 {
            return Err(StressError::InvalidWorkload(
                "max_held_per_thread must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = WorkloadConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.capacity, 1000);
        assert_eq!(c.threads, 8);
    }

    #[test]
    fn test_from_toml_partial() {
        let c = WorkloadConfig::from_toml("threads = 2\ncapacity = 64\n").unwrap();
        assert_eq!(c.threads, 2);
        assert_eq!(c.capacity, 64);
        // Unnamed fields keep their defaults.
        assert_eq!(c.ops_per_thread, 5000);
    }

    #[test]
    fn test_toml_roundtrip() {
        let c = WorkloadConfig {
            capacity: 256,
            threads: 4,
            ops_per_thread: 100,
            alloc_bias_percent: 80,
            max_held_per_thread: 10,
            seed: 7,
        };
        let toml = c.to_toml().unwrap();
        let back = WorkloadConfig::from_toml(&toml).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(WorkloadConfig::from_toml("threads = \"many\"").is_err());
    }

    #[test]
    fn test_validate_rejects_degenerate_workloads() {
        let mut c = WorkloadConfig::default();
        c.capacity = 0;
        assert!(c.validate().is_err());

        let mut c = WorkloadConfig::default();
        c.threads = 0;
        assert!(c.validate().is_err());

        let mut c = WorkloadConfig::default();
        c.alloc_bias_percent = 101;
        assert!(c.validate().is_err());
    }
}
