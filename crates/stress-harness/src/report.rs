// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Outcome of one churn workload run.

use slot_pool::PoolStats;

/// Totals and final pool state for a completed workload.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StressReport {
    /// Worker thread count.
    pub threads: usize,
    /// Operations attempted per thread.
    pub ops_per_thread: usize,
    /// Successful allocations across all threads.
    pub allocations: u64,
    /// Allocation attempts refused because the pool was full.
    pub exhaustions: u64,
    /// Objects released back to the pool (including the end-of-run drain).
    pub releases: u64,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
    /// Pool snapshot taken after all workers joined.
    pub final_stats: PoolStats,
}

impl StressReport {
    /// True when every allocation was matched by a release and the pool
    /// ended empty: the conservation property the workload exists to
    /// exercise.
    pub fn balanced(&self) -> bool {
        self.allocations == self.releases && self.final_stats.used == 0
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{} threads x {} ops in {} ms: {} allocations, {} exhaustions, \
             {} releases, final pool {}",
            self.threads,
            self.ops_per_thread,
            self.duration_ms,
            self.allocations,
            self.exhaustions,
            self.releases,
            self.final_stats.summary(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(allocations: u64, releases: u64, used: usize) -> StressReport {
        let total = 8;
        StressReport {
            threads: 2,
            ops_per_thread: 10,
            allocations,
            exhaustions: 0,
            releases,
            duration_ms: 1,
            final_stats: PoolStats {
                total,
                free: total - used,
                used,
                utilization_percent: used as f64 / total as f64 * 100.0,
            },
        }
    }

    #[test]
    fn test_balanced() {
        assert!(report(10, 10, 0).balanced());
        assert!(!report(10, 9, 1).balanced());
        assert!(!report(10, 10, 1).balanced());
    }

    #[test]
    fn test_summary_mentions_totals() {
        let s = report(10, 10, 0).summary();
        assert!(s.contains("10 allocations"));
        assert!(s.contains("2 threads"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serde_json::to_string(&report(5, 5, 0)).unwrap();
        assert!(json.contains("\"allocations\":5"));
        assert!(json.contains("\"final_stats\""));
    }
}
