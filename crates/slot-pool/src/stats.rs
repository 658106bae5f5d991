// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Point-in-time pool occupancy snapshot.
//!
//! A [`PoolStats`] is produced by a relaxed scan of the slot flags, so it is
//! eventually consistent: concurrent allocation may be reflected for some
//! slots and not others. `free + used == total` always holds because `used`
//! is derived from the scanned free count, not scanned separately.

/// Occupancy counts for one pool at (roughly) one instant.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PoolStats {
    /// Number of slots in the pool (the fixed capacity).
    pub total: usize,
    /// Slots observed free during the scan.
    pub free: usize,
    /// Slots observed occupied (`total - free`).
    pub used: usize,
    /// `used / total × 100`, in `[0.0, 100.0]`.
    pub utilization_percent: f64,
}

impl PoolStats {
    /// Builds a snapshot from a scanned free count.
    pub(crate) fn from_free_count(total: usize, free: usize) -> Self {
        let used = total - free;
        let utilization_percent = if total == 0 {
            // Construction forbids zero-capacity pools, but the formula must
            // never divide by zero.
            0.0
        } else {
            used as f64 / total as f64 * 100.0
        };
        Self {
            total,
            free,
            used,
            utilization_percent,
        }
    }

    /// Returns a one-line human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{}/{} slots in use ({:.1}% utilization, {} free)",
            self.used, self.total, self.utilization_percent, self.free,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pool() {
        let s = PoolStats::from_free_count(10, 10);
        assert_eq!(s.total, 10);
        assert_eq!(s.free, 10);
        assert_eq!(s.used, 0);
        assert_eq!(s.utilization_percent, 0.0);
    }

    #[test]
    fn test_half_full() {
        let s = PoolStats::from_free_count(10, 5);
        assert_eq!(s.used, 5);
        assert_eq!(s.utilization_percent, 50.0);
    }

    #[test]
    fn test_full_pool() {
        let s = PoolStats::from_free_count(8, 0);
        assert_eq!(s.used, 8);
        assert_eq!(s.utilization_percent, 100.0);
    }

    #[test]
    fn test_zero_total_does_not_divide() {
        let s = PoolStats::from_free_count(0, 0);
        assert_eq!(s.utilization_percent, 0.0);
    }

    #[test]
    fn test_counts_always_balance() {
        for total in 1..=32usize {
            for free in 0..=total {
                let s = PoolStats::from_free_count(total, free);
                assert_eq!(s.free + s.used, s.total);
            }
        }
    }

    #[test]
    fn test_summary() {
        let s = PoolStats::from_free_count(10, 5);
        let line = s.summary();
        assert!(line.contains("5/10"));
        assert!(line.contains("50.0%"));
    }

    #[test]
    fn test_serialize_json() {
        let s = PoolStats::from_free_count(4, 3);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"total\":4"));
        assert!(json.contains("\"used\":1"));
    }
}
