//! Oracle search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one top-level oracle call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// States whose children were generated.
    pub nodes_expanded: u64,

    /// Terminal or cutoff states evaluated.
    pub leaves: u64,

    /// Lookups answered by the memo/transposition table.
    pub table_hits: u64,

    /// Alpha-beta cutoffs taken.
    pub cutoffs: u64,

    /// Entries in the memo table at the end of the call.
    pub table_size: usize,

    /// Deepest explicit-stack depth reached.
    pub max_depth: usize,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record the current explicit-stack depth.
    pub fn observe_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }

    /// Calculate expanded nodes per second.
    #[must_use]
    pub fn nodes_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.nodes_expanded as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Fraction of table lookups that hit.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.table_hits + self.nodes_expanded;
        if lookups == 0 {
            0.0
        } else {
            self.table_hits as f64 / lookups as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SearchStats::new();
        assert_eq!(stats.nodes_expanded, 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_nodes_per_second() {
        let mut stats = SearchStats::new();
        stats.nodes_expanded = 1000;
        stats.time_us = 1_000_000;
        assert_eq!(stats.nodes_per_second(), 1000.0);
    }

    #[test]
    fn test_observe_depth_and_reset() {
        let mut stats = SearchStats::new();
        stats.observe_depth(4);
        stats.observe_depth(2);
        assert_eq!(stats.max_depth, 4);

        stats.reset();
        assert_eq!(stats, SearchStats::default());
    }
}
