//! Adversarial oracle configuration.

use serde::{Deserialize, Serialize};

/// Minimax search parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimaxConfig {
    /// Alpha-beta pruning. Disabling it gives the plain minimax reference.
    pub pruning: bool,

    /// Reuse results for repeated `(positions, turn, side)` states within
    /// one call. The table never outlives the call.
    pub transposition_table: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            pruning: true,
            transposition_table: true,
        }
    }
}

impl MinimaxConfig {
    /// Plain minimax without pruning or table: the reference search.
    pub fn exhaustive() -> Self {
        Self {
            pruning: false,
            transposition_table: false,
        }
    }

    /// Enable or disable alpha-beta pruning.
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    /// Enable or disable the transposition table.
    pub fn with_transposition_table(mut self, enabled: bool) -> Self {
        self.transposition_table = enabled;
        self
    }
}
