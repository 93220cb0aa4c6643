//! Optimal-move oracles.
//!
//! ## Overview
//!
//! - **Sequence oracle** (`SequenceOracle`): dynamic programming over one
//!   side's dice sequence. Decides whether the sequence is winnable, how
//!   many turns an optimal side needs, and which move is optimal from any
//!   partial state. Used to validate generated instances and to score
//!   single-side play.
//! - **Adversarial oracle** (`AdversarialOracle`): minimax with alpha-beta
//!   pruning over the shared dice sequence of two sides, with captures.
//!   Drives the programmatic adversary and scores two-side play.
//!
//! Oracles never touch live board state: every call takes state by value
//! and owns its memo table for the duration of the call only.
//!
//! ## Usage
//!
//! ```rust
//! use rust_ludo::core::{TokenId, TokenPositions};
//! use rust_ludo::oracle::SequenceOracle;
//!
//! let oracle = SequenceOracle::new(vec![6, 4, 5], 10);
//! let start = TokenPositions::at_home(&[TokenId('X')]);
//! let solution = oracle.solve(&start, 0);
//! assert_eq!(solution.min_moves(), Some(3));
//! ```

pub mod config;
pub mod minimax;
pub mod sequence;
pub mod state;
pub mod stats;

pub use config::MinimaxConfig;
pub use minimax::{AdversarialOracle, SearchResult, WIN_SCORE};
pub use sequence::{SequenceOracle, Solution, UNSOLVABLE};
pub use state::{SimState, MAXIMIZING_SIDE};
pub use stats::SearchStats;
