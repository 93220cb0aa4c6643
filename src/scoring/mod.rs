//! Episode scoring: per-turn move accuracy against the oracles plus
//! episode-level speed, efficiency and error metrics.

pub mod scorer;

pub use scorer::{EpisodeScores, Scorer, TurnScore};
