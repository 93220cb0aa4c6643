//! Error types for setup and I/O faults.
//!
//! Gameplay outcomes (parse failures, rule violations, aborted episodes,
//! unsolvable dice sequences) are values, not errors. `LudoError` only
//! covers defects in instance data, configuration, and side I/O.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LudoError {
    #[error("invalid roll {roll} at turn {turn} (must be 1-6)")]
    InvalidRoll { turn: usize, roll: u8 },

    #[error("board must have between 2 and 255 fields, got {n_fields}")]
    InvalidBoardSize { n_fields: usize },

    #[error("a side owns 1 or 2 tokens, got {n_tokens}")]
    InvalidTokenCount { n_tokens: usize },

    #[error("an episode has 1 or 2 sides, got {sides}")]
    InvalidSideCount { sides: usize },

    #[error("token {token} placed on field {position} of a {n_fields}-field board")]
    InvalidPosition {
        token: char,
        position: u8,
        n_fields: usize,
    },

    #[error("dice sequence rolls for {dice} side(s) but the episode has {sides}")]
    SideCountMismatch { dice: usize, sides: usize },

    #[error("per-side dice sequences differ in length: {first} vs {second}")]
    SequenceLengthMismatch { first: usize, second: usize },

    #[error("dice sequence is empty")]
    EmptySequence,

    #[error("unknown side role '{role}' (expected model, human or programmatic)")]
    UnknownRole { role: String },

    #[error("no solvable dice sequence of length {n_rolls} for {n_fields} fields after {attempts} samples")]
    NoSolvableSequence {
        n_rolls: usize,
        n_fields: usize,
        attempts: u32,
    },

    #[error("side {side} failed to respond: {source}")]
    SideIo {
        side: u8,
        #[source]
        source: std::io::Error,
    },

    #[error("interactive side reached end of input")]
    EndOfInput,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("binary serialization error: {0}")]
    Binary(#[from] bincode::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LudoError>;
