//! # rust-ludo
//!
//! Turn engine and move oracles for a two-token race-board game played by
//! one or two sides (model, human, or programmatic).
//!
//! ## Design Principles
//!
//! 1. **Failures Are Values**: Unparseable replies and rule violations are
//!    returned as values and retried within a bounded budget. Exhausting
//!    the budget is a normal terminal status (`Aborted`), never a panic.
//!
//! 2. **Pre-Rolled Dice**: Every episode plays a fixed dice sequence that
//!    the sequence oracle has verified winnable before the episode starts.
//!
//! 3. **Oracles Are Pure**: Both solvers take state by value, allocate
//!    their memo tables per call, and run on explicit stacks.
//!
//! ## Modules
//!
//! - `core`: Sides, tokens, board, dice, RNG, configuration, errors
//! - `rules`: Move enumeration and the strict legality checker
//! - `oracle`: Sequence oracle (DP) and adversarial oracle (minimax)
//! - `engine`: Sides, reply parser, conversations, events, turn engine
//! - `instance`: Instance schema and solvable-instance generator
//! - `scoring`: Per-turn accuracy and episode metrics

pub mod core;
pub mod engine;
pub mod instance;
pub mod oracle;
pub mod rules;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    Board, DiceSequence, EpisodeConfig, GameRng, GameRngState, LudoError, Position, Result, Roll,
    SideId, SideMap, SideRole, TokenId, TokenPositions,
};

pub use crate::rules::{check_move, legal_moves, Move, Violation};

pub use crate::oracle::{
    AdversarialOracle, MinimaxConfig, SearchResult, SearchStats, SequenceOracle, SimState,
    Solution,
};

pub use crate::engine::{
    parse_move, Conversation, Episode, EpisodeEvent, EpisodeReport, EpisodeStatus, EventSink,
    InteractiveSide, LogSink, ModelSide, NullSink, ParseFailure, ScriptedSide, SearchSide, Side,
    Transcript, TurnContext,
};

pub use crate::instance::{
    Experiment, ExperimentConfig, GeneratorConfig, Instance, InstanceGenerator, InstanceSet,
};

pub use crate::scoring::{EpisodeScores, Scorer, TurnScore};
