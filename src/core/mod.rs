//! Core types: sides, tokens, board, dice, RNG, configuration, errors.
//!
//! Everything here is plain data with invariants; the rules, oracles and
//! turn engine build on it.

pub mod board;
pub mod config;
pub mod dice;
pub mod error;
pub mod rng;
pub mod side;
pub mod token;

pub use board::{Board, DEFAULT_FIELDS};
pub use config::{EpisodeConfig, SideRole, DEFAULT_ATTEMPT_LIMIT, DEFAULT_PROMPT};
pub use dice::{DiceSequence, Roll, DIE_FACES, ENTRY_ROLL};
pub use error::{LudoError, Result};
pub use rng::{GameRng, GameRngState};
pub use side::{SideId, SideMap, MAX_SIDES};
pub use token::{Position, TokenId, TokenPositions, ENTRY_FIELD, HOME, MAX_TOKENS};
