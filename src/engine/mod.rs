//! Turn engine: sides, reply parsing, conversations, events, and the
//! episode state machine.
//!
//! ## Usage
//!
//! ```rust
//! use rust_ludo::core::{DiceSequence, EpisodeConfig};
//! use rust_ludo::engine::{Episode, EpisodeStatus, NullSink, ScriptedSide, Side};
//!
//! let sides: Vec<Box<dyn Side>> = vec![Box::new(ScriptedSide::new([
//!     "MY MOVE: X -> 1",
//!     "MY MOVE: X -> 5",
//!     "MY MOVE: X -> 10",
//! ]))];
//! let dice = DiceSequence::single(vec![6, 4, 5, 2]).unwrap();
//! let episode = Episode::new(EpisodeConfig::default(), 10, 1, dice, sides).unwrap();
//!
//! let report = episode.run_with(&mut NullSink).unwrap();
//! assert_eq!(report.status, EpisodeStatus::Win);
//! ```

pub mod conversation;
pub mod episode;
pub mod events;
pub mod parser;
pub mod side;

pub use conversation::{correction_message, turn_message, Conversation, Message, Role, FORMAT_CORRECTION};
pub use episode::{Episode, EpisodeReport, EpisodeStatus};
pub use events::{EpisodeEvent, EpisodeMetadata, EventRecord, EventSink, LogSink, NullSink, Transcript};
pub use parser::{parse_move, ParseFailure, MOVE_MARKER};
pub use side::{InteractiveSide, ModelSide, ScriptedSide, SearchSide, Side, TurnContext};
