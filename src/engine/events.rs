//! Episode events and sinks.
//!
//! The turn engine reports everything it does as an [`EpisodeEvent`],
//! tagged with the turn index and the side concerned. Events carry enough
//! payload (placements before and after, violation kind, accepted targets)
//! for a scorer to replay the episode without re-deriving state.
//!
//! ## Sinks
//!
//! - [`Transcript`]: in-memory record, cheap to clone, serializable
//! - [`LogSink`]: forwards every event to the `log` facade
//! - [`NullSink`]: discards events

use im::Vector;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::{LudoError, Position, Result, Roll, SideId, SideMap, TokenPositions};
use crate::rules::Violation;

use super::episode::EpisodeStatus;
use super::parser::ParseFailure;

/// Static facts about an episode, emitted once at setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeMetadata {
    pub n_fields: Position,
    pub n_tokens: usize,
    pub side_count: usize,
    pub turn_limit: usize,
    pub attempt_limit: u32,
    pub reprompting: bool,
}

/// Something the turn engine did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeEvent {
    /// Episode parameters.
    Metadata(EpisodeMetadata),
    /// Placement of every side at the start of a turn.
    CurrentState { positions: SideMap<TokenPositions> },
    /// Message delivered to a side.
    SendMessage { content: String },
    /// Raw reply received from a side.
    GetMessage { content: String },
    /// Reply parsed into targets.
    Parse { targets: TokenPositions },
    /// Reply did not match the move grammar.
    ParseFailed { failure: ParseFailure },
    /// Parsed move rejected by the rules.
    Error { violation: Violation },
    /// Move accepted and applied.
    AcceptedMove {
        roll: Roll,
        before: TokenPositions,
        after: TokenPositions,
    },
    /// Turn re-asked; `attempt` counts failed replies so far this turn.
    Reprompt { attempt: u32 },
    /// Episode reached a terminal status.
    Status { status: EpisodeStatus },
}

impl EpisodeEvent {
    /// Short event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EpisodeEvent::Metadata(_) => "metadata",
            EpisodeEvent::CurrentState { .. } => "current state",
            EpisodeEvent::SendMessage { .. } => "send message",
            EpisodeEvent::GetMessage { .. } => "get message",
            EpisodeEvent::Parse { .. } => "parse",
            EpisodeEvent::ParseFailed { .. } => "parse failed",
            EpisodeEvent::Error { .. } => "error",
            EpisodeEvent::AcceptedMove { .. } => "accepted move",
            EpisodeEvent::Reprompt { .. } => "reprompt",
            EpisodeEvent::Status { .. } => "status",
        }
    }
}

/// An event with its turn and side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub turn: usize,
    /// `None` for episode-wide events.
    pub side: Option<SideId>,
    pub event: EpisodeEvent,
}

/// Receiver of episode events, called in turn order.
pub trait EventSink {
    fn record(&mut self, record: &EventRecord);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _record: &EventRecord) {}
}

/// Forwards events to the `log` facade.
///
/// Rejections and reprompts go out at `warn`, terminal statuses at `info`,
/// everything else at `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, record: &EventRecord) {
        let side = record
            .side
            .map_or_else(|| "episode".to_string(), |s| s.to_string());
        match &record.event {
            EpisodeEvent::Error { violation } => {
                warn!("turn {} {}: rejected move ({})", record.turn, side, violation)
            }
            EpisodeEvent::ParseFailed { failure } => {
                warn!("turn {} {}: unparseable reply ({})", record.turn, side, failure)
            }
            EpisodeEvent::Reprompt { attempt } => {
                warn!("turn {} {}: reprompting, attempt {}", record.turn, side, attempt)
            }
            EpisodeEvent::Status { status } => {
                info!("turn {}: episode finished with {}", record.turn, status)
            }
            other => debug!("turn {} {}: {}", record.turn, side, other.name()),
        }
    }
}

/// In-memory event record.
///
/// Backed by a persistent vector so a finished transcript can be cloned
/// into a scoring pass without copying.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    records: Vector<EventRecord>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Records of one side.
    pub fn for_side(&self, side: SideId) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().filter(move |r| r.side == Some(side))
    }

    /// Records of one turn.
    pub fn for_turn(&self, turn: usize) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().filter(move |r| r.turn == turn)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(LudoError::from)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(LudoError::from)
    }
}

impl EventSink for Transcript {
    fn record(&mut self, record: &EventRecord) {
        self.records.push_back(record.clone());
    }
}
