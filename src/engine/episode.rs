//! The turn engine.
//!
//! An episode owns the board, the dice sequence, and one seat per side.
//! Each turn every side, in seat order, is shown the board and its roll
//! and asked for a move. Replies are parsed and checked against the strict
//! rules (no captures); rejected replies are re-asked with a correction
//! until the attempt budget runs out, which aborts the episode on the spot.
//!
//! ```text
//! SETUP -> IN_PROGRESS -> { WIN | LOSE | DRAW | ABORTED }
//! ```
//!
//! Terminal statuses are absorbing. After a complete turn the turn index
//! advances; reaching the turn limit (the sequence length) is a draw,
//! otherwise the primary side finishing is a win and any other side
//! finishing is a loss.
//!
//! The engine never consults the oracles: legality is all it checks.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    Board, DiceSequence, EpisodeConfig, LudoError, Result, SideId, TokenId, MAX_TOKENS,
};
use crate::instance::Instance;
use crate::rules::check_move;

use super::conversation::{correction_message, turn_message, Conversation, Role, FORMAT_CORRECTION};
use super::events::{EpisodeEvent, EpisodeMetadata, EventRecord, EventSink, LogSink, Transcript};
use super::parser::parse_move;
use super::side::{Side, TurnContext};

/// Where an episode stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeStatus {
    InProgress,
    /// The primary side finished.
    Win,
    /// Another side finished first.
    Lose,
    /// The turn limit was reached.
    Draw,
    /// A side used up its attempts without a legal move.
    Aborted,
}

impl EpisodeStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != EpisodeStatus::InProgress
    }
}

impl std::fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EpisodeStatus::InProgress => "IN_PROGRESS",
            EpisodeStatus::Win => "WIN",
            EpisodeStatus::Lose => "LOSE",
            EpisodeStatus::Draw => "DRAW",
            EpisodeStatus::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

/// Outcome of an episode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub status: EpisodeStatus,
    /// Board when the episode stopped.
    pub board: Board,
    /// Completed turns.
    pub turns_played: usize,
    /// Correction messages sent.
    pub reprompt_attempts: u32,
    pub parse_errors: u32,
    pub rule_errors: u32,
    pub accepted_moves: u32,
    pub transcript: Transcript,
}

impl EpisodeReport {
    /// Parse and rule errors together.
    #[must_use]
    pub fn errors(&self) -> u32 {
        self.parse_errors + self.rule_errors
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Counters {
    reprompt_attempts: u32,
    parse_errors: u32,
    rule_errors: u32,
    accepted_moves: u32,
}

struct Seat {
    side: Box<dyn Side>,
    conversation: Conversation,
}

/// One play-through of an instance.
pub struct Episode {
    config: EpisodeConfig,
    board: Board,
    dice: DiceSequence,
    seats: Vec<Seat>,
    turn: usize,
    status: EpisodeStatus,
    counters: Counters,
    transcript: Transcript,
    started: bool,
}

impl Episode {
    /// Set up an episode with one side per roll column.
    ///
    /// Fails on empty or invalid dice, a side count the dice do not match,
    /// or an invalid board.
    pub fn new(
        config: EpisodeConfig,
        n_fields: usize,
        n_tokens: usize,
        dice: DiceSequence,
        sides: Vec<Box<dyn Side>>,
    ) -> Result<Self> {
        if dice.is_empty() {
            return Err(LudoError::EmptySequence);
        }
        dice.validate()?;
        if dice.side_count() != sides.len() {
            return Err(LudoError::SideCountMismatch {
                dice: dice.side_count(),
                sides: sides.len(),
            });
        }
        let board = Board::new(n_fields, n_tokens, sides.len())?;

        let seats = sides
            .into_iter()
            .map(|side| Seat {
                side,
                conversation: Conversation::new(config.initial_prompt.clone()),
            })
            .collect();

        Ok(Self {
            config,
            board,
            dice,
            seats,
            turn: 0,
            status: EpisodeStatus::InProgress,
            counters: Counters::default(),
            transcript: Transcript::new(),
            started: false,
        })
    }

    /// Set up an episode for `instance`.
    pub fn from_instance(
        instance: &Instance,
        config: EpisodeConfig,
        sides: Vec<Box<dyn Side>>,
    ) -> Result<Self> {
        instance.validate()?;
        Self::new(
            config,
            usize::from(instance.n_fields),
            instance.n_tokens,
            instance.rolls.clone(),
            sides,
        )
    }

    #[must_use]
    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Index of the turn being played.
    #[must_use]
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Number of turns before a draw.
    #[must_use]
    pub fn turn_limit(&self) -> usize {
        self.dice.len()
    }

    #[must_use]
    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    /// Conversation of one side.
    #[must_use]
    pub fn conversation(&self, side: SideId) -> Option<&Conversation> {
        self.seats.get(side.index()).map(|seat| &seat.conversation)
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Play to a terminal status, logging events.
    pub fn run(self) -> Result<EpisodeReport> {
        self.run_with(&mut LogSink)
    }

    /// Play to a terminal status, also sending every event to `sink`.
    ///
    /// Errors are side I/O faults only; gameplay failures end the episode
    /// as `Aborted`.
    pub fn run_with<S: EventSink + ?Sized>(mut self, sink: &mut S) -> Result<EpisodeReport> {
        while !self.status.is_terminal() {
            self.play_turn(sink)?;
        }
        Ok(self.report())
    }

    /// Snapshot of the outcome so far.
    #[must_use]
    pub fn report(&self) -> EpisodeReport {
        EpisodeReport {
            status: self.status,
            board: self.board.clone(),
            turns_played: self.turn,
            reprompt_attempts: self.counters.reprompt_attempts,
            parse_errors: self.counters.parse_errors,
            rule_errors: self.counters.rule_errors,
            accepted_moves: self.counters.accepted_moves,
            transcript: self.transcript.clone(),
        }
    }

    /// Play one full turn: every side moves once, or the episode aborts.
    ///
    /// A no-op once the episode is over.
    pub fn play_turn<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<EpisodeStatus> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }
        if !self.started {
            self.start(sink);
        }

        info!("turn {} of {}", self.turn, self.turn_limit());
        let positions = self.board.sides().clone();
        self.emit(sink, None, EpisodeEvent::CurrentState { positions });

        for side in SideId::all(self.seats.len()) {
            if !self.play_side(side, sink)? {
                warn!("{} exhausted its attempts at turn {}, aborting", side, self.turn);
                return Ok(self.finish(sink, EpisodeStatus::Aborted));
            }
        }

        self.turn += 1;
        let status = self.evaluate_status();
        if status.is_terminal() {
            return Ok(self.finish(sink, status));
        }
        Ok(status)
    }

    fn start<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        self.started = true;
        let metadata = EpisodeMetadata {
            n_fields: self.board.n_fields(),
            n_tokens: self.board.n_tokens(),
            side_count: self.seats.len(),
            turn_limit: self.turn_limit(),
            attempt_limit: self.config.effective_attempt_limit(),
            reprompting: self.config.reprompting,
        };
        info!(
            "episode start: {} side(s) [{}], {} token(s), {} fields, {} turns",
            metadata.side_count,
            self.seats
                .iter()
                .map(|s| s.side.role().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            metadata.n_tokens,
            metadata.n_fields,
            metadata.turn_limit
        );
        self.emit(sink, None, EpisodeEvent::Metadata(metadata));
    }

    fn finish<S: EventSink + ?Sized>(&mut self, sink: &mut S, status: EpisodeStatus) -> EpisodeStatus {
        self.status = status;
        info!(
            "episode end: {} after {} turn(s), {} reprompt(s)",
            status, self.turn, self.counters.reprompt_attempts
        );
        self.emit(sink, None, EpisodeEvent::Status { status });
        status
    }

    /// Status after a completed turn.
    fn evaluate_status(&self) -> EpisodeStatus {
        if self.turn >= self.turn_limit() {
            return EpisodeStatus::Draw;
        }
        if self.board.is_finished(SideId::PRIMARY) {
            return EpisodeStatus::Win;
        }
        if SideId::all(self.seats.len()).any(|s| !s.is_primary() && self.board.is_finished(s)) {
            return EpisodeStatus::Lose;
        }
        EpisodeStatus::InProgress
    }

    /// Ask one side until it plays a legal move or runs out of attempts.
    ///
    /// Returns whether a move was accepted.
    fn play_side<S: EventSink + ?Sized>(&mut self, side: SideId, sink: &mut S) -> Result<bool> {
        let roll = self
            .dice
            .roll(self.turn, side)
            .ok_or(LudoError::SideCountMismatch {
                dice: self.dice.side_count(),
                sides: self.seats.len(),
            })?;
        let limit = self.config.effective_attempt_limit();
        let n_fields = self.board.n_fields();
        let tokens: SmallVec<[TokenId; MAX_TOKENS]> = self.board.positions(side).tokens().collect();

        let mut message = turn_message(&self.board, self.turn, roll);
        self.seats[side.index()].conversation.push(Role::User, message.clone());
        self.emit(sink, Some(side), EpisodeEvent::SendMessage { content: message.clone() });

        let mut attempt = 0;
        loop {
            let seat = &mut self.seats[side.index()];
            let reply = seat.side.respond(&TurnContext {
                side,
                turn: self.turn,
                roll,
                attempt,
                board: &self.board,
                conversation: &seat.conversation,
                message: &message,
            })?;
            self.emit(sink, Some(side), EpisodeEvent::GetMessage { content: reply.clone() });

            let correction = match parse_move(&reply, &tokens) {
                Ok(targets) => {
                    self.emit(sink, Some(side), EpisodeEvent::Parse { targets: targets.clone() });
                    let before = self.board.positions(side).clone();
                    match check_move(&before, &targets, roll, n_fields) {
                        Ok(()) => {
                            self.board.apply(side, &targets);
                            let after = self.board.positions(side).clone();
                            self.seats[side.index()].conversation.push(Role::Assistant, reply);
                            self.counters.accepted_moves += 1;
                            self.emit(
                                sink,
                                Some(side),
                                EpisodeEvent::AcceptedMove { roll, before, after },
                            );
                            return Ok(true);
                        }
                        Err(violation) => {
                            self.counters.rule_errors += 1;
                            self.emit(sink, Some(side), EpisodeEvent::Error { violation });
                            correction_message(&violation)
                        }
                    }
                }
                Err(failure) => {
                    self.counters.parse_errors += 1;
                    self.emit(sink, Some(side), EpisodeEvent::ParseFailed { failure });
                    FORMAT_CORRECTION.to_string()
                }
            };

            attempt += 1;
            if attempt >= limit {
                return Ok(false);
            }

            self.counters.reprompt_attempts += 1;
            self.emit(sink, Some(side), EpisodeEvent::Reprompt { attempt });
            self.seats[side.index()].conversation.push(Role::User, correction.clone());
            self.emit(sink, Some(side), EpisodeEvent::SendMessage { content: correction.clone() });
            message = correction;
        }
    }

    fn emit<S: EventSink + ?Sized>(&mut self, sink: &mut S, side: Option<SideId>, event: EpisodeEvent) {
        let record = EventRecord {
            turn: self.turn,
            side,
            event,
        };
        self.transcript.record(&record);
        sink.record(&record);
    }
}
