//! Participants in an episode.
//!
//! Every participant implements [`Side`]: given the turn context it
//! produces raw reply text. The turn engine never inspects which variant it
//! is talking to; parsing and validation happen on the returned text.
//!
//! | Variant | Role | Source of replies |
//! |---|---|---|
//! | [`ModelSide`] | model | opaque responder over the conversation |
//! | [`InteractiveSide`] | human | one line read per prompt |
//! | [`SearchSide`] | programmatic | oracle best move |
//! | [`ScriptedSide`] | any | canned replies in order |

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use log::debug;

use crate::core::{Board, DiceSequence, LudoError, Position, Result, Roll, SideId, SideRole};
use crate::oracle::{AdversarialOracle, MinimaxConfig, SequenceOracle, SimState};
use crate::rules::{legal_moves, Move};

use super::conversation::Conversation;
use super::parser::MOVE_MARKER;

/// What a side sees when asked for a move.
#[derive(Clone, Copy, Debug)]
pub struct TurnContext<'a> {
    /// Side being asked.
    pub side: SideId,
    /// Turn index, starting at 0.
    pub turn: usize,
    /// This side's roll for the turn.
    pub roll: Roll,
    /// Failed replies so far this turn.
    pub attempt: u32,
    /// Live board before the move.
    pub board: &'a Board,
    /// The side's conversation, ending with the message to answer.
    pub conversation: &'a Conversation,
    /// The message to answer: the turn message or a correction.
    pub message: &'a str,
}

/// A participant that answers turn messages with raw text.
pub trait Side {
    /// What kind of participant this is.
    fn role(&self) -> SideRole;

    /// Reply to the current message.
    ///
    /// Errors are I/O faults of the participant, not bad moves; a bad move
    /// is just text the parser or rules reject.
    fn respond(&mut self, ctx: &TurnContext<'_>) -> Result<String>;
}

impl<S: Side + ?Sized> Side for Box<S> {
    fn role(&self) -> SideRole {
        (**self).role()
    }

    fn respond(&mut self, ctx: &TurnContext<'_>) -> Result<String> {
        (**self).respond(ctx)
    }
}

/// Model-backed side.
///
/// The responder receives the whole conversation and the turn index and
/// returns the model's reply.
pub struct ModelSide<F> {
    responder: F,
}

impl<F> ModelSide<F>
where
    F: FnMut(&Conversation, usize) -> Result<String>,
{
    pub fn new(responder: F) -> Self {
        Self { responder }
    }
}

impl<F> Side for ModelSide<F>
where
    F: FnMut(&Conversation, usize) -> Result<String>,
{
    fn role(&self) -> SideRole {
        SideRole::Model
    }

    fn respond(&mut self, ctx: &TurnContext<'_>) -> Result<String> {
        (self.responder)(ctx.conversation, ctx.turn)
    }
}

/// Human at a terminal: prints each message and reads one line.
pub struct InteractiveSide<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveSide<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl InteractiveSide<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Side reading from stdin and writing to stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Side for InteractiveSide<R, W> {
    fn role(&self) -> SideRole {
        SideRole::Human
    }

    fn respond(&mut self, ctx: &TurnContext<'_>) -> Result<String> {
        let io_error = |source| LudoError::SideIo {
            side: ctx.side.0,
            source,
        };

        writeln!(self.output, "{}", ctx.message).map_err(io_error)?;
        write!(self.output, "{} ", MOVE_MARKER).map_err(io_error)?;
        self.output.flush().map_err(io_error)?;

        let mut line = String::new();
        match self.input.read_line(&mut line).map_err(io_error)? {
            0 => Err(LudoError::EndOfInput),
            _ => {
                let answer = line.trim();
                // Accept both a bare clause list and a full move line.
                if answer.contains(MOVE_MARKER) {
                    Ok(answer.to_string())
                } else {
                    Ok(format!("{} {}", MOVE_MARKER, answer))
                }
            }
        }
    }
}

enum SearchOracle {
    Sequence(SequenceOracle),
    Adversarial(AdversarialOracle),
}

/// Programmatic side that always plays the oracle's best move.
///
/// With a single-side sequence it plays the sequence oracle's optimal move;
/// with paired rolls it plays the minimax best move against the other side.
pub struct SearchSide {
    oracle: SearchOracle,
}

impl SearchSide {
    /// Side for an episode over `dice` on `n_fields` fields.
    pub fn new(dice: &DiceSequence, n_fields: Position, config: MinimaxConfig) -> Result<Self> {
        let oracle = match dice {
            DiceSequence::Single(rolls) => {
                SearchOracle::Sequence(SequenceOracle::new(rolls.clone(), n_fields))
            }
            DiceSequence::Paired(_) => {
                SearchOracle::Adversarial(AdversarialOracle::from_sequence(dice, n_fields, config)?)
            }
        };
        Ok(Self { oracle })
    }

    /// Best move for `side` on `board` at `turn`.
    #[must_use]
    pub fn choose(&self, board: &Board, side: SideId, turn: usize, roll: Roll) -> Move {
        let chosen = match &self.oracle {
            SearchOracle::Sequence(oracle) => oracle.solve(board.positions(side), turn).next_move(),
            SearchOracle::Adversarial(oracle) => {
                oracle.search(&SimState::from_board(board, turn, side)).best_move
            }
        };
        // An unsolvable position still needs a legal reply.
        chosen.unwrap_or_else(|| {
            legal_moves(board.positions(side), roll, board.n_fields())
                .first()
                .copied()
                .unwrap_or(Move::Stay)
        })
    }
}

impl Side for SearchSide {
    fn role(&self) -> SideRole {
        SideRole::Programmatic
    }

    fn respond(&mut self, ctx: &TurnContext<'_>) -> Result<String> {
        let chosen = self.choose(ctx.board, ctx.side, ctx.turn, ctx.roll);
        debug!("{} search move at turn {}: {}", ctx.side, ctx.turn, chosen);
        let targets = chosen.apply(ctx.board.positions(ctx.side));
        Ok(format!("{} {}", MOVE_MARKER, targets))
    }
}

/// Replays canned replies in order.
#[derive(Clone, Debug)]
pub struct ScriptedSide {
    role: SideRole,
    replies: VecDeque<String>,
}

impl ScriptedSide {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            role: SideRole::Model,
            replies: replies.into_iter().map(Into::into).collect(),
        }
    }

    /// Report a different role.
    pub fn with_role(mut self, role: SideRole) -> Self {
        self.role = role;
        self
    }

    /// Replies not yet used.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl Side for ScriptedSide {
    fn role(&self) -> SideRole {
        self.role
    }

    fn respond(&mut self, _ctx: &TurnContext<'_>) -> Result<String> {
        self.replies.pop_front().ok_or(LudoError::EndOfInput)
    }
}
