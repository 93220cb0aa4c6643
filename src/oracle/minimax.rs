//! Adversarial oracle: minimax with alpha-beta pruning.
//!
//! Both sides play the same fixed dice sequence: side `s` rolls
//! `rolls[turn][s]`. The search runs until a side has finished or the rolls
//! run out, so its depth is bounded by the sequence, not by a ply limit.
//!
//! Values are measured for [`MAXIMIZING_SIDE`]:
//! - `+100` when it has finished
//! - `-100` when its opponent has finished
//! - otherwise its summed token positions minus the opponent's
//!
//! The search runs on an explicit stack of frames. An optional
//! transposition table, local to each call, stores fail-soft results with
//! their bound type so pruned and unpruned searches agree on every value.
//!
//! Ties keep the first move in enumeration order with a strictly better
//! value; callers comparing moves should compare values on ties.

use std::time::Instant;

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{DiceSequence, LudoError, Position, Result, Roll};
use crate::rules::{legal_moves, Move, MoveList};

use super::config::MinimaxConfig;
use super::state::{SimState, MAXIMIZING_SIDE};
use super::stats::SearchStats;

/// Value of a finished game.
pub const WIN_SCORE: i32 = 100;

/// Outcome of one oracle call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Minimax value for the maximizing side.
    pub value: i32,

    /// Best move for the side to move; `None` at a terminal state.
    pub best_move: Option<Move>,

    /// Search statistics.
    pub stats: SearchStats,
}

/// How a stored value relates to the true value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bound {
    Exact,
    /// True value is at least the stored one.
    Lower,
    /// True value is at most the stored one.
    Upper,
}

#[derive(Clone, Copy, Debug)]
struct TableEntry {
    value: i32,
    bound: Bound,
}

/// A state being searched.
struct Frame {
    state: SimState,
    moves: MoveList,
    next: usize,
    maximizing: bool,
    alpha: i32,
    beta: i32,
    alpha_orig: i32,
    beta_orig: i32,
    best_value: i32,
    best_move: Option<Move>,
}

impl Frame {
    fn new(state: SimState, moves: MoveList, alpha: i32, beta: i32) -> Self {
        let maximizing = state.to_move == MAXIMIZING_SIDE;
        Self {
            state,
            moves,
            next: 0,
            maximizing,
            alpha,
            beta,
            alpha_orig: alpha,
            beta_orig: beta,
            best_value: if maximizing { i32::MIN } else { i32::MAX },
            best_move: None,
        }
    }

    /// Fold the value of the child reached by `moves[next - 1]`.
    ///
    /// Returns true when the remaining moves can be pruned.
    fn absorb(&mut self, value: i32, pruning: bool) -> bool {
        let m = self.moves[self.next - 1];
        if self.maximizing {
            if value > self.best_value {
                self.best_value = value;
                self.best_move = Some(m);
            }
            if pruning {
                self.alpha = self.alpha.max(self.best_value);
            }
        } else {
            if value < self.best_value {
                self.best_value = value;
                self.best_move = Some(m);
            }
            if pruning {
                self.beta = self.beta.min(self.best_value);
            }
        }
        pruning && self.alpha >= self.beta
    }

    fn bound(&self) -> Bound {
        if self.best_value <= self.alpha_orig {
            Bound::Upper
        } else if self.best_value >= self.beta_orig {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

/// Minimax solver for two-side episodes.
#[derive(Clone, Debug)]
pub struct AdversarialOracle {
    rolls: Vec<[Roll; 2]>,
    n_fields: Position,
    config: MinimaxConfig,
}

impl AdversarialOracle {
    /// Create an oracle over paired rolls.
    pub fn new(rolls: Vec<[Roll; 2]>, n_fields: Position, config: MinimaxConfig) -> Self {
        Self {
            rolls,
            n_fields,
            config,
        }
    }

    /// Create an oracle from an episode's dice sequence.
    ///
    /// Fails for single-side sequences.
    pub fn from_sequence(
        sequence: &DiceSequence,
        n_fields: Position,
        config: MinimaxConfig,
    ) -> Result<Self> {
        match sequence {
            DiceSequence::Paired(rolls) => Ok(Self::new(rolls.clone(), n_fields, config)),
            DiceSequence::Single(_) => Err(LudoError::SideCountMismatch { dice: 1, sides: 2 }),
        }
    }

    /// Search configuration.
    #[must_use]
    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    /// Whether the search stops at `state`.
    #[must_use]
    pub fn is_terminal(&self, state: &SimState) -> bool {
        state.turn >= self.rolls.len()
            || state
                .positions
                .side_ids()
                .any(|side| state.is_finished(side, self.n_fields))
    }

    /// Static value of `state` for the maximizing side.
    #[must_use]
    pub fn evaluate(&self, state: &SimState) -> i32 {
        let opponent = MAXIMIZING_SIDE.opponent();
        if state.is_finished(MAXIMIZING_SIDE, self.n_fields) {
            return WIN_SCORE;
        }
        if state.is_finished(opponent, self.n_fields) {
            return -WIN_SCORE;
        }
        state.positions[MAXIMIZING_SIDE].progress() as i32
            - state.positions[opponent].progress() as i32
    }

    /// Moves for the side to move; `Stay` alone when no step is legal.
    ///
    /// Empty only when `state.turn` is past the sequence.
    #[must_use]
    pub fn possible_moves(&self, state: &SimState) -> MoveList {
        match self.rolls.get(state.turn) {
            Some(pair) => legal_moves(
                &state.positions[state.to_move],
                pair[state.to_move.index()],
                self.n_fields,
            ),
            None => MoveList::new(),
        }
    }

    /// Best move for the side to move and the minimax value.
    pub fn search(&self, root: &SimState) -> SearchResult {
        let start = Instant::now();
        let mut stats = SearchStats::new();

        if self.is_terminal(root) {
            stats.leaves = 1;
            return SearchResult {
                value: self.evaluate(root),
                best_move: None,
                stats,
            };
        }

        let pruning = self.config.pruning;
        let mut table: FxHashMap<SimState, TableEntry> = FxHashMap::default();
        let mut stack = vec![Frame::new(
            root.clone(),
            self.possible_moves(root),
            i32::MIN,
            i32::MAX,
        )];
        stats.nodes_expanded = 1;

        // Value handed up from the child most recently finished.
        let mut returned: Option<i32> = None;
        let mut outcome = (self.evaluate(root), None);

        while let Some(frame) = stack.last_mut() {
            if let Some(value) = returned.take() {
                if frame.absorb(value, pruning) {
                    stats.cutoffs += 1;
                    frame.next = frame.moves.len();
                }
            }

            if frame.next < frame.moves.len() {
                let m = frame.moves[frame.next];
                frame.next += 1;
                let child = frame.state.play(m, self.n_fields);
                let (alpha, beta) = (frame.alpha, frame.beta);

                if self.is_terminal(&child) {
                    stats.leaves += 1;
                    returned = Some(self.evaluate(&child));
                    continue;
                }
                if let Some(value) = self.lookup(&table, &child, alpha, beta) {
                    stats.table_hits += 1;
                    returned = Some(value);
                    continue;
                }

                let moves = self.possible_moves(&child);
                stack.push(Frame::new(child, moves, alpha, beta));
                stats.nodes_expanded += 1;
                stats.observe_depth(stack.len());
                continue;
            }

            if let Some(done) = stack.pop() {
                if self.config.transposition_table {
                    table.insert(
                        done.state.clone(),
                        TableEntry {
                            value: done.best_value,
                            bound: done.bound(),
                        },
                    );
                }
                if stack.is_empty() {
                    outcome = (done.best_value, done.best_move);
                } else {
                    returned = Some(done.best_value);
                }
            }
        }
        let (value, best_move) = outcome;

        stats.table_size = table.len();
        stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            "minimax: turn={} to_move={} value={} move={:?} expanded={} cutoffs={} hits={}",
            root.turn,
            root.to_move,
            value,
            best_move,
            stats.nodes_expanded,
            stats.cutoffs,
            stats.table_hits
        );

        SearchResult {
            value,
            best_move,
            stats,
        }
    }

    /// A stored value usable in the window `(alpha, beta)`, if any.
    fn lookup(
        &self,
        table: &FxHashMap<SimState, TableEntry>,
        state: &SimState,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        if !self.config.transposition_table {
            return None;
        }
        let entry = table.get(state)?;
        match entry.bound {
            Bound::Exact => Some(entry.value),
            Bound::Lower if entry.value >= beta => Some(entry.value),
            Bound::Upper if entry.value <= alpha => Some(entry.value),
            _ => None,
        }
    }
}
