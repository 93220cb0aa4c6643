//! Immutable game state for the adversarial oracle.
//!
//! `SimState` is the adversarial model of the game: both sides race on the
//! same track, and a step that lands on an opponent token sends that token
//! home, unless the landing field is the finish field. States are never
//! mutated in place; `play` returns a new state, which keeps memoization
//! sound.

use serde::{Deserialize, Serialize};

use crate::core::{Board, Position, SideId, SideMap, TokenPositions, HOME};
use crate::rules::Move;

/// The side the minimax value is measured for.
///
/// Within a round side 0 moves first and side 1 second; the round (and
/// `turn`) advances after side 1 has moved.
pub const MAXIMIZING_SIDE: SideId = SideId(1);

/// Positions of both sides, the round index, and the side to move.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimState {
    /// Per-side token placement.
    pub positions: SideMap<TokenPositions>,

    /// Index of the current round into the dice sequence.
    pub turn: usize,

    /// Side whose move it is.
    pub to_move: SideId,
}

impl SimState {
    /// New state.
    pub fn new(positions: SideMap<TokenPositions>, turn: usize, to_move: SideId) -> Self {
        Self {
            positions,
            turn,
            to_move,
        }
    }

    /// Snapshot of a live two-side board.
    pub fn from_board(board: &Board, turn: usize, to_move: SideId) -> Self {
        Self::new(board.sides().clone(), turn, to_move)
    }

    /// State after `to_move` plays `m`.
    ///
    /// Opponent tokens on the destination field are sent home unless the
    /// destination is `n_fields`.
    #[must_use]
    pub fn play(&self, m: Move, n_fields: Position) -> SimState {
        let mover = self.to_move;
        let mut positions = self.positions.clone();
        positions[mover] = m.apply(&positions[mover]);

        if let Some(destination) = m.destination() {
            if destination != n_fields {
                for side in positions.side_ids().filter(|&s| s != mover).collect::<Vec<_>>() {
                    let captured: Vec<_> = positions[side]
                        .iter()
                        .filter(|&(_, p)| p == destination)
                        .map(|(t, _)| t)
                        .collect();
                    for token in captured {
                        positions[side].set(token, HOME);
                    }
                }
            }
        }

        let turn = if mover == MAXIMIZING_SIDE {
            self.turn + 1
        } else {
            self.turn
        };

        SimState {
            positions,
            turn,
            to_move: mover.opponent(),
        }
    }

    /// Whether every token of `side` has finished.
    #[must_use]
    pub fn is_finished(&self, side: SideId, n_fields: Position) -> bool {
        self.positions[side].all_finished(n_fields)
    }
}
