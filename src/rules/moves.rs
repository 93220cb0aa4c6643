//! Moves and move enumeration.
//!
//! A side moves at most one token per turn. A token in play advances by
//! exactly the roll without overshooting the finish field; a token at home
//! enters on field 1 only with a 6. A side may never land on a field held
//! by its own other token, except the finish field, which holds any number
//! of tokens.
//!
//! The same enumeration serves the legality checker ("could this token have
//! moved?") and both oracles ("which children does this state have?").

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Position, Roll, TokenId, TokenPositions, ENTRY_FIELD, ENTRY_ROLL, HOME};

/// One side's move for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// `token` goes to field `to` (entering play when `to` is field 1).
    Step { token: TokenId, to: Position },
    /// Every token stays; only legal when no step is.
    Stay,
}

impl Move {
    /// Placement after this move.
    #[must_use]
    pub fn apply(&self, positions: &TokenPositions) -> TokenPositions {
        match *self {
            Move::Step { token, to } => positions.with(token, to),
            Move::Stay => positions.clone(),
        }
    }

    /// The token this move relocates, if any.
    #[must_use]
    pub fn token(&self) -> Option<TokenId> {
        match *self {
            Move::Step { token, .. } => Some(token),
            Move::Stay => None,
        }
    }

    /// Destination field, if any.
    #[must_use]
    pub fn destination(&self) -> Option<Position> {
        match *self {
            Move::Step { to, .. } => Some(to),
            Move::Stay => None,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Step { token, to } => write!(f, "{} -> {}", token, to),
            Move::Stay => write!(f, "stay"),
        }
    }
}

/// Candidate moves, sized for two tokens with up to two options each.
pub type MoveList = SmallVec<[Move; 4]>;

/// Whether `field` is blocked for `token` by its own side.
fn blocked_by_own(positions: &TokenPositions, token: TokenId, field: Position, n_fields: Position) -> bool {
    field != n_fields && positions.occupied_by_other(field, token)
}

/// Steps available to a single token.
pub fn token_steps(
    positions: &TokenPositions,
    token: TokenId,
    roll: Roll,
    n_fields: Position,
) -> MoveList {
    let mut steps = MoveList::new();
    let Some(position) = positions.get(token) else {
        return steps;
    };

    if position != HOME {
        let destination = u16::from(position) + u16::from(roll);
        if destination <= u16::from(n_fields) {
            let destination = destination as Position;
            if !blocked_by_own(positions, token, destination, n_fields) {
                steps.push(Move::Step {
                    token,
                    to: destination,
                });
            }
        }
    }

    if roll == ENTRY_ROLL
        && position == HOME
        && !blocked_by_own(positions, token, ENTRY_FIELD, n_fields)
    {
        steps.push(Move::Step {
            token,
            to: ENTRY_FIELD,
        });
    }

    steps
}

/// Every step the side can take with `roll`, in token order.
///
/// Empty when the roll is unusable.
pub fn candidate_moves(positions: &TokenPositions, roll: Roll, n_fields: Position) -> MoveList {
    positions
        .tokens()
        .flat_map(|token| token_steps(positions, token, roll, n_fields))
        .collect()
}

/// Candidate moves, or the single `Stay` move when there are none.
pub fn legal_moves(positions: &TokenPositions, roll: Roll, n_fields: Position) -> MoveList {
    let mut moves = candidate_moves(positions, roll, n_fields);
    if moves.is_empty() {
        moves.push(Move::Stay);
    }
    moves
}
