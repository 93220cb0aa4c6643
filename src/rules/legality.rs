//! Strict move legality checking.
//!
//! `check_move` is a pure predicate over one side's placement before and
//! after a reply. It knows nothing about opponents: captures exist only in
//! the adversarial oracle's model of the game.
//!
//! Checks, in precedence order:
//! 1. More than one token changed: `SimultaneousMove`.
//! 2. Nothing changed: every token that had a legal step is reported,
//!    `NotMovedToBoard` for a token at home, `NotMoved` for one in play.
//! 3. One token changed: the change must be one of that token's legal
//!    steps, otherwise `IncorrectMove`.

use serde::{Deserialize, Serialize};

use crate::core::{Position, Roll, TokenId, TokenPositions, HOME};

use super::moves::{token_steps, Move};

/// Why a reply was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// Two tokens moved in one turn.
    SimultaneousMove,
    /// A token could have entered play but stayed home.
    NotMovedToBoard(TokenId),
    /// A token in play could have advanced but stayed.
    NotMoved(TokenId),
    /// A token changed position in a way the roll does not allow.
    IncorrectMove(TokenId),
}

impl Violation {
    /// The token the violation is about, if any.
    #[must_use]
    pub fn token(&self) -> Option<TokenId> {
        match *self {
            Violation::SimultaneousMove => None,
            Violation::NotMovedToBoard(t) | Violation::NotMoved(t) | Violation::IncorrectMove(t) => {
                Some(t)
            }
        }
    }

    /// Stable snake_case name, used in events and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Violation::SimultaneousMove => "simultaneous_move",
            Violation::NotMovedToBoard(_) => "not_moved_to_board",
            Violation::NotMoved(_) => "not_moved",
            Violation::IncorrectMove(_) => "incorrect_move",
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.token() {
            Some(token) => write!(f, "{}({})", self.kind(), token),
            None => f.write_str(self.kind()),
        }
    }
}

/// Check a proposed placement against the placement before the turn.
///
/// `proposed` should mention the same tokens as `before`; tokens it leaves
/// out count as unmoved.
///
/// ```
/// use rust_ludo::core::{TokenId, TokenPositions};
/// use rust_ludo::rules::{check_move, Violation};
///
/// let before = TokenPositions::from_pairs(&[(TokenId('X'), 0)]);
/// let stayed = before.clone();
/// assert_eq!(
///     check_move(&before, &stayed, 6, 23),
///     Err(Violation::NotMovedToBoard(TokenId('X')))
/// );
/// let entered = TokenPositions::from_pairs(&[(TokenId('X'), 1)]);
/// assert_eq!(check_move(&before, &entered, 6, 23), Ok(()));
/// ```
pub fn check_move(
    before: &TokenPositions,
    proposed: &TokenPositions,
    roll: Roll,
    n_fields: Position,
) -> Result<(), Violation> {
    let changed = before.changed_tokens(proposed);
    if changed.len() > 1 {
        return Err(Violation::SimultaneousMove);
    }

    match changed.first() {
        None => {
            for (token, position) in before.iter() {
                if token_steps(before, token, roll, n_fields).is_empty() {
                    continue;
                }
                return Err(if position == HOME {
                    Violation::NotMovedToBoard(token)
                } else {
                    Violation::NotMoved(token)
                });
            }
            Ok(())
        }
        Some(&token) => {
            let to = proposed.get(token).unwrap_or(HOME);
            let step = Move::Step { token, to };
            if token_steps(before, token, roll, n_fields).contains(&step) {
                Ok(())
            } else {
                Err(Violation::IncorrectMove(token))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: Position, y: Position) -> TokenPositions {
        TokenPositions::from_pairs(&[(TokenId('X'), x), (TokenId('Y'), y)])
    }

    #[test]
    fn test_advance_accepted() {
        assert_eq!(check_move(&pos(5, 0), &pos(8, 0), 3, 23), Ok(()));
    }

    #[test]
    fn test_home_token_may_stay_without_six() {
        assert_eq!(check_move(&pos(0, 0), &pos(0, 0), 4, 23), Ok(()));
    }

    #[test]
    fn test_not_moved() {
        assert_eq!(
            check_move(&pos(5, 0), &pos(5, 0), 3, 23),
            Err(Violation::NotMoved(TokenId('X')))
        );
    }

    #[test]
    fn test_overshoot_may_stay() {
        assert_eq!(check_move(&pos(21, 23), &pos(21, 23), 5, 23), Ok(()));
    }

    #[test]
    fn test_entering_without_six() {
        assert_eq!(
            check_move(&pos(5, 0), &pos(5, 3), 3, 23),
            Err(Violation::IncorrectMove(TokenId('Y')))
        );
    }

    #[test]
    fn test_wrong_distance() {
        assert_eq!(
            check_move(&pos(5, 0), &pos(9, 0), 3, 23),
            Err(Violation::IncorrectMove(TokenId('X')))
        );
    }

    #[test]
    fn test_own_collision_rejected() {
        assert_eq!(
            check_move(&pos(5, 8), &pos(8, 8), 3, 23),
            Err(Violation::IncorrectMove(TokenId('X')))
        );
    }

    #[test]
    fn test_simultaneous_takes_precedence() {
        assert_eq!(
            check_move(&pos(5, 0), &pos(8, 3), 3, 23),
            Err(Violation::SimultaneousMove)
        );
    }

    #[test]
    fn test_either_token_may_move() {
        assert_eq!(check_move(&pos(5, 10), &pos(8, 10), 3, 23), Ok(()));
        assert_eq!(check_move(&pos(5, 10), &pos(5, 13), 3, 23), Ok(()));
    }

    #[test]
    fn test_violation_names() {
        assert_eq!(Violation::SimultaneousMove.to_string(), "simultaneous_move");
        assert_eq!(
            Violation::NotMoved(TokenId('Y')).to_string(),
            "not_moved(Y)"
        );
        let json = serde_json::to_string(&Violation::IncorrectMove(TokenId('X'))).unwrap();
        assert_eq!(json, r#"{"incorrect_move":"X"}"#);
    }
}
