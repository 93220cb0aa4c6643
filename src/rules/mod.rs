//! Game rules: move enumeration and strict legality checking.
//!
//! Rule violations are values (`Violation`), never errors. The turn engine
//! turns them into correction messages; nothing here panics on bad input.

pub mod legality;
pub mod moves;

pub use legality::{check_move, Violation};
pub use moves::{candidate_moves, legal_moves, token_steps, Move, MoveList};
