//! Legality checker integration tests.

use rust_ludo::core::{TokenId, TokenPositions};
use rust_ludo::rules::{check_move, legal_moves, Move, Violation};

const X: TokenId = TokenId('X');
const Y: TokenId = TokenId('Y');

fn two(x: u8, y: u8) -> TokenPositions {
    TokenPositions::from_pairs(&[(X, x), (Y, y)])
}

// =============================================================================
// Scenario: {X: 5, Y: 0}, roll 3
// =============================================================================

#[test]
fn test_advance_in_play_token_is_accepted() {
    assert_eq!(check_move(&two(5, 0), &two(8, 0), 3, 23), Ok(()));
}

#[test]
fn test_entering_without_six_is_incorrect() {
    assert_eq!(
        check_move(&two(5, 0), &two(5, 3), 3, 23),
        Err(Violation::IncorrectMove(Y))
    );
}

#[test]
fn test_moving_both_is_simultaneous() {
    assert_eq!(
        check_move(&two(5, 0), &two(8, 3), 3, 23),
        Err(Violation::SimultaneousMove)
    );
}

#[test]
fn test_leaving_movable_token_is_not_moved() {
    assert_eq!(
        check_move(&two(5, 0), &two(5, 0), 3, 23),
        Err(Violation::NotMoved(X))
    );
}

#[test]
fn test_only_legal_reply() {
    assert_eq!(
        legal_moves(&two(5, 0), 3, 23).as_slice(),
        &[Move::Step { token: X, to: 8 }]
    );
}

// =============================================================================
// Scenario: single token, roll 6 at home
// =============================================================================

#[test]
fn test_six_must_enter() {
    let home = TokenPositions::from_pairs(&[(X, 0)]);
    let entered = TokenPositions::from_pairs(&[(X, 1)]);

    assert_eq!(
        check_move(&home, &home, 6, 23),
        Err(Violation::NotMovedToBoard(X))
    );
    assert_eq!(check_move(&home, &entered, 6, 23), Ok(()));
}

#[test]
fn test_entering_elsewhere_is_incorrect() {
    let home = TokenPositions::from_pairs(&[(X, 0)]);
    let wrong = TokenPositions::from_pairs(&[(X, 6)]);
    assert_eq!(
        check_move(&home, &wrong, 6, 23),
        Err(Violation::IncorrectMove(X))
    );
}

// =============================================================================
// Overshoot, blocking, finish field
// =============================================================================

#[test]
fn test_overshoot_may_stay() {
    assert_eq!(check_move(&two(21, 0), &two(21, 0), 3, 23), Ok(()));
    assert_eq!(
        check_move(&two(21, 0), &two(23, 0), 3, 23),
        Err(Violation::IncorrectMove(X))
    );
}

#[test]
fn test_exact_finish() {
    assert_eq!(check_move(&two(20, 0), &two(23, 0), 3, 23), Ok(()));
}

#[test]
fn test_own_token_blocks_field() {
    // X cannot land on Y; Y may still advance.
    assert_eq!(
        check_move(&two(4, 7), &two(7, 7), 3, 23),
        Err(Violation::IncorrectMove(X))
    );
    assert_eq!(check_move(&two(4, 7), &two(4, 10), 3, 23), Ok(()));
}

#[test]
fn test_own_token_blocks_entry() {
    // Y cannot enter onto X's field, and staying is then fine.
    assert_eq!(
        check_move(&two(1, 0), &two(1, 1), 6, 23),
        Err(Violation::IncorrectMove(Y))
    );
    assert_eq!(check_move(&two(1, 0), &two(7, 0), 6, 23), Ok(()));
}

#[test]
fn test_finish_field_is_shared() {
    assert_eq!(check_move(&two(23, 20), &two(23, 23), 3, 23), Ok(()));
}

#[test]
fn test_nothing_movable_may_stay() {
    assert_eq!(check_move(&two(0, 0), &two(0, 0), 5, 23), Ok(()));
    assert_eq!(legal_moves(&two(0, 0), 5, 23).as_slice(), &[Move::Stay]);
}

#[test]
fn test_six_with_one_in_play_has_two_options() {
    let before = two(5, 0);
    assert_eq!(check_move(&before, &two(11, 0), 6, 23), Ok(()));
    assert_eq!(check_move(&before, &two(5, 1), 6, 23), Ok(()));
    assert_eq!(legal_moves(&before, 6, 23).len(), 2);
}
