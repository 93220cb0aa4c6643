//! Property-based tests for rules, oracles and the turn engine.

use proptest::prelude::*;

use rust_ludo::core::{
    DiceSequence, EpisodeConfig, Position, Roll, SideId, SideMap, TokenId, TokenPositions,
};
use rust_ludo::engine::{Episode, EpisodeStatus, NullSink, SearchSide, Side};
use rust_ludo::oracle::{AdversarialOracle, MinimaxConfig, SequenceOracle, SimState, UNSOLVABLE};
use rust_ludo::rules::{check_move, legal_moves, Move, Violation};

const X: TokenId = TokenId('X');
const Y: TokenId = TokenId('Y');

/// Strategy: board size with a valid two-token placement on it.
fn placement_strategy() -> impl Strategy<Value = (Position, TokenPositions)> {
    (6..=23u8)
        .prop_flat_map(|n| (Just(n), 0..=n, 0..=n))
        .prop_filter("own tokens share only home and finish", |&(n, x, y)| {
            x != y || x == 0 || x == n
        })
        .prop_map(|(n, x, y)| (n, TokenPositions::from_pairs(&[(X, x), (Y, y)])))
}

fn roll_strategy() -> impl Strategy<Value = Roll> {
    1..=6u8
}

proptest! {
    // 1. Every enumerated move passes the checker
    #[test]
    fn legal_moves_are_accepted((n, before) in placement_strategy(), roll in roll_strategy()) {
        for m in legal_moves(&before, roll, n) {
            prop_assert_eq!(check_move(&before, &m.apply(&before), roll, n), Ok(()), "move {}", m);
        }
    }

    // 2. Every accepted single-token change is an enumerated move
    #[test]
    fn accepted_moves_are_enumerated((n, before) in placement_strategy(), roll in roll_strategy()) {
        let legal = legal_moves(&before, roll, n);
        for token in [X, Y] {
            for to in 0..=n {
                let proposed = before.with(token, to);
                if check_move(&before, &proposed, roll, n).is_ok() {
                    let played = if proposed == before {
                        Move::Stay
                    } else {
                        Move::Step { token, to }
                    };
                    prop_assert!(legal.contains(&played), "{} -> {} accepted", token, to);
                }
            }
        }
    }

    // 3. Moving both tokens is always reported as simultaneous
    #[test]
    fn two_changes_are_simultaneous(
        (n, before) in placement_strategy(),
        roll in roll_strategy(),
        dx in 1..=6u8,
        dy in 1..=6u8,
    ) {
        let x = before.get(X).unwrap_or(0);
        let y = before.get(Y).unwrap_or(0);
        let proposed = TokenPositions::from_pairs(&[
            (X, (x + dx) % (n + 1)),
            (Y, (y + dy) % (n + 1)),
        ]);
        prop_assume!(proposed.get(X) != Some(x) && proposed.get(Y) != Some(y));
        prop_assert_eq!(check_move(&before, &proposed, roll, n), Err(Violation::SimultaneousMove));
    }

    // 4. The sequence oracle satisfies its own recurrence
    #[test]
    fn sequence_recurrence(
        (n, start) in placement_strategy(),
        rolls in prop::collection::vec(roll_strategy(), 1..12),
        index in 0..12usize,
    ) {
        let index = index % rolls.len();
        let oracle = SequenceOracle::new(rolls.clone(), n);

        let cost = oracle.solve(&start, index).min_moves;
        let best_child = legal_moves(&start, rolls[index], n)
            .iter()
            .map(|m| oracle.solve(&m.apply(&start), index + 1).min_moves)
            .min()
            .unwrap_or(UNSOLVABLE);
        let expected = if start.all_finished(n) { 0 } else { best_child.saturating_add(1) };
        prop_assert_eq!(cost, expected);
    }

    // 5. Alpha-beta agrees with plain minimax and is repeatable
    #[test]
    fn pruning_preserves_value(
        pairs in prop::collection::vec((roll_strategy(), roll_strategy()), 1..7),
        n in 6..=10u8,
    ) {
        let rolls: Vec<[Roll; 2]> = pairs.into_iter().map(|(a, b)| [a, b]).collect();
        let root = SimState::new(
            SideMap::new(2, |side| TokenPositions::at_home(&TokenId::for_side(side, 1))),
            0,
            SideId::PRIMARY,
        );
        let pruned = AdversarialOracle::new(rolls.clone(), n, MinimaxConfig::default());
        let exhaustive = AdversarialOracle::new(rolls, n, MinimaxConfig::exhaustive());

        let value = pruned.search(&root).value;
        prop_assert_eq!(value, exhaustive.search(&root).value);
        prop_assert_eq!(value, pruned.search(&root).value);
    }

    // 6. Episodes always end, and within the sequence
    #[test]
    fn episodes_terminate(rolls in prop::collection::vec(roll_strategy(), 1..16), n in 6..=12u8) {
        let dice = DiceSequence::single(rolls).unwrap();
        let side: Box<dyn Side> =
            Box::new(SearchSide::new(&dice, n, MinimaxConfig::default()).unwrap());
        let report = Episode::new(EpisodeConfig::default(), usize::from(n), 2, dice.clone(), vec![side])
            .unwrap()
            .run_with(&mut NullSink)
            .unwrap();

        prop_assert!(report.status.is_terminal());
        prop_assert_ne!(report.status, EpisodeStatus::Aborted);
        prop_assert!(report.turns_played <= dice.len());
        prop_assert_eq!(report.errors(), 0);
    }
}
