//! Sequence oracle: minimum moves to finish under a fixed dice sequence.
//!
//! Dynamic programming over `(positions, roll_index)`:
//!
//! - all tokens finished: 0 moves
//! - rolls exhausted: unsolvable
//! - otherwise `1 + min(cost(child))` over the legal moves for the current
//!   roll, where a turn with no usable roll has the single child `Stay`
//!
//! Every roll index consumes one turn, so the minimum is the number of
//! turns an optimal side needs to bring all its tokens home.
//!
//! The recursion runs on an explicit worklist so long sequences cannot
//! exhaust the call stack. Each top-level call allocates its own memo
//! table; nothing is shared between calls.

use std::time::Instant;

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Position, Roll, TokenPositions};
use crate::rules::{legal_moves, Move};

use super::stats::SearchStats;

/// Cost of an unreachable goal. Saturates instead of overflowing.
pub const UNSOLVABLE: u32 = u32::MAX;

/// Memo key: placement plus index of the next roll.
type Key = (TokenPositions, usize);

/// Resolved memo entry.
#[derive(Clone, Copy, Debug)]
struct Entry {
    cost: u32,
    best: Option<Move>,
}

/// Result of a sequence oracle call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Minimum remaining moves, or `UNSOLVABLE`.
    pub min_moves: u32,

    /// One optimal move per remaining turn until every token finishes.
    /// Empty when unsolvable or already finished.
    pub moves: Vec<Move>,
}

impl Solution {
    /// Whether the side can finish within the sequence.
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        self.min_moves != UNSOLVABLE
    }

    /// Minimum remaining moves, `None` when unsolvable.
    #[must_use]
    pub fn min_moves(&self) -> Option<u32> {
        self.is_solvable().then_some(self.min_moves)
    }

    /// The optimal move for the current turn.
    #[must_use]
    pub fn next_move(&self) -> Option<Move> {
        self.moves.first().copied()
    }
}

/// DP solver over one side's dice sequence.
#[derive(Clone, Debug)]
pub struct SequenceOracle {
    rolls: Vec<Roll>,
    n_fields: Position,
}

/// Worklist frame.
struct Frame {
    key: Key,
    expanded: bool,
}

impl SequenceOracle {
    /// Create an oracle for `rolls` on a board of `n_fields` fields.
    pub fn new(rolls: Vec<Roll>, n_fields: Position) -> Self {
        Self { rolls, n_fields }
    }

    /// The dice sequence.
    #[must_use]
    pub fn rolls(&self) -> &[Roll] {
        &self.rolls
    }

    /// Solve from `positions` with `roll_index` the next roll to play.
    pub fn solve(&self, positions: &TokenPositions, roll_index: usize) -> Solution {
        self.solve_with_stats(positions, roll_index).0
    }

    /// Solve and report search statistics.
    pub fn solve_with_stats(
        &self,
        positions: &TokenPositions,
        roll_index: usize,
    ) -> (Solution, SearchStats) {
        let start = Instant::now();
        let mut stats = SearchStats::new();
        let mut memo: FxHashMap<Key, Entry> = FxHashMap::default();

        let root: Key = (positions.clone(), roll_index);
        self.fill(&root, &mut memo, &mut stats);

        let cost = memo.get(&root).map_or(UNSOLVABLE, |e| e.cost);
        let moves = if cost == UNSOLVABLE {
            Vec::new()
        } else {
            self.trace(&root, &memo)
        };

        stats.table_size = memo.len();
        stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            "sequence oracle: roll_index={} min_moves={} expanded={} table={}",
            roll_index,
            if cost == UNSOLVABLE { "unsolvable".to_string() } else { cost.to_string() },
            stats.nodes_expanded,
            stats.table_size
        );

        (Solution { min_moves: cost, moves }, stats)
    }

    /// Terminal entry for `key`, if it is a terminal state.
    fn terminal(&self, key: &Key) -> Option<Entry> {
        let (positions, roll_index) = key;
        if positions.all_finished(self.n_fields) {
            return Some(Entry { cost: 0, best: None });
        }
        if *roll_index >= self.rolls.len() {
            return Some(Entry {
                cost: UNSOLVABLE,
                best: None,
            });
        }
        None
    }

    /// Child states of a non-terminal key, in enumeration order.
    fn children(&self, key: &Key) -> impl Iterator<Item = (Move, Key)> + '_ {
        let (positions, roll_index) = key;
        let roll = self.rolls[*roll_index];
        let next_index = roll_index + 1;
        let positions = positions.clone();
        legal_moves(&positions, roll, self.n_fields)
            .into_iter()
            .map(move |m| (m, (m.apply(&positions), next_index)))
    }

    /// Resolve `root` and everything it depends on into `memo`.
    fn fill(&self, root: &Key, memo: &mut FxHashMap<Key, Entry>, stats: &mut SearchStats) {
        let mut stack = vec![Frame {
            key: root.clone(),
            expanded: false,
        }];

        while let Some(frame) = stack.pop() {
            if memo.contains_key(&frame.key) {
                stats.table_hits += 1;
                continue;
            }
            if let Some(entry) = self.terminal(&frame.key) {
                stats.leaves += 1;
                memo.insert(frame.key, entry);
                continue;
            }

            if !frame.expanded {
                stats.nodes_expanded += 1;
                let pending: Vec<Key> = self
                    .children(&frame.key)
                    .map(|(_, child)| child)
                    .filter(|child| !memo.contains_key(child))
                    .collect();
                stack.push(Frame {
                    key: frame.key,
                    expanded: true,
                });
                stack.extend(pending.into_iter().map(|key| Frame {
                    key,
                    expanded: false,
                }));
                stats.observe_depth(stack.len());
                continue;
            }

            // Children sit above this frame on the stack, so they are resolved.
            let mut best = Entry {
                cost: UNSOLVABLE,
                best: None,
            };
            for (m, child) in self.children(&frame.key) {
                let cost = memo
                    .get(&child)
                    .map_or(UNSOLVABLE, |e| e.cost)
                    .saturating_add(1);
                if cost < best.cost {
                    best = Entry {
                        cost,
                        best: Some(m),
                    };
                }
            }
            memo.insert(frame.key, best);
        }
    }

    /// Follow best moves from a solvable `root` to a finished state.
    fn trace(&self, root: &Key, memo: &FxHashMap<Key, Entry>) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut key = root.clone();
        while let Some(Entry { best: Some(m), .. }) = memo.get(&key) {
            moves.push(*m);
            key = (m.apply(&key.0), key.1 + 1);
        }
        moves
    }
}
