//! Pre-rolled dice sequences.
//!
//! An episode never samples dice live. It plays a fixed, solvability-checked
//! sequence with one entry per turn: a single roll for a one-side episode,
//! or a pair of rolls (one per side) for a two-side episode.

use serde::{Deserialize, Serialize};

use super::error::{LudoError, Result};
use super::side::SideId;

/// A die roll, always in `1..=6`.
pub type Roll = u8;

/// The roll that lets a token enter play.
pub const ENTRY_ROLL: Roll = 6;

/// Die faces.
pub const DIE_FACES: std::ops::RangeInclusive<Roll> = 1..=6;

/// Immutable per-turn dice rolls.
///
/// Serializes as `[3, 6, ...]` for one side and `[[3, 4], [6, 1], ...]`
/// for two sides.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiceSequence {
    /// One roll per turn for a single side.
    Single(Vec<Roll>),
    /// One roll per side per turn.
    Paired(Vec<[Roll; 2]>),
}

impl DiceSequence {
    /// Validated single-side sequence.
    pub fn single(rolls: Vec<Roll>) -> Result<Self> {
        let sequence = Self::Single(rolls);
        sequence.validate()?;
        Ok(sequence)
    }

    /// Validated two-side sequence.
    pub fn paired(rolls: Vec<[Roll; 2]>) -> Result<Self> {
        let sequence = Self::Paired(rolls);
        sequence.validate()?;
        Ok(sequence)
    }

    /// Zip two per-side sequences into a paired one.
    pub fn zip(first: &[Roll], second: &[Roll]) -> Result<Self> {
        if first.len() != second.len() {
            return Err(LudoError::SequenceLengthMismatch {
                first: first.len(),
                second: second.len(),
            });
        }
        Self::paired(first.iter().zip(second).map(|(&a, &b)| [a, b]).collect())
    }

    /// Check that every roll is a die face.
    pub fn validate(&self) -> Result<()> {
        let bad = match self {
            Self::Single(rolls) => rolls
                .iter()
                .enumerate()
                .find(|(_, r)| !DIE_FACES.contains(r))
                .map(|(turn, &roll)| (turn, roll)),
            Self::Paired(rolls) => rolls
                .iter()
                .enumerate()
                .flat_map(|(turn, pair)| pair.iter().map(move |&r| (turn, r)))
                .find(|(_, r)| !DIE_FACES.contains(r)),
        };
        match bad {
            Some((turn, roll)) => Err(LudoError::InvalidRoll { turn, roll }),
            None => Ok(()),
        }
    }

    /// Number of turns (the turn limit of an episode).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(rolls) => rolls.len(),
            Self::Paired(rolls) => rolls.len(),
        }
    }

    /// Whether the sequence has no turns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sides the sequence rolls for.
    #[must_use]
    pub fn side_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Paired(_) => 2,
        }
    }

    /// Roll for `side` on `turn`, if both are in range.
    #[must_use]
    pub fn roll(&self, turn: usize, side: SideId) -> Option<Roll> {
        match self {
            Self::Single(rolls) if side.is_primary() => rolls.get(turn).copied(),
            Self::Single(_) => None,
            Self::Paired(rolls) => rolls.get(turn).and_then(|pair| pair.get(side.index()).copied()),
        }
    }

    /// The rolls of one side, in turn order.
    #[must_use]
    pub fn side_rolls(&self, side: SideId) -> Vec<Roll> {
        (0..self.len()).filter_map(|t| self.roll(t, side)).collect()
    }
}
