//! Tokens and token placements.
//!
//! A token is a single movable piece. Its position is an integer in
//! `0..=n_fields`: `0` is home (not yet in play) and `n_fields` is the
//! finish field. Anything in between is a field on the track.
//!
//! `TokenPositions` is the ordered `token -> position` map that every layer
//! passes around: the board stores one per side, the move parser produces
//! one from a reply, the legality checker compares two of them, and the
//! oracles key their memo tables on them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::side::SideId;

/// Position of a token on the track. `0` = home, `n_fields` = finished.
pub type Position = u8;

/// Home position (token not in play).
pub const HOME: Position = 0;

/// Field a token enters play on.
pub const ENTRY_FIELD: Position = 1;

/// Most tokens a side may own.
pub const MAX_TOKENS: usize = 2;

/// Token labels per side, in ownership order.
const SIDE_ALPHABETS: [[char; MAX_TOKENS]; 2] = [['X', 'Y'], ['A', 'B']];

/// Token identifier, displayed as its single-letter label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub char);

impl TokenId {
    /// Token ids owned by `side` when every side has `n_tokens` tokens.
    ///
    /// ```
    /// use rust_ludo::core::{SideId, TokenId};
    ///
    /// let ids = TokenId::for_side(SideId::new(1), 2);
    /// assert_eq!(ids.as_slice(), &[TokenId('A'), TokenId('B')]);
    /// ```
    pub fn for_side(side: SideId, n_tokens: usize) -> SmallVec<[TokenId; MAX_TOKENS]> {
        assert!(
            (1..=MAX_TOKENS).contains(&n_tokens),
            "A side owns 1 or 2 tokens"
        );
        SIDE_ALPHABETS[side.index()][..n_tokens]
            .iter()
            .map(|&c| TokenId(c))
            .collect()
    }

    /// The side that owns this token, if the label is known.
    #[must_use]
    pub fn owner(self) -> Option<SideId> {
        SIDE_ALPHABETS
            .iter()
            .position(|alphabet| alphabet.contains(&self.0))
            .map(|i| SideId::new(i as u8))
    }

    /// Parse a token label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                let id = TokenId(c);
                id.owner().map(|_| id)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered token -> position map for the tokens of one side.
///
/// Entries keep ownership order (`X` before `Y`), so two placements of the
/// same side compare and hash equal exactly when every token sits on the
/// same field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPositions {
    entries: SmallVec<[(TokenId, Position); MAX_TOKENS]>,
}

impl TokenPositions {
    /// All `tokens` at home.
    pub fn at_home(tokens: &[TokenId]) -> Self {
        Self {
            entries: tokens.iter().map(|&t| (t, HOME)).collect(),
        }
    }

    /// Build from explicit pairs, in the given order.
    pub fn from_pairs(pairs: &[(TokenId, Position)]) -> Self {
        Self {
            entries: SmallVec::from_slice(pairs),
        }
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `token`, if tracked.
    #[must_use]
    pub fn get(&self, token: TokenId) -> Option<Position> {
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|&(_, p)| p)
    }

    /// Set the position of a tracked token. Untracked tokens are ignored.
    pub fn set(&mut self, token: TokenId, position: Position) {
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| *t == token) {
            entry.1 = position;
        }
    }

    /// Functional update: a copy with `token` at `position`.
    #[must_use]
    pub fn with(&self, token: TokenId, position: Position) -> Self {
        let mut next = self.clone();
        next.set(token, position);
        next
    }

    /// Whether `token` is tracked.
    #[must_use]
    pub fn contains(&self, token: TokenId) -> bool {
        self.get(token).is_some()
    }

    /// Token ids in ownership order.
    pub fn tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.entries.iter().map(|&(t, _)| t)
    }

    /// (token, position) pairs in ownership order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, Position)> + '_ {
        self.entries.iter().copied()
    }

    /// Whether a token other than `except` occupies `field`.
    #[must_use]
    pub fn occupied_by_other(&self, field: Position, except: TokenId) -> bool {
        self.entries
            .iter()
            .any(|&(t, p)| t != except && p == field)
    }

    /// Whether every token is on the finish field.
    #[must_use]
    pub fn all_finished(&self, n_fields: Position) -> bool {
        self.entries.iter().all(|&(_, p)| p == n_fields)
    }

    /// Sum of positions, used as a progress measure.
    #[must_use]
    pub fn progress(&self) -> u32 {
        self.entries.iter().map(|&(_, p)| u32::from(p)).sum()
    }

    /// Tokens whose position differs between `self` and `other`.
    ///
    /// Tokens missing from `other` count as unchanged.
    pub fn changed_tokens(&self, other: &TokenPositions) -> SmallVec<[TokenId; MAX_TOKENS]> {
        self.entries
            .iter()
            .filter(|&&(t, p)| other.get(t).is_some_and(|q| q != p))
            .map(|&(t, _)| t)
            .collect()
    }
}

impl std::fmt::Display for TokenPositions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (token, position)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ; ")?;
            }
            write!(f, "{} -> {}", token, position)?;
        }
        Ok(())
    }
}
