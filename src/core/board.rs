//! Board model: the shared track and every side's token placement.
//!
//! The board is plain data. Only the turn engine mutates it, and only by
//! writing an already-validated placement for one side via [`Board::apply`].

use serde::{Deserialize, Serialize};

use super::error::{LudoError, Result};
use super::side::{SideId, SideMap, MAX_SIDES};
use super::token::{Position, TokenId, TokenPositions, HOME, MAX_TOKENS};

/// Commonly used board size.
pub const DEFAULT_FIELDS: Position = 23;

/// Glyph for an empty field when rendering the track.
const EMPTY_FIELD: char = '□';

/// Token placement of every side on a track of `n_fields` fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    n_fields: Position,
    n_tokens: usize,
    sides: SideMap<TokenPositions>,
}

impl Board {
    /// New board with every token at home.
    pub fn new(n_fields: usize, n_tokens: usize, side_count: usize) -> Result<Self> {
        if !(2..=usize::from(Position::MAX)).contains(&n_fields) {
            return Err(LudoError::InvalidBoardSize { n_fields });
        }
        if !(1..=MAX_TOKENS).contains(&n_tokens) {
            return Err(LudoError::InvalidTokenCount { n_tokens });
        }
        if !(1..=MAX_SIDES).contains(&side_count) {
            return Err(LudoError::InvalidSideCount { sides: side_count });
        }

        let sides = SideMap::new(side_count, |side| {
            TokenPositions::at_home(&TokenId::for_side(side, n_tokens))
        });

        Ok(Self {
            n_fields: n_fields as Position,
            n_tokens,
            sides,
        })
    }

    /// Board with explicit placements, one per side.
    ///
    /// Every position must lie on the track, home through finish.
    pub fn from_positions(n_fields: usize, placements: Vec<TokenPositions>) -> Result<Self> {
        let side_count = placements.len();
        let n_tokens = placements.first().map_or(0, TokenPositions::len);
        let mut board = Self::new(n_fields, n_tokens, side_count)?;
        for placement in &placements {
            if let Some((token, position)) =
                placement.iter().find(|&(_, position)| usize::from(position) > n_fields)
            {
                return Err(LudoError::InvalidPosition {
                    token: token.0,
                    position,
                    n_fields,
                });
            }
        }
        for (side, placement) in SideId::all(side_count).zip(placements) {
            board.apply(side, &placement);
        }
        Ok(board)
    }

    /// Number of fields; also the finish position.
    #[must_use]
    pub fn n_fields(&self) -> Position {
        self.n_fields
    }

    /// Tokens per side.
    #[must_use]
    pub fn n_tokens(&self) -> usize {
        self.n_tokens
    }

    /// Number of sides on the board.
    #[must_use]
    pub fn side_count(&self) -> usize {
        self.sides.side_count()
    }

    /// Placement of one side's tokens.
    #[must_use]
    pub fn positions(&self, side: SideId) -> &TokenPositions {
        &self.sides[side]
    }

    /// All placements, per side.
    #[must_use]
    pub fn sides(&self) -> &SideMap<TokenPositions> {
        &self.sides
    }

    /// Write `targets` for the tokens of `side`.
    ///
    /// Tokens that `targets` does not mention keep their position.
    pub fn apply(&mut self, side: SideId, targets: &TokenPositions) {
        let placement = &mut self.sides[side];
        for (token, position) in targets.iter() {
            placement.set(token, position);
        }
    }

    /// Whether every token of `side` has finished.
    #[must_use]
    pub fn is_finished(&self, side: SideId) -> bool {
        self.sides[side].all_finished(self.n_fields)
    }

    /// Render the track, one glyph per field.
    ///
    /// ```
    /// use rust_ludo::core::{Board, SideId, TokenId, TokenPositions};
    ///
    /// let mut board = Board::new(5, 2, 1).unwrap();
    /// board.apply(SideId::PRIMARY, &TokenPositions::from_pairs(&[(TokenId('X'), 2)]));
    /// assert_eq!(board.render(), "□ X □ □ □");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut fields = vec![EMPTY_FIELD; usize::from(self.n_fields)];
        for (_, placement) in self.sides.iter() {
            for (token, position) in placement.iter() {
                if position != HOME {
                    fields[usize::from(position) - 1] = token.0;
                }
            }
        }
        fields
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
