//! Reply parser for the move grammar.
//!
//! A reply is accepted when some line contains
//! `MY MOVE: <T1> -> <N> [ ; <T2> -> <N> ]` naming every token the side
//! owns, each exactly once, in any order. Anything before `MY MOVE:` on the
//! line and any other lines are ignored. Whitespace around the separators
//! is free.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Position, TokenId, TokenPositions, MAX_TOKENS};

/// Marker that opens the move clause.
pub const MOVE_MARKER: &str = "MY MOVE:";

/// Why a reply could not be read as a move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailure {
    /// No line contains the move marker.
    MissingMarker,
    /// A clause is not of the form `T -> N`.
    MalformedClause(String),
    /// A clause names a token the side does not own.
    UnknownToken(String),
    /// A token is named twice.
    DuplicateToken(TokenId),
    /// An owned token is not named.
    MissingToken(TokenId),
    /// A target position is not a field number.
    InvalidPosition(String),
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseFailure::MissingMarker => write!(f, "no '{}' line", MOVE_MARKER),
            ParseFailure::MalformedClause(c) => write!(f, "malformed clause '{}'", c),
            ParseFailure::UnknownToken(t) => write!(f, "unknown token '{}'", t),
            ParseFailure::DuplicateToken(t) => write!(f, "token {} named twice", t),
            ParseFailure::MissingToken(t) => write!(f, "token {} not named", t),
            ParseFailure::InvalidPosition(p) => write!(f, "invalid position '{}'", p),
        }
    }
}

/// Parse `text` into target positions for `expected` tokens.
///
/// The first line carrying the marker decides the outcome; later lines are
/// not consulted.
///
/// ```
/// use rust_ludo::core::TokenId;
/// use rust_ludo::engine::parse_move;
///
/// let targets = parse_move("Sure.\nMY MOVE: X -> 8 ; Y -> 0", &[TokenId('X'), TokenId('Y')]).unwrap();
/// assert_eq!(targets.get(TokenId('X')), Some(8));
/// assert_eq!(targets.get(TokenId('Y')), Some(0));
/// ```
pub fn parse_move(text: &str, expected: &[TokenId]) -> Result<TokenPositions, ParseFailure> {
    let clause_list = text
        .lines()
        .find_map(|line| line.find(MOVE_MARKER).map(|at| &line[at + MOVE_MARKER.len()..]))
        .ok_or(ParseFailure::MissingMarker)?;

    let mut named: SmallVec<[(TokenId, Position); MAX_TOKENS]> = SmallVec::new();
    for clause in clause_list.split(';') {
        let (token, position) = parse_clause(clause)?;
        if !expected.contains(&token) {
            return Err(ParseFailure::UnknownToken(token.to_string()));
        }
        if named.iter().any(|&(t, _)| t == token) {
            return Err(ParseFailure::DuplicateToken(token));
        }
        named.push((token, position));
    }

    // Rebuild in ownership order so placements compare equal to the board's.
    let mut ordered: SmallVec<[(TokenId, Position); MAX_TOKENS]> = SmallVec::new();
    for &token in expected {
        match named.iter().find(|&&(t, _)| t == token) {
            Some(&pair) => ordered.push(pair),
            None => return Err(ParseFailure::MissingToken(token)),
        }
    }

    Ok(TokenPositions::from_pairs(&ordered))
}

fn parse_clause(clause: &str) -> Result<(TokenId, Position), ParseFailure> {
    let (label, target) = clause
        .split_once("->")
        .ok_or_else(|| ParseFailure::MalformedClause(clause.trim().to_string()))?;

    let label = label.trim();
    let token = TokenId::from_label(label)
        .ok_or_else(|| ParseFailure::UnknownToken(label.to_string()))?;

    // Trailing prose after the number ("Y -> 0. Done") is tolerated.
    let target = target.trim();
    let digits: &str = &target[..target
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(target.len())];
    let position = digits
        .parse::<Position>()
        .map_err(|_| ParseFailure::InvalidPosition(target.to_string()))?;

    Ok((token, position))
}
