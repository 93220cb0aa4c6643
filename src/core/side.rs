//! Side identification and per-side data storage.
//!
//! ## SideId
//!
//! Type-safe identifier for one of the (at most two) sides of an episode.
//! Side 0 is always the primary side: the one whose result decides
//! `WIN`/`LOSE` and whose moves are scored.
//!
//! ## SideMap
//!
//! Per-side data storage backed by `Vec` for O(1) access by `SideId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Most sides an episode can have.
pub const MAX_SIDES: usize = 2;

/// Side identifier. Indices are 0-based: the primary side is `SideId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SideId(pub u8);

impl SideId {
    /// The primary side.
    pub const PRIMARY: SideId = SideId(0);

    /// Create a new side ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw side index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is the primary side.
    #[must_use]
    pub const fn is_primary(self) -> bool {
        self.0 == 0
    }

    /// The other side in a two-side episode.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Iterate over all side IDs for an episode with `side_count` sides.
    ///
    /// ```
    /// use rust_ludo::core::SideId;
    ///
    /// let sides: Vec<_> = SideId::all(2).collect();
    /// assert_eq!(sides, vec![SideId::new(0), SideId::new(1)]);
    /// ```
    pub fn all(side_count: usize) -> impl Iterator<Item = SideId> {
        (0..side_count as u8).map(SideId)
    }
}

impl std::fmt::Display for SideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Side {}", self.0)
    }
}

/// Per-side data storage with O(1) access.
///
/// ```
/// use rust_ludo::core::{SideId, SideMap};
///
/// let mut retries: SideMap<u32> = SideMap::with_value(2, 0);
/// retries[SideId::new(1)] += 1;
/// assert_eq!(retries[SideId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: Vec<T>,
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(side_count: usize, factory: impl Fn(SideId) -> T) -> Self {
        assert!(side_count > 0, "Must have at least 1 side");
        assert!(side_count <= MAX_SIDES, "At most 2 sides supported");

        let data = (0..side_count as u8).map(|i| factory(SideId(i))).collect();

        Self { data }
    }

    /// Create a new SideMap with all entries set to the same value.
    pub fn with_value(side_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(side_count, |_| value.clone())
    }

    /// Get the number of sides.
    #[must_use]
    pub fn side_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: SideId) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: SideId) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (SideId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SideId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (SideId(i as u8), v))
    }

    /// Iterate over (SideId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SideId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (SideId(i as u8), v))
    }

    /// Iterate over all side IDs.
    pub fn side_ids(&self) -> impl Iterator<Item = SideId> {
        (0..self.data.len() as u8).map(SideId)
    }
}

impl<T> Index<SideId> for SideMap<T> {
    type Output = T;

    fn index(&self, side: SideId) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<SideId> for SideMap<T> {
    fn index_mut(&mut self, side: SideId) -> &mut Self::Output {
        self.get_mut(side)
    }
}
