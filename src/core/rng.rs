//! Seeded dice.
//!
//! Instance generation draws every roll from a [`GameRng`]. A seed fixes the
//! whole stream; [`GameRng::fork`] splits off a child stream so that
//! independent consumers (one per experiment) do not shift each other's
//! rolls, and [`GameRngState`] checkpoints a stream mid-run.
//!
//! ```
//! use rust_ludo::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll_sequence(20), b.roll_sequence(20));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::dice::{Roll, DIE_FACES};

/// Golden-ratio increment spreading child seeds apart.
const FORK_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// ChaCha8-backed dice stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    forks: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            forks: 0,
        }
    }

    /// Seed this stream was started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Child stream; the n-th fork of a seed is always the same stream.
    ///
    /// Forking does not consume rolls from the parent.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.forks += 1;
        Self::new(self.seed.wrapping_add(self.forks.wrapping_mul(FORK_STRIDE)))
    }

    /// One die, uniform over `1..=6`.
    pub fn roll_die(&mut self) -> Roll {
        self.inner.gen_range(DIE_FACES)
    }

    pub fn roll_sequence(&mut self, len: usize) -> Vec<Roll> {
        (0..len).map(|_| self.roll_die()).collect()
    }

    /// Checkpoint of the stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            forks: self.forks,
        }
    }

    /// Resume a stream from a checkpoint.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            forks: state.forks,
        }
    }
}

/// Serializable stream position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position.
    pub word_pos: u128,
    /// Forks taken so far.
    pub forks: u64,
}
