//! Dice randomness.
//!
//! Rolling is an explicit dependency: Start takes a [`DiceSource`] so the
//! caller decides where faces come from.
//!
//! - [`GameRng`]: seeded ChaCha8, forkable into independent per-round streams,
//!   with O(1) state capture for checkpointing.
//! - [`LoadedDice`]: a scripted face sequence for tests and replays.
//!
//! Sources are plain owned values, so concurrent rounds each use their own
//! generator and no generator state is shared.
//!
//! ```
//! use liars_dice::core::{DiceSource, GameRng};
//!
//! let mut table_rng = GameRng::new(42);
//! let mut round_rng = table_rng.fork();
//!
//! let face = round_rng.roll_die();
//! assert!((1..=6).contains(&face.get()));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::dice::FaceValue;
use crate::error::RulesError;

/// Source of die faces, each uniform over 1..=6.
pub trait DiceSource {
    /// Roll a single die.
    fn roll_die(&mut self) -> FaceValue;

    /// Roll `count` dice.
    fn roll_dice(&mut self, count: usize) -> Vec<FaceValue> {
        (0..count).map(|_| self.roll_die()).collect()
    }
}

/// Deterministic RNG for dice.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from the thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence, so a table
    /// can hand every round its own stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

impl DiceSource for GameRng {
    fn roll_die(&mut self) -> FaceValue {
        FaceValue::from_roll(self.inner.gen_range(FaceValue::MIN..=FaceValue::MAX))
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}

/// Scripted dice: replays a fixed face sequence, wrapping at the end.
#[derive(Clone, Debug)]
pub struct LoadedDice {
    faces: Vec<FaceValue>,
    next: usize,
}

impl LoadedDice {
    /// Replay `faces` in order. Every face must be in 1..=6.
    pub fn new(faces: &[u8]) -> Result<Self, RulesError> {
        if faces.is_empty() {
            return Err(RulesError::InvalidArgument(
                "loaded dice need at least one face".to_string(),
            ));
        }
        let faces = faces
            .iter()
            .map(|&f| FaceValue::new(f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { faces, next: 0 })
    }

    /// Every die shows `face`.
    #[must_use]
    pub fn all(face: FaceValue) -> Self {
        Self {
            faces: vec![face],
            next: 0,
        }
    }
}

impl DiceSource for LoadedDice {
    fn roll_die(&mut self) -> FaceValue {
        let face = self.faces[self.next];
        self.next = (self.next + 1) % self.faces.len();
        face
    }
}
