//! Seeded dice.
//!
//! Rules never draw randomness. A roll reaches the engine as a
//! [`RollDiceEvent`](crate::events::RollDiceEvent) holding concrete faces, and
//! `GameRng` is what callers use to pick those faces reproducibly. The
//! generator is ChaCha8, so a seed yields the same faces on every platform.
//!
//! ```
//! use rust_boards::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.roll(6), b.roll(6));
//! ```

use std::hash::Hasher;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Golden-ratio increment used to spread fork seeds apart.
const FORK_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Clone, Debug)]
pub struct GameRng {
    stream: ChaCha8Rng,
    seed: u64,
    forks: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::resume(seed, 0, 0)
    }

    fn resume(seed: u64, word_pos: u128, forks: u64) -> Self {
        let mut stream = ChaCha8Rng::seed_from_u64(seed);
        stream.set_word_pos(word_pos);
        Self { stream, seed, forks }
    }

    /// Split off a child generator. The n-th fork of a seed is always the same
    /// child, and forking does not advance this generator's own faces.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.forks += 1;
        Self::new(self.seed.wrapping_add(FORK_STRIDE.wrapping_mul(self.forks)))
    }

    /// A stream keyed by `context`, e.g. one per die id. Independent of how far
    /// this generator has advanced.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut key = FxHasher::default();
        key.write_u64(self.seed);
        key.write(context.as_bytes());
        Self::new(key.finish())
    }

    /// One face in `1..=sides`. A die with no sides shows 0.
    pub fn roll(&mut self, sides: u32) -> u32 {
        match sides {
            0 => 0,
            n => self.stream.gen_range(1..=n),
        }
    }

    pub fn roll_many(&mut self, count: usize, sides: u32) -> Vec<u32> {
        std::iter::repeat_with(|| self.roll(sides)).take(count).collect()
    }

    /// Snapshot of the stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.stream.get_word_pos(),
            fork_counter: self.forks,
        }
    }

    #[must_use]
    pub fn from_state(saved: &GameRngState) -> Self {
        Self::resume(saved.seed, saved.word_pos, saved.fork_counter)
    }
}

/// Where a [`GameRng`] is in its stream. Restoring is O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha word counter.
    pub word_pos: u128,
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_faces() {
        let (mut a, mut b) = (GameRng::new(42), GameRng::new(42));
        let faces: Vec<_> = (0..100).map(|_| a.roll(6)).collect();
        assert_eq!(faces, b.roll_many(100, 6));
    }

    #[test]
    fn test_faces_in_range() {
        let mut rng = GameRng::new(3);
        assert!(rng.roll_many(500, 6).iter().all(|f| (1..=6).contains(f)));
        assert_eq!(rng.roll(0), 0);
        assert!(rng.roll_many(20, 1).iter().all(|&f| f == 1));
    }

    #[test]
    fn test_forks_are_reproducible() {
        let mut parent = GameRng::new(42);
        let mut child = parent.fork();
        assert_ne!(parent.roll_many(10, 1000), child.roll_many(10, 1000));

        let mut second = GameRng::new(42);
        second.fork();
        let mut second_child = second.fork();
        let mut replay = GameRng::new(42);
        replay.fork();
        assert_eq!(second_child.roll_many(5, 1000), replay.fork().roll_many(5, 1000));
    }

    #[test]
    fn test_context_streams_ignore_position() {
        let mut rng = GameRng::new(42);
        let mut white = rng.for_context("white-die");
        let mut black = rng.for_context("black-die");
        assert_ne!(white.roll_many(10, 1000), black.roll_many(10, 1000));

        let expected = GameRng::new(42).for_context("white-die").roll_many(10, 1000);
        rng.roll_many(9, 6);
        assert_eq!(rng.for_context("white-die").roll_many(10, 1000), expected);
    }

    #[test]
    fn test_restore_continues_stream() {
        let mut rng = GameRng::new(42);
        rng.roll_many(37, 6);
        rng.fork();

        let saved = rng.state();
        assert_eq!(saved.fork_counter, 1);
        let expected = rng.roll_many(10, 6);

        let json = serde_json::to_string(&saved).unwrap();
        let saved: GameRngState = serde_json::from_str(&json).unwrap();
        assert_eq!(GameRng::from_state(&saved).roll_many(10, 6), expected);
    }
}
