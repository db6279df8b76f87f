//! Dice primitives and the RNG seam every resolver rolls through.
//!
//! All randomness in the engine is drawn from a [`DiceSource`]. Production runs
//! use [`SeededDice`] so a career replays identically from its seed; tests use
//! [`ScriptedDice`] to force exact faces.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;

use crate::constants::DIE_FACES;

/// Source of die faces and uniform slot picks.
pub trait DiceSource {
    /// Roll one six-sided die, returning a face in `1..=6`.
    fn roll_die(&mut self) -> u8;

    /// Uniform index in `0..bound`. `bound` is always at least 1.
    fn below(&mut self, bound: usize) -> usize;

    /// Roll two independent dice.
    fn roll_pair(&mut self) -> DicePair {
        let a = self.roll_die();
        let b = self.roll_die();
        DicePair::new(a, b)
    }

    /// Roll an exploding die: every 6 earns another roll, without limit.
    fn exploding_roll(&mut self) -> ExplodingRoll {
        let mut chain = ExplodeChain::new();
        loop {
            let face = self.roll_die();
            chain.push(face);
            if face != DIE_FACES {
                break;
            }
        }
        ExplodingRoll { chain }
    }
}

impl<D: DiceSource + ?Sized> DiceSource for &mut D {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }

    fn below(&mut self, bound: usize) -> usize {
        (**self).below(bound)
    }
}

/// Two dice and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DicePair {
    pub a: u8,
    pub b: u8,
    pub sum: u8,
}

impl DicePair {
    #[must_use]
    pub const fn new(a: u8, b: u8) -> Self {
        Self { a, b, sum: a + b }
    }

    /// Both dice show at least `face`.
    #[must_use]
    pub const fn both_at_least(self, face: u8) -> bool {
        self.a >= face && self.b >= face
    }
}

impl fmt::Display for DicePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.a, self.b, self.sum)
    }
}

/// Faces rolled by one exploding die; most chains stop after one face.
pub type ExplodeChain = SmallVec<[u8; 4]>;

/// Result of one exploding die, keeping every face for narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplodingRoll {
    chain: ExplodeChain,
}

impl ExplodingRoll {
    /// Faces in roll order. Every face but the last is a 6.
    #[must_use]
    pub fn chain(&self) -> &[u8] {
        &self.chain
    }

    /// First face rolled.
    #[must_use]
    pub fn first(&self) -> u8 {
        self.chain.first().copied().unwrap_or_default()
    }

    /// Sum of every face in the chain.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.chain.iter().map(|&face| u32::from(face)).sum()
    }
}

impl fmt::Display for ExplodingRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.chain.iter().map(u8::to_string).collect();
        write!(f, "{} (adds {})", faces.join(", "), self.total())
    }
}

/// Deterministic dice backed by ChaCha20.
#[derive(Debug, Clone)]
pub struct SeededDice {
    seed: u64,
    rng: ChaCha20Rng,
}

impl SeededDice {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Seed the stream was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl DiceSource for SeededDice {
    fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=DIE_FACES)
    }

    fn below(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound.max(1))
    }
}

/// Replays a fixed script of faces. Intended for tests and fixtures.
///
/// Slot picks come from a separate queue and default to `0` once it runs dry,
/// which makes the district selection pick the first open slots.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
    picks: VecDeque<usize>,
    faces_rolled: usize,
}

impl ScriptedDice {
    #[must_use]
    pub fn new<I>(faces: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        Self {
            faces: faces.into_iter().collect(),
            picks: VecDeque::new(),
            faces_rolled: 0,
        }
    }

    /// Queue slot picks returned by [`DiceSource::below`].
    #[must_use]
    pub fn with_picks<I>(mut self, picks: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.picks.extend(picks);
        self
    }

    /// Append more faces to the end of the script.
    pub fn extend<I>(&mut self, faces: I)
    where
        I: IntoIterator<Item = u8>,
    {
        self.faces.extend(faces);
    }

    /// Faces still waiting to be rolled.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Faces consumed so far.
    #[must_use]
    pub const fn faces_rolled(&self) -> usize {
        self.faces_rolled
    }
}

impl DiceSource for ScriptedDice {
    /// # Panics
    ///
    /// Panics when the script is exhausted or holds a face outside `1..=6`.
    fn roll_die(&mut self) -> u8 {
        let Some(face) = self.faces.pop_front() else {
            panic!(
                "scripted dice exhausted after {} faces",
                self.faces_rolled
            );
        };
        assert!(
            (1..=DIE_FACES).contains(&face),
            "scripted face {face} is not a d6 face"
        );
        self.faces_rolled += 1;
        face
    }

    fn below(&mut self, bound: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(bound.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_die_stays_in_range() {
        let mut dice = SeededDice::from_seed(17);
        let mut seen = [false; 6];
        for _ in 0..2_000 {
            let face = dice.roll_die();
            assert!((1..=6).contains(&face));
            seen[usize::from(face - 1)] = true;
        }
        assert!(seen.iter().all(|&hit| hit), "every face should appear");
    }

    #[test]
    fn seeded_streams_replay() {
        let mut left = SeededDice::from_seed(99);
        let mut right = SeededDice::from_seed(99);
        let a: Vec<u8> = (0..64).map(|_| left.roll_die()).collect();
        let b: Vec<u8> = (0..64).map(|_| right.roll_die()).collect();
        assert_eq!(a, b);
        assert_eq!(left.seed(), 99);
    }

    #[test]
    fn pair_sums_faces() {
        let mut dice = ScriptedDice::new([5, 6]);
        let pair = dice.roll_pair();
        assert_eq!(pair, DicePair::new(5, 6));
        assert_eq!(pair.sum, 11);
        assert!(pair.both_at_least(5));
        assert_eq!(pair.to_string(), "5 + 6 = 11");
    }

    #[test]
    fn exploding_roll_chains_sixes() {
        let mut dice = ScriptedDice::new([6, 6, 2, 4]);
        let roll = dice.exploding_roll();
        assert_eq!(roll.chain(), &[6, 6, 2]);
        assert_eq!(roll.total(), 14);
        assert_eq!(roll.to_string(), "6, 6, 2 (adds 14)");
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn exploding_roll_never_below_first_face() {
        let mut dice = SeededDice::from_seed(3);
        for _ in 0..5_000 {
            let roll = dice.exploding_roll();
            assert!(roll.total() >= u32::from(roll.first()));
            assert!(roll.chain().len() < 64, "chain should terminate quickly");
        }
    }

    #[test]
    fn scripted_picks_clamp_to_bound() {
        let mut dice = ScriptedDice::new([]).with_picks([9, 2]);
        assert_eq!(dice.below(4), 3);
        assert_eq!(dice.below(10), 2);
        assert_eq!(dice.below(10), 0);
    }

    #[test]
    #[should_panic(expected = "scripted dice exhausted")]
    fn scripted_dice_panics_when_empty() {
        let mut dice = ScriptedDice::new([1]);
        let _ = dice.roll_die();
        let _ = dice.roll_die();
    }
}
