//! Bag module - 7-bag random piece generation
//!
//! Each bag holds exactly one of every kind. Pieces are pulled out by uniform
//! random index extraction without replacement, so every run of 7 draws that
//! starts on a bag boundary is a permutation of all kinds.
//!
//! The generator is `StdRng` (ChaCha) seeded from the OS. A fixed seed gives a
//! reproducible sequence for tests and replays of a single session.

use arrayvec::ArrayVec;
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};

use crate::types::PieceKind;

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceBag {
    /// Remaining kinds, in draw order
    bag: ArrayVec<PieceKind, 7>,
    rng: StdRng,
}

impl PieceBag {
    /// Create a bag seeded from the operating system
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Create a deterministic bag
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            bag: ArrayVec::new(),
            rng,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bag.is_empty()
    }

    /// Number of kinds left before the next refill
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Draw a fresh permutation of all kinds.
    ///
    /// Kinds are extracted one at a time at a uniformly random index from a
    /// pool of the not-yet-drawn kinds.
    pub fn refill(&mut self) {
        let mut pool = ArrayVec::from(PieceKind::ALL);
        self.bag.clear();
        while !pool.is_empty() {
            let index = self.rng.random_range(0..pool.len());
            self.bag.push(pool.remove(index));
        }
    }

    /// Take the next kind, refilling first when the bag is empty.
    pub fn next_piece(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.refill();
        }
        // refill always leaves seven kinds behind
        self.bag.remove(0)
    }

    /// Upcoming kinds of the current bag
    pub fn peek(&self) -> &[PieceKind] {
        &self.bag
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bag_yields_each_kind_once_per_cycle() {
        let mut bag = PieceBag::with_seed(7);
        for _ in 0..20 {
            let cycle: HashSet<_> = (0..7).map(|_| bag.next_piece()).collect();
            assert_eq!(cycle.len(), 7);
            assert!(bag.is_empty());
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        let mut a = PieceBag::with_seed(12345);
        let mut b = PieceBag::with_seed(12345);
        let seq_a: Vec<_> = (0..28).map(|_| a.next_piece()).collect();
        let seq_b: Vec<_> = (0..28).map(|_| b.next_piece()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_refill_produces_permutation() {
        let mut bag = PieceBag::new();
        assert!(bag.is_empty());
        bag.refill();
        assert_eq!(bag.remaining(), 7);
        let mut kinds = bag.peek().to_vec();
        kinds.sort_by_key(|k| k.index());
        assert_eq!(kinds, PieceKind::ALL.to_vec());
    }
}
