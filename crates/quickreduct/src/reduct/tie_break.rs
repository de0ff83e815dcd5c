//! Tie-breaking among zero-score growth candidates.
//!
//! When no candidate attribute explains any instance, growth still adds one,
//! chosen uniformly at random so low attribute indices are not favoured. The
//! source of randomness is injectable so runs can be reproduced.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Picks one of `n` tied candidates.
pub trait TieBreaker: Send {
    /// Return an index in `0..n`. `n` is at least 1.
    fn pick(&mut self, n: usize) -> usize;
}

/// Uniform choice driven by a random number generator.
#[derive(Debug, Clone)]
pub struct RngTieBreaker<R> {
    rng: R,
}

impl<R: Rng + Send> RngTieBreaker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngTieBreaker<Xoshiro256PlusPlus> {
    /// Xoshiro-backed tie breaker seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> TieBreaker for RngTieBreaker<R> {
    fn pick(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }
}

/// Always picks the first (lowest-index) candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl TieBreaker for FirstCandidate {
    fn pick(&mut self, _n: usize) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn seeded_picks_are_reproducible() {
        let mut a = RngTieBreaker::seeded(7);
        let mut b = RngTieBreaker::seeded(7);
        let picks_a: Vec<usize> = (0..32).map(|_| a.pick(5)).collect();
        let picks_b: Vec<usize> = (0..32).map(|_| b.pick(5)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|&i| i < 5));
    }

    #[test]
    fn picks_cover_all_candidates() {
        let mut breaker = RngTieBreaker::new(StdRng::seed_from_u64(3));
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[breaker.pick(4)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn single_candidate() {
        assert_eq!(RngTieBreaker::seeded(1).pick(1), 0);
        assert_eq!(RngTieBreaker::seeded(1).pick(0), 0);
        assert_eq!(FirstCandidate.pick(9), 0);
    }
}
