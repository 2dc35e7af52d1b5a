#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic xorshift32 random source used to carve and explore mazes.
//!
//! Every consumer receives the source explicitly. The source implements
//! [`RngCore`], so systems can be driven by any other `rand` generator too.

use std::time::{SystemTime, UNIX_EPOCH};

use maze_trail_core::MazeError;
use rand::{RngCore, SeedableRng};
use rand_core::impls;

/// Non-zero state substituted whenever a seed would collapse to zero.
const FALLBACK_SEED: u32 = 0x9e37_79b9;

/// Seedable xorshift32 stream.
///
/// Zero is a fixed point of the recurrence, so the state is never allowed to
/// become zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Creates a stream starting from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::DegenerateSeed`] when `seed` is zero.
    pub fn new(seed: u32) -> Result<Self, MazeError> {
        if seed == 0 {
            return Err(MazeError::DegenerateSeed);
        }
        Ok(Self { state: seed })
    }

    /// Creates a stream seeded from the wall clock.
    #[must_use]
    pub fn from_time() -> Self {
        Self {
            state: clock_seed(),
        }
    }

    /// Resets the internal state to `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::DegenerateSeed`] when `seed` is zero; the previous
    /// state is kept in that case.
    pub fn seed(&mut self, seed: u32) -> Result<(), MazeError> {
        if seed == 0 {
            return Err(MazeError::DegenerateSeed);
        }
        self.state = seed;
        Ok(())
    }

    /// Current internal state.
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Advances the recurrence and returns the new state.
    pub fn next(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }
}

impl RngCore for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        self.next()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        let state = u32::from_le_bytes(seed);
        Self {
            state: if state == 0 { FALLBACK_SEED } else { state },
        }
    }
}

/// Folds the current wall-clock nanoseconds into a non-zero 32-bit seed.
#[must_use]
pub fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let folded = (nanos as u32) ^ ((nanos >> 32) as u32) ^ ((nanos >> 64) as u32);
    if folded == 0 {
        FALLBACK_SEED
    } else {
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_outputs_match_reference_recurrence() {
        let mut rng = XorShift32::new(1).expect("non-zero seed");
        assert_eq!(rng.next(), 270_369);
        assert_eq!(rng.next(), 67_634_689);
        assert_eq!(rng.next(), 2_647_435_461);
    }

    #[test]
    fn zero_seed_is_rejected() {
        assert_eq!(XorShift32::new(0), Err(MazeError::DegenerateSeed));

        let mut rng = XorShift32::new(7).expect("non-zero seed");
        assert_eq!(rng.seed(0), Err(MazeError::DegenerateSeed));
        assert_eq!(rng.state(), 7);
    }

    #[test]
    fn reseeding_restarts_the_stream() {
        let mut rng = XorShift32::new(12_345).expect("non-zero seed");
        let first: Vec<u32> = (0..3).map(|_| rng.next()).collect();
        rng.seed(12_345).expect("non-zero seed");
        let second: Vec<u32> = (0..3).map(|_| rng.next()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![3_336_926_330, 1_697_253_807, 2_816_511_904]);
    }

    #[test]
    fn zero_byte_seed_falls_back_to_non_zero_state() {
        let rng = XorShift32::from_seed([0; 4]);
        assert_ne!(rng.state(), 0);
    }

    #[test]
    fn clock_seed_is_never_zero() {
        assert_ne!(clock_seed(), 0);
        assert_ne!(XorShift32::from_time().state(), 0);
    }

    #[test]
    fn rng_core_matches_inherent_stream() {
        let mut inherent = XorShift32::new(42).expect("non-zero seed");
        let mut via_trait = inherent.clone();
        for _ in 0..8 {
            assert_eq!(inherent.next(), via_trait.next_u32());
        }
    }
}
