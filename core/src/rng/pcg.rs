//! PCG32 (XSH-RR)
//!
//! 64-bit LCG state with a seed-derived odd increment. Output applies an
//! xorshift of the high state bits followed by a rotate whose count comes from
//! the top 5 bits of the old state.

use serde::{Deserialize, Serialize};

use super::{expand, BitEngine};

const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

/// Permuted congruential generator with 32-bit output
///
/// # Example
/// ```
/// use tc_random_core::{BitEngine, Pcg32};
///
/// let mut rng = Pcg32::from_seed(0);
/// assert_eq!(rng.next_raw(), 1092706980);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pcg32 {
    state: u64,
    /// Stream increment, always odd
    inc: u64,
}

impl Pcg32 {
    pub const NUM_BITS: u32 = 32;
}

impl BitEngine for Pcg32 {
    fn from_seed(seed: u64) -> Self {
        Self {
            state: expand(seed),
            inc: expand(seed.wrapping_add(1)) | 1,
        }
    }

    fn reseed(&mut self, seed: u64) {
        *self = Self::from_seed(seed);
    }

    #[inline(always)]
    fn next_raw(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn num_bits(&self) -> u32 {
        Self::NUM_BITS
    }
}
