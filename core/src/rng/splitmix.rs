//! SplitMix64 seed expansion and engine
//!
//! [`expand`] is the stateless avalanche mix used to seed every other engine.
//! [`SplitMix32`] runs the same recurrence as a counter-based generator.

use serde::{Deserialize, Serialize};

use super::BitEngine;

/// Weyl increment (golden ratio scaled to 64 bits)
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

#[inline(always)]
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Expand a seed into a well-distributed 64-bit value
///
/// Total and stateless. Adjacent inputs (`seed`, `seed + 1`, ...) give
/// uncorrelated outputs, which is what lets multi-word engines seed word `i`
/// from `expand(seed + i)`. Also usable as a fast integer hash.
///
/// # Example
/// ```
/// use tc_random_core::expand;
///
/// assert_eq!(expand(0), 0xe220a8397b1dcdaf);
/// assert_ne!(expand(1), expand(2));
/// ```
#[inline(always)]
pub fn expand(seed: u64) -> u64 {
    mix(seed.wrapping_add(GOLDEN_GAMMA))
}

/// SplitMix64 generator returning the top 32 bits of each mix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitMix32 {
    state: u64,
}

impl SplitMix32 {
    pub const NUM_BITS: u32 = 32;
}

impl BitEngine for SplitMix32 {
    fn from_seed(seed: u64) -> Self {
        Self {
            state: expand(seed),
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.state = expand(seed);
    }

    #[inline(always)]
    fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        (mix(self.state) >> 32) as u32
    }

    fn num_bits(&self) -> u32 {
        Self::NUM_BITS
    }
}
