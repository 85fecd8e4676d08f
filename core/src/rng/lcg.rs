//! Classic 32-bit linear congruential generator
//!
//! Uses the glibc constants. Only the top 16 bits are returned because the
//! low bits of a power-of-two LCG have short periods.

use serde::{Deserialize, Serialize};

use super::{expand, BitEngine};

const LCG_MULT: u32 = 1_103_515_245;
const LCG_INC: u32 = 12_345;

/// 32-bit LCG with 16-bit output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg16 {
    state: u32,
}

impl Lcg16 {
    pub const NUM_BITS: u32 = 16;
}

impl BitEngine for Lcg16 {
    fn from_seed(seed: u64) -> Self {
        Self {
            state: expand(seed) as u32,
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.state = expand(seed) as u32;
    }

    #[inline(always)]
    fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MULT).wrapping_add(LCG_INC);
        self.state >> 16
    }

    fn num_bits(&self) -> u32 {
        Self::NUM_BITS
    }
}
