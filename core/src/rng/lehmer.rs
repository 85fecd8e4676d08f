//! Lehmer multiplicative congruential generator
//!
//! 128-bit state multiplied by a fixed odd 64-bit constant. The high 64 bits
//! of each product serve two 32-bit outputs: low half first, then high half.

use serde::{Deserialize, Serialize};

use super::{expand, BitEngine};

const LEHMER_MULT: u128 = 0xda94_2042_e4dd_58b5;

/// 128-bit MCG with 32-bit output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McgLehmer32 {
    state: u128,
    /// High half of the last product, not yet returned
    pending: Option<u32>,
}

impl McgLehmer32 {
    pub const NUM_BITS: u32 = 32;
}

impl BitEngine for McgLehmer32 {
    fn from_seed(seed: u64) -> Self {
        let high = expand(seed) as u128;
        let low = expand(seed.wrapping_add(1)) as u128;
        Self {
            state: (high << 64).wrapping_add(low),
            pending: None,
        }
    }

    fn reseed(&mut self, seed: u64) {
        *self = Self::from_seed(seed);
    }

    #[inline(always)]
    fn next_raw(&mut self) -> u32 {
        if let Some(value) = self.pending.take() {
            return value;
        }
        self.state = self.state.wrapping_mul(LEHMER_MULT);
        let high = (self.state >> 64) as u64;
        self.pending = Some((high >> 32) as u32);
        high as u32
    }

    fn num_bits(&self) -> u32 {
        Self::NUM_BITS
    }
}
