//! Xorshift family generators
//!
//! Fast shift-xor recurrences (Marsaglia 2003 and later variants). Each
//! returns the upper half of its combined state because the low bits are the
//! weakest.
//!
//! # Variants
//!
//! - [`XorShift128`]: four 32-bit words, 16-bit output
//! - [`XorShift128Plus`]: two 64-bit words, 32-bit output
//! - [`XorShift64Star`]: one 64-bit word with a multiplicative scramble,
//!   32-bit output
//!
//! # Determinism
//!
//! Same seed → same sequence. Every word is seeded through
//! [`expand`](super::expand), so a zero seed never yields the all-zero state
//! in practice.

use serde::{Deserialize, Serialize};

use super::{expand, BitEngine};

/// Marsaglia xorshift128 with 16-bit output
///
/// # Example
/// ```
/// use tc_random_core::{BitEngine, XorShift128};
///
/// let mut rng = XorShift128::from_seed(12345);
/// let value = rng.next_raw();
/// assert!(value < 1 << 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XorShift128 {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl XorShift128 {
    pub const NUM_BITS: u32 = 16;
}

impl BitEngine for XorShift128 {
    fn from_seed(seed: u64) -> Self {
        Self {
            x: expand(seed) as u32,
            y: expand(seed.wrapping_add(1)) as u32,
            z: expand(seed.wrapping_add(2)) as u32,
            w: expand(seed.wrapping_add(3)) as u32,
        }
    }

    fn reseed(&mut self, seed: u64) {
        *self = Self::from_seed(seed);
    }

    #[inline(always)]
    fn next_raw(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = (self.w ^ (self.w >> 19)) ^ (t ^ (t >> 8));
        self.w >> 16
    }

    fn num_bits(&self) -> u32 {
        Self::NUM_BITS
    }
}

/// xorshift128+ with 32-bit output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XorShift128Plus {
    k1: u64,
    k2: u64,
}

impl XorShift128Plus {
    pub const NUM_BITS: u32 = 32;
}

impl BitEngine for XorShift128Plus {
    fn from_seed(seed: u64) -> Self {
        Self {
            k1: expand(seed),
            k2: expand(seed.wrapping_add(1)),
        }
    }

    fn reseed(&mut self, seed: u64) {
        *self = Self::from_seed(seed);
    }

    #[inline(always)]
    fn next_raw(&mut self) -> u32 {
        let mut s1 = self.k1;
        let s0 = self.k2;
        self.k1 = s0;
        s1 ^= s1 << 23;
        self.k2 = s1 ^ s0 ^ (s1 >> 18) ^ (s0 >> 5);
        (self.k2.wrapping_add(s0) >> 32) as u32
    }

    fn num_bits(&self) -> u32 {
        Self::NUM_BITS
    }
}

/// xorshift64* with 32-bit output
///
/// The scramble multiplies the state *before* it is advanced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub const NUM_BITS: u32 = 32;
}

impl BitEngine for XorShift64Star {
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
        let result = self.state.wrapping_mul(0xd989_bcac_c137_dcd5);
        self.state ^= self.state >> 11;
        self.state ^= self.state << 31;
        self.state ^= self.state >> 18;
        (result >> 32) as u32
    }

    fn num_bits(&self) -> u32 {
        Self::NUM_BITS
    }
}
