//! MT19937 Mersenne Twister
//!
//! 624-word state. The whole state is regenerated (twisted) every 624
//! outputs; each output is tempered. Seeding uses the standard
//! `init_genrand` recurrence on the low 32 bits of the seed, so sequences
//! match every reference MT19937 (seed 5489 → 3499211612, ...).

use serde::{Deserialize, Serialize};

use super::BitEngine;

const N: usize = 624;
const M: usize = 397;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;
/// Twist selection table indexed by the low bit of the combined word
const MAG01: [u32; 2] = [0, 0x9908_b0df];

/// Mersenne Twister with 32-bit output
///
/// The state is boxed; the struct itself stays pointer-sized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MersenneState", into = "MersenneState")]
pub struct MersenneTwister32 {
    mt: Box<[u32; N]>,
    index: usize,
}

/// Serialized form; validated on the way back in
#[derive(Serialize, Deserialize)]
struct MersenneState {
    mt: Vec<u32>,
    index: usize,
}

impl TryFrom<MersenneState> for MersenneTwister32 {
    type Error = String;

    fn try_from(state: MersenneState) -> Result<Self, Self::Error> {
        let len = state.mt.len();
        let mt: Box<[u32; N]> = state
            .mt
            .into_boxed_slice()
            .try_into()
            .map_err(|_| format!("Mersenne state must have {} words, got {}", N, len))?;
        if state.index >= N {
            return Err(format!("Mersenne index {} out of range", state.index));
        }
        Ok(Self {
            mt,
            index: state.index,
        })
    }
}

impl From<MersenneTwister32> for MersenneState {
    fn from(engine: MersenneTwister32) -> Self {
        Self {
            mt: engine.mt.to_vec(),
            index: engine.index,
        }
    }
}

impl MersenneTwister32 {
    pub const NUM_BITS: u32 = 32;

    fn init(&mut self, seed: u32) {
        self.mt[0] = seed;
        for i in 1..N {
            let prev = self.mt[i - 1];
            self.mt[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.index = 0;
    }

    /// Regenerate all 624 words
    fn twist(&mut self) {
        let mt = &mut self.mt;
        for i in 0..(N - M) {
            let y = (mt[i] & UPPER_MASK) | (mt[i + 1] & LOWER_MASK);
            mt[i] = mt[i + M] ^ (y >> 1) ^ MAG01[(y & 1) as usize];
        }
        for i in (N - M)..(N - 1) {
            let y = (mt[i] & UPPER_MASK) | (mt[i + 1] & LOWER_MASK);
            mt[i] = mt[i + M - N] ^ (y >> 1) ^ MAG01[(y & 1) as usize];
        }
        let y = (mt[N - 1] & UPPER_MASK) | (mt[0] & LOWER_MASK);
        mt[N - 1] = mt[M - 1] ^ (y >> 1) ^ MAG01[(y & 1) as usize];
    }
}

impl BitEngine for MersenneTwister32 {
    fn from_seed(seed: u64) -> Self {
        let mut engine = Self {
            mt: Box::new([0; N]),
            index: 0,
        };
        engine.init(seed as u32);
        engine
    }

    fn reseed(&mut self, seed: u64) {
        self.init(seed as u32);
    }

    #[inline]
    fn next_raw(&mut self) -> u32 {
        if self.index == 0 {
            self.twist();
        }
        let mut y = self.mt[self.index];
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        self.index = if self.index == N - 1 { 0 } else { self.index + 1 };
        y
    }

    fn num_bits(&self) -> u32 {
        Self::NUM_BITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_default_seed() {
        let mut rng = MersenneTwister32::from_seed(5489);
        assert_eq!(rng.next_raw(), 3499211612);
        assert_eq!(rng.next_raw(), 581869302);
        assert_eq!(rng.next_raw(), 3890346734);
    }

    #[test]
    fn test_twist_happens_every_624_outputs() {
        let mut rng = MersenneTwister32::from_seed(1);
        rng.next_raw();
        let after_first_twist = rng.mt.clone();
        for _ in 1..N {
            rng.next_raw();
        }
        assert_eq!(rng.index, 0);
        assert_eq!(rng.mt, after_first_twist, "no twist before the 625th output");
        rng.next_raw();
        assert_ne!(rng.mt, after_first_twist);
    }

    #[test]
    fn test_rejects_truncated_state() {
        let json = r#"{"mt":[1,2,3],"index":0}"#;
        let result: Result<MersenneTwister32, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_state_survives_json() {
        let mut rng = MersenneTwister32::from_seed(42);
        for _ in 0..700 {
            rng.next_raw();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: MersenneTwister32 = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.next_raw(), rng.next_raw());
    }
}
