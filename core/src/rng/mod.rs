//! Bit engines
//!
//! Each engine produces one raw unsigned integer of a fixed bit-width per
//! call. Engines are interchangeable behind [`BitEngine`]; the
//! [`Sampler`](crate::Sampler) turns their raw output into higher-level draws.
//!
//! All software engines seed every word of their state through
//! [`expand`] with consecutive seed offsets, so adjacent seeds give
//! uncorrelated streams.
//!
//! CRITICAL: Output sequences are pinned by fixtures. Any change to a
//! recurrence, constant or seeding rule is a breaking change.

mod hardware;
mod lcg;
mod lehmer;
mod mersenne;
mod pcg;
mod splitmix;
mod xorshift;

pub use hardware::{
    EntropySource, HardwareEntropyEngine, RdRand, SoftwareFallback, DEFAULT_MAX_ATTEMPTS,
};
pub use lcg::Lcg16;
pub use lehmer::McgLehmer32;
pub use mersenne::MersenneTwister32;
pub use pcg::Pcg32;
pub use splitmix::{expand, SplitMix32};
pub use xorshift::{XorShift128, XorShift128Plus, XorShift64Star};

use crate::error::RngError;

/// Contract shared by every engine variant
///
/// Raw outputs lie in `[0, 2^num_bits)` where `num_bits` is 16 or 32.
/// State is a pure function of the last seed and the calls since.
pub trait BitEngine {
    /// Construct an engine initialized from `seed`
    fn from_seed(seed: u64) -> Self
    where
        Self: Sized;

    /// Re-initialize in place, discarding all prior state
    fn reseed(&mut self, seed: u64);

    /// Produce the next raw value
    fn next_raw(&mut self) -> u32;

    /// Fallible form of [`next_raw`](BitEngine::next_raw)
    ///
    /// Software engines cannot fail. Engines backed by an external entropy
    /// source override this to report exhaustion instead of panicking.
    fn try_next_raw(&mut self) -> Result<u32, RngError> {
        Ok(self.next_raw())
    }

    /// Width of each raw output in bits
    fn num_bits(&self) -> u32;

    /// `2^num_bits` as a double
    fn max_plus_one(&self) -> f64 {
        (1u64 << self.num_bits()) as f64
    }

    /// `1 / 2^num_bits`
    fn recip_max_plus_one(&self) -> f64 {
        1.0 / self.max_plus_one()
    }
}
