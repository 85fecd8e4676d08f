//! Hardware entropy engine
//!
//! Draws physical entropy through a narrow capability, [`EntropySource`]:
//! "try to draw one 32-bit word, report success or failure". The retry policy
//! lives in [`HardwareEntropyEngine`] and is testable without the instruction.
//!
//! The instruction-level source is [`RdRand`] (x86_64 `RDRAND`, detected at
//! runtime). Platforms without it can substitute [`SoftwareFallback`] without
//! touching the sampler.
//!
//! Roughly an order of magnitude slower than the software engines. Select it
//! only when hardware entropy is explicitly required.

use tracing::{debug, trace, warn};

use super::BitEngine;
use crate::error::RngError;

/// Retry limit recommended for RDRAND before treating the unit as failed
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Capability: draw one word of entropy
pub trait EntropySource {
    /// Whether the source can ever succeed on this machine
    fn is_available(&self) -> bool;

    /// One attempt. `None` means this attempt failed; callers may retry.
    fn try_draw(&mut self) -> Option<u32>;
}

/// x86_64 `RDRAND` instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdRand {
    available: bool,
}

impl RdRand {
    pub fn new() -> Self {
        Self {
            available: rdrand_supported(),
        }
    }
}

impl Default for RdRand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "x86_64")]
fn rdrand_supported() -> bool {
    std::is_x86_feature_detected!("rdrand")
}

#[cfg(not(target_arch = "x86_64"))]
fn rdrand_supported() -> bool {
    false
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "rdrand")]
unsafe fn rdrand32() -> Option<u32> {
    let mut value = 0u32;
    if core::arch::x86_64::_rdrand32_step(&mut value) == 1 {
        Some(value)
    } else {
        None
    }
}

impl EntropySource for RdRand {
    fn is_available(&self) -> bool {
        self.available
    }

    #[cfg(target_arch = "x86_64")]
    fn try_draw(&mut self) -> Option<u32> {
        if !self.available {
            return None;
        }
        // SAFETY: `available` is only true when the CPU reports RDRAND support.
        unsafe { rdrand32() }
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn try_draw(&mut self) -> Option<u32> {
        None
    }
}

/// Software engine standing in for the hardware source
///
/// Always succeeds. 16-bit engines are drawn twice per word so the source
/// still yields full 32-bit values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareFallback<E> {
    engine: E,
}

impl<E: BitEngine> SoftwareFallback<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }
}

impl<E: BitEngine> Default for SoftwareFallback<E> {
    fn default() -> Self {
        Self::new(E::from_seed(0))
    }
}

impl<E: BitEngine> EntropySource for SoftwareFallback<E> {
    fn is_available(&self) -> bool {
        true
    }

    fn try_draw(&mut self) -> Option<u32> {
        if self.engine.num_bits() >= 32 {
            Some(self.engine.next_raw())
        } else {
            let high = self.engine.next_raw();
            let low = self.engine.next_raw();
            Some((high << 16) | (low & 0xffff))
        }
    }
}

/// Engine backed by an [`EntropySource`], with a bounded retry
///
/// Seeds are ignored. Each draw makes up to `max_attempts` attempts, hinting
/// the CPU between them, then fails with
/// [`RngError::EntropyUnavailable`].
#[derive(Debug, Clone)]
pub struct HardwareEntropyEngine<S = RdRand> {
    source: S,
    max_attempts: u32,
}

impl<S: EntropySource> HardwareEntropyEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the per-draw attempt limit
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        debug_assert!(max_attempts > 0, "max_attempts must be positive");
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_available(&self) -> bool {
        self.source.is_available()
    }
}

impl HardwareEntropyEngine<RdRand> {
    /// Construct over `RDRAND`, failing if the CPU lacks the instruction
    pub fn detect() -> Result<Self, RngError> {
        let source = RdRand::new();
        if !source.is_available() {
            debug!("RDRAND not supported on this CPU");
            return Err(RngError::EntropyUnavailable { attempts: 0 });
        }
        Ok(Self::new(source))
    }
}

impl<S: EntropySource + Default> BitEngine for HardwareEntropyEngine<S> {
    fn from_seed(_seed: u64) -> Self {
        Self::new(S::default())
    }

    fn reseed(&mut self, _seed: u64) {
        trace!("reseed ignored by hardware entropy engine");
    }

    /// # Panics
    ///
    /// Panics if every attempt fails. Use
    /// [`try_next_raw`](BitEngine::try_next_raw) to handle exhaustion.
    fn next_raw(&mut self) -> u32 {
        match self.try_next_raw() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    fn try_next_raw(&mut self) -> Result<u32, RngError> {
        for attempt in 1..=self.max_attempts {
            if let Some(value) = self.source.try_draw() {
                if attempt > 1 {
                    trace!(attempt, "hardware entropy draw succeeded after retry");
                }
                return Ok(value);
            }
            std::hint::spin_loop();
        }
        warn!(attempts = self.max_attempts, "hardware entropy unavailable");
        Err(RngError::EntropyUnavailable {
            attempts: self.max_attempts,
        })
    }

    fn num_bits(&self) -> u32 {
        32
    }
}
