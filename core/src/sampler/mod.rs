//! Generic sampling layer
//!
//! [`Sampler`] owns exactly one [`BitEngine`] and turns its raw output into
//! bounded integers, floats, booleans, shuffles and simple distribution
//! approximations.
//!
//! # Preconditions
//!
//! Bounds (`n > 0`, `b > a`) are caller contracts. They are checked with
//! `debug_assert!` only; release builds never pay for them and a violation
//! yields an unspecified value.
//!
//! # Concurrency
//!
//! A sampler is plain owned state. For parallel work give each worker its own
//! sampler seeded from a distinct value, e.g. `expand(stream_id)`. There is no
//! jump-ahead, so streams are independent in practice rather than provably
//! non-overlapping.

pub mod bounded;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RngError;
use crate::rng::BitEngine;
use bounded::{multiply_high, rejection_threshold};

/// Bits kept in the boolean cache after the draw that fills it
const BOOLEAN_CACHE_BITS: u32 = 8;

/// Random number sampler over a bit engine
///
/// # Example
/// ```
/// use tc_random_core::{Pcg32, Sampler};
///
/// let mut rng: Sampler<Pcg32> = Sampler::new(12345);
/// let die = rng.next_range(1, 7); // [1, 7)
/// assert!((1..7).contains(&die));
///
/// let p = rng.next_double();
/// assert!(p > 0.0 && p < 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sampler<E> {
    engine: E,
    /// Bits left over from the last raw draw used by `next_boolean`
    cached_bits: u32,
    /// Remaining cached bits, always in `[0, 8]`
    cached_bit_count: u32,
    /// Use the rejection loop in `next_below`
    reject_bias: bool,
}

impl<E: BitEngine> Sampler<E> {
    /// Create a sampler with a freshly seeded engine
    pub fn new(seed: u64) -> Self {
        Self::from_engine(E::from_seed(seed))
    }

    /// Wrap an already constructed engine
    pub fn from_engine(engine: E) -> Self {
        Self {
            engine,
            cached_bits: 0,
            cached_bit_count: 0,
            reject_bias: false,
        }
    }

    /// Enable or disable the strict (rejection) mode of `next_below`
    pub fn with_reject_bias(mut self, reject_bias: bool) -> Self {
        self.reject_bias = reject_bias;
        self
    }

    pub fn set_reject_bias(&mut self, reject_bias: bool) {
        self.reject_bias = reject_bias;
    }

    pub fn reject_bias(&self) -> bool {
        self.reject_bias
    }

    /// Reseed in place
    ///
    /// The boolean cache is emptied too, so a reseeded sampler behaves exactly
    /// like a new one built from the same seed.
    pub fn seed(&mut self, seed: u64) {
        debug!(seed, "reseeding sampler");
        self.engine.reseed(seed);
        self.cached_bits = 0;
        self.cached_bit_count = 0;
    }

    /// Advance the engine `count` times, discarding the output
    pub fn discard(&mut self, count: u64) {
        for _ in 0..count {
            self.engine.next_raw();
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn num_bits(&self) -> u32 {
        self.engine.num_bits()
    }

    pub fn max_plus_one(&self) -> f64 {
        self.engine.max_plus_one()
    }

    pub fn recip_max_plus_one(&self) -> f64 {
        self.engine.recip_max_plus_one()
    }

    /// Number of boolean draws still served from the cache
    pub fn cached_bit_count(&self) -> u32 {
        self.cached_bit_count
    }

    /// Raw engine output in `[0, 2^num_bits)`
    #[inline(always)]
    pub fn next_u32(&mut self) -> u32 {
        self.engine.next_raw()
    }

    /// Raw engine output, surfacing hardware entropy exhaustion
    #[inline]
    pub fn try_next_u32(&mut self) -> Result<u32, RngError> {
        self.engine.try_next_raw()
    }

    /// Uniform integer in `[0, n)`
    ///
    /// A 16-bit engine can reach at most 65536 distinct results, so bounds
    /// above `2^num_bits` leave gaps. Reject bias cannot correct those bounds
    /// and draws them like the fast path.
    ///
    /// Uses [`next_below_unbiased`](Self::next_below_unbiased) when reject
    /// bias is enabled, otherwise [`next_below_fast`](Self::next_below_fast).
    #[inline(always)]
    pub fn next_below(&mut self, n: u32) -> u32 {
        if self.reject_bias {
            self.next_below_unbiased(n)
        } else {
            self.next_below_fast(n)
        }
    }

    /// Multiply-high mapping into `[0, n)`, one raw draw
    ///
    /// Exact when `n` divides `2^num_bits`; otherwise some outputs are
    /// favoured by at most one raw value out of `2^num_bits`.
    #[inline(always)]
    pub fn next_below_fast(&mut self, n: u32) -> u32 {
        debug_assert!(n > 0, "n must be positive");
        let (r, _) = multiply_high(self.engine.next_raw(), n, self.engine.num_bits());
        debug_assert!(r < n);
        r
    }

    /// Exactly uniform integer in `[0, n)`
    ///
    /// Redraws while the product's leftover falls below the rejection
    /// threshold. The threshold is only computed when the leftover is
    /// already below `n`, which is rare for small `n`.
    #[inline]
    pub fn next_below_unbiased(&mut self, n: u32) -> u32 {
        debug_assert!(n > 0, "n must be positive");
        let num_bits = self.engine.num_bits();
        let (mut r, mut leftover) = multiply_high(self.engine.next_raw(), n, num_bits);
        if leftover < n {
            let threshold = rejection_threshold(n, num_bits);
            while leftover < threshold {
                (r, leftover) = multiply_high(self.engine.next_raw(), n, num_bits);
            }
        }
        debug_assert!(r < n);
        r
    }

    /// Fallible form of [`next_below`](Self::next_below)
    ///
    /// Surfaces hardware entropy exhaustion on every raw draw, including
    /// redraws in the rejection loop.
    pub fn try_next_below(&mut self, n: u32) -> Result<u32, RngError> {
        debug_assert!(n > 0, "n must be positive");
        let num_bits = self.engine.num_bits();
        let (mut r, mut leftover) = multiply_high(self.engine.try_next_raw()?, n, num_bits);
        if self.reject_bias && leftover < n {
            let threshold = rejection_threshold(n, num_bits);
            while leftover < threshold {
                (r, leftover) = multiply_high(self.engine.try_next_raw()?, n, num_bits);
            }
        }
        Ok(r)
    }

    /// Uniform integer in `[a, b)`
    #[inline(always)]
    pub fn next_range(&mut self, a: u32, b: u32) -> u32 {
        debug_assert!(b > a, "b must be greater than a");
        let r = a + self.next_below(b - a);
        debug_assert!(r >= a && r < b);
        r
    }

    /// Uniform `f32` in `[0, 1)`
    ///
    /// Single precision cannot represent every 32-bit raw value: the maximal
    /// raw rounds up to `2^32` and the result is exactly `1.0`. Callers that
    /// need a strict upper bound should use [`next_double`](Self::next_double).
    #[inline(always)]
    pub fn next_float(&mut self) -> f32 {
        (self.engine.next_raw() as f32 + 0.5) * self.engine.recip_max_plus_one() as f32
    }

    /// Uniform `f64` in `(0, 1)`, centred in each of the `2^num_bits` cells
    #[inline(always)]
    pub fn next_double(&mut self) -> f64 {
        let r = (self.engine.next_raw() as f64 + 0.5) * self.engine.recip_max_plus_one();
        debug_assert!(r < 1.0);
        r
    }

    /// Uniform `f64` in `[0, s)`
    #[inline(always)]
    pub fn next_double_scaled(&mut self, s: f64) -> f64 {
        self.next_double() * s
    }

    /// Uniform `f64` in `[a, b)`
    #[inline(always)]
    pub fn next_double_range(&mut self, a: f64, b: f64) -> f64 {
        debug_assert!(b > a, "b must be greater than a");
        a + self.next_double() * (b - a)
    }

    /// Fair coin flip
    ///
    /// One raw draw feeds nine consecutive calls: the filling call returns bit
    /// 0 and leaves eight bits cached. Only the low 9 bits of each raw value
    /// are used.
    #[inline(always)]
    pub fn next_boolean(&mut self) -> bool {
        if self.cached_bit_count == 0 {
            self.cached_bits = self.engine.next_raw();
            self.cached_bit_count = BOOLEAN_CACHE_BITS;
        } else {
            self.cached_bits >>= 1;
            self.cached_bit_count -= 1;
        }
        self.cached_bits & 1 == 1
    }

    /// Triangular sample on `(0, 1)` peaked at 0.5 (Irwin-Hall, 2 terms)
    #[inline]
    pub fn next_triangular(&mut self) -> f64 {
        (self.next_double() + self.next_double()) * 0.5
    }

    /// Bell-shaped sample on `(0, 1)` with mean 0.5 (Irwin-Hall, 3 terms)
    ///
    /// An approximation only: the support is bounded and there are no tails,
    /// and the variance is 1/36 rather than anything the caller chose.
    #[inline]
    pub fn next_gaussian(&mut self) -> f64 {
        const ONE_THIRD: f64 = 1.0 / 3.0;
        (self.next_double() + self.next_double() + self.next_double()) * ONE_THIRD
    }

    /// Fisher-Yates shuffle in place
    ///
    /// Every permutation is equally likely when the engine is uniform and
    /// reject bias is enabled. Lengths 0 and 1 are left untouched.
    pub fn shuffle<T>(&mut self, sequence: &mut [T]) {
        debug_assert!(sequence.len() <= u32::MAX as usize);
        for i in (1..sequence.len()).rev() {
            let r = self.next_below((i + 1) as u32) as usize;
            sequence.swap(i, r);
        }
    }

    /// Fill `sequence[..s]` with `0..s` and shuffle that prefix
    pub fn next_sequence<T: From<u32>>(&mut self, sequence: &mut [T], s: usize) {
        debug_assert!(s <= sequence.len(), "s exceeds sequence length");
        let prefix = &mut sequence[..s];
        for (i, slot) in prefix.iter_mut().enumerate() {
            *slot = T::from(i as u32);
        }
        self.shuffle(prefix);
    }

    /// Random permutation of `0..s`
    pub fn sequence(&mut self, s: usize) -> Vec<u32> {
        let mut sequence = vec![0u32; s];
        self.next_sequence(&mut sequence, s);
        sequence
    }
}
