//! Shared helpers for integration tests

#![allow(dead_code)]

use tc_random_core::BitEngine;

/// Pearson chi-square statistic against a uniform expectation
pub fn chi_square(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Engine wrapper counting raw draws
#[derive(Debug, Clone)]
pub struct Counting<E> {
    pub inner: E,
    pub draws: u64,
}

impl<E: BitEngine> BitEngine for Counting<E> {
    fn from_seed(seed: u64) -> Self {
        Self {
            inner: E::from_seed(seed),
            draws: 0,
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.inner.reseed(seed);
    }

    fn next_raw(&mut self) -> u32 {
        self.draws += 1;
        self.inner.next_raw()
    }

    fn num_bits(&self) -> u32 {
        self.inner.num_bits()
    }
}
