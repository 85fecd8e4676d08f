//! Lemire's multiply-high bounded sampling
//!
//! Maps a raw `num_bits`-wide value into `[0, n)` without a division on the
//! common path. See D. Lemire, "Fast Random Integer Generation in an
//! Interval" (2019).
//!
//! For a raw value `x` the double-width product `m = x * n` splits into
//! `m >> num_bits` (the result) and `m & (2^num_bits - 1)` (the leftover).
//! The result is exactly uniform when `n` divides `2^num_bits`. Otherwise
//! rejecting every raw whose leftover falls below
//! [`rejection_threshold`] leaves exactly `floor(2^num_bits / n)` accepted
//! raws per output.
//!
//! Bounds of `2^num_bits` or more cannot be corrected: there are fewer raw
//! values than outputs, so some outputs are unreachable. No raw is rejected
//! for such bounds.

/// Split `raw * n` into `(result, leftover)` at `num_bits`
#[inline(always)]
pub fn multiply_high(raw: u32, n: u32, num_bits: u32) -> (u32, u32) {
    let m = raw as u64 * n as u64;
    let mask = (1u64 << num_bits) - 1;
    ((m >> num_bits) as u32, (m & mask) as u32)
}

/// `(2^num_bits - n) mod n`: leftovers below this are rejected
///
/// Evaluated in 64-bit so it is exact for both 16- and 32-bit engines. The
/// `n.wrapping_neg() % n` shortcut only agrees when `num_bits` is 32.
/// Zero when `n >= 2^num_bits`.
#[inline]
pub fn rejection_threshold(n: u32, num_bits: u32) -> u32 {
    debug_assert!(n > 0, "n must be positive");
    let range = 1u64 << num_bits;
    let n = n as u64;
    if n >= range {
        return 0;
    }
    ((range - n) % n) as u32
}

/// Whether a raw value survives the rejection step for bound `n`
#[inline(always)]
pub fn is_accepted(raw: u32, n: u32, num_bits: u32) -> bool {
    let (_, leftover) = multiply_high(raw, n, num_bits);
    leftover >= n || leftover >= rejection_threshold(n, num_bits)
}
