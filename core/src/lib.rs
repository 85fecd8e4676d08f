//! TC Random Core - Rust Engine
//!
//! Fast, deterministic pseudorandom number generation: interchangeable bit
//! engines behind one generic sampling layer.
//!
//! # Architecture
//!
//! - **rng**: Bit engines (Lehmer MCG, PCG32, SplitMix, xorshift family,
//!   LCG, Mersenne Twister, hardware entropy) and seed expansion
//! - **sampler**: Bounded integers, floats, booleans, shuffles
//! - **config**: Runtime engine selection
//! - **fixture**: Reproducibility fixtures (seed → first raw outputs)
//! - **checkpoint**: Save/restore of sampler state
//!
//! # Critical Invariants
//!
//! 1. Same engine + same seed → same sequence, on every platform
//! 2. A sampler owns its engine exclusively; nothing is process-global
//! 3. Only the hardware engine can fail, and it fails with a bounded retry
//!
//! # Example
//! ```
//! use tc_random_core::{McgLehmer32, Sampler};
//!
//! let mut rng: Sampler<McgLehmer32> = Sampler::new(0);
//! let mut deck: Vec<u32> = (0..52).collect();
//! rng.shuffle(&mut deck);
//! assert_eq!(deck.len(), 52);
//! ```

// Module declarations
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod fixture;
pub mod rng;
pub mod sampler;

// Re-exports for convenience
pub use checkpoint::{compute_config_hash, load_checkpoint, save_checkpoint, SamplerCheckpoint};
pub use config::{AnyEngine, ConfiguredEngine, EngineKind, SamplerConfig};
pub use error::RngError;
pub use fixture::Fixture;
pub use rng::{
    expand, BitEngine, EntropySource, HardwareEntropyEngine, Lcg16, McgLehmer32,
    MersenneTwister32, Pcg32, RdRand, SoftwareFallback, SplitMix32, XorShift128,
    XorShift128Plus, XorShift64Star,
};
pub use sampler::Sampler;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn tc_random_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::sampler::PySampler>()?;
    m.add_function(wrap_pyfunction!(ffi::sampler::expand_seed, m)?)?;
    Ok(())
}
