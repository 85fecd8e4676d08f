//! PyO3 wrapper for Sampler
//!
//! # Example (from Python)
//!
//! ```python
//! from tc_random_core import Sampler
//!
//! rng = Sampler("pcg32", 12345)
//! die = rng.next_range(1, 7)
//! deck = rng.shuffle(list(range(52)))
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::checkpoint::{load_checkpoint, save_checkpoint};
use crate::config::{AnyEngine, EngineKind, SamplerConfig};
use crate::error::RngError;
use crate::rng::expand;
use crate::sampler::Sampler;

fn to_py_err(err: RngError) -> PyErr {
    match err {
        RngError::UnknownEngine(_) | RngError::InvalidConfig(_) => {
            PyValueError::new_err(err.to_string())
        }
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Python wrapper for a runtime-dispatched sampler
#[pyclass(name = "Sampler")]
pub struct PySampler {
    inner: Sampler<AnyEngine>,
    config: SamplerConfig,
}

#[pymethods]
impl PySampler {
    /// Create a sampler
    ///
    /// # Errors
    ///
    /// Raises ValueError for an unknown engine name.
    #[new]
    #[pyo3(signature = (engine, seed, reject_bias = false))]
    fn new(engine: &str, seed: u64, reject_bias: bool) -> PyResult<Self> {
        let kind: EngineKind = engine.parse().map_err(to_py_err)?;
        let config = SamplerConfig::new(kind, seed).with_reject_bias(reject_bias);
        let inner = config.build().map_err(to_py_err)?;
        Ok(PySampler { inner, config })
    }

    #[getter]
    fn engine(&self) -> &'static str {
        self.config.engine.name()
    }

    #[getter]
    fn num_bits(&self) -> u32 {
        self.inner.num_bits()
    }

    fn seed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.inner.seed(seed);
    }

    fn discard(&mut self, count: u64) {
        self.inner.discard(count);
    }

    /// Raw engine output
    ///
    /// Raises RuntimeError if the hardware engine runs out of attempts.
    fn next(&mut self) -> PyResult<u32> {
        self.inner.try_next_u32().map_err(to_py_err)
    }

    fn next_below(&mut self, n: u32) -> PyResult<u32> {
        if n == 0 {
            return Err(PyValueError::new_err("n must be positive"));
        }
        self.inner.try_next_below(n).map_err(to_py_err)
    }

    fn next_range(&mut self, a: u32, b: u32) -> PyResult<u32> {
        if b <= a {
            return Err(PyValueError::new_err("b must be greater than a"));
        }
        Ok(a + self.inner.try_next_below(b - a).map_err(to_py_err)?)
    }

    fn next_double(&mut self) -> f64 {
        self.inner.next_double()
    }

    fn next_double_range(&mut self, a: f64, b: f64) -> PyResult<f64> {
        if !(b > a) {
            return Err(PyValueError::new_err("b must be greater than a"));
        }
        Ok(self.inner.next_double_range(a, b))
    }

    fn next_boolean(&mut self) -> bool {
        self.inner.next_boolean()
    }

    fn next_triangular(&mut self) -> f64 {
        self.inner.next_triangular()
    }

    fn next_gaussian(&mut self) -> f64 {
        self.inner.next_gaussian()
    }

    /// Return a shuffled copy of `items`
    fn shuffle(&mut self, mut items: Vec<PyObject>) -> Vec<PyObject> {
        self.inner.shuffle(&mut items);
        items
    }

    fn sequence(&mut self, s: usize) -> Vec<u32> {
        self.inner.sequence(s)
    }

    /// Serialize the full sampler state to JSON
    fn checkpoint(&self) -> PyResult<String> {
        save_checkpoint(&self.inner, &self.config).map_err(to_py_err)
    }

    /// Restore state saved by `checkpoint()`; the engine and seed must match
    fn restore(&mut self, json: &str) -> PyResult<()> {
        self.inner = load_checkpoint(json, &self.config).map_err(to_py_err)?;
        Ok(())
    }
}

/// Stateless 64-bit seed expansion
#[pyfunction]
pub fn expand_seed(seed: u64) -> u64 {
    expand(seed)
}
