//! Python bindings (PyO3)
//!
//! Exposes a runtime-configured sampler to Python. Preconditions that are
//! debug assertions on the Rust side are checked here and raised as
//! `ValueError`, since Python callers get no debug build.

pub mod sampler;
