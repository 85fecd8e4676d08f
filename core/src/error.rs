//! Error types
//!
//! Software engines never fail: bounds and ordering preconditions are caller
//! contracts checked with debug assertions only. Errors surface from the
//! hardware entropy engine and from the configuration, fixture and checkpoint
//! layers.

use thiserror::Error;

/// Errors produced by the random number framework
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RngError {
    #[error("Hardware entropy unavailable after {attempts} attempts")]
    EntropyUnavailable { attempts: u32 },

    #[error("Unknown engine: {0}")]
    UnknownEngine(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Fixture mismatch at output {index}: expected {expected}, got {actual}")]
    FixtureMismatch {
        index: usize,
        expected: u32,
        actual: u32,
    },

    #[error("Config hash mismatch: checkpoint has {actual}, config has {expected}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RngError {
    fn from(err: serde_json::Error) -> Self {
        RngError::Serialization(err.to_string())
    }
}
