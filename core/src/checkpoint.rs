//! Checkpoint - Save/Load Sampler State
//!
//! Serializes a sampler's complete state (engine words, boolean cache, mode)
//! so a run can be paused and resumed with the exact same continuation.
//!
//! # Critical Invariants
//!
//! - **Determinism**: restoring a checkpoint and drawing yields exactly the
//!   values the original sampler would have produced
//! - **Config Matching**: a checkpoint only loads against the config it was
//!   saved with, compared by SHA-256 of the canonical config JSON

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::SamplerConfig;
use crate::error::RngError;
use crate::sampler::Sampler;

/// Serialized checkpoint envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerCheckpoint<S> {
    /// SHA-256 of the config the sampler was built from
    pub config_hash: String,

    /// Full sampler state
    pub sampler: S,
}

/// Compute a deterministic hash of any serializable config
///
/// Keys are sorted recursively before hashing so field order never affects
/// the result.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, RngError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let value = serde_json::to_value(config)?;
    let json = serde_json::to_string(&canonicalize(value))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Serialize `sampler` together with the hash of `config`
///
/// Fails with [`RngError::Serialization`] for the hardware engine, which has
/// no replayable state.
pub fn save_checkpoint<E: Serialize>(
    sampler: &Sampler<E>,
    config: &SamplerConfig,
) -> Result<String, RngError> {
    let checkpoint = SamplerCheckpoint {
        config_hash: compute_config_hash(config)?,
        sampler,
    };
    let json = serde_json::to_string(&checkpoint)?;
    debug!(engine = %config.engine, bytes = json.len(), "sampler checkpoint saved");
    Ok(json)
}

/// Restore a sampler saved by [`save_checkpoint`]
///
/// # Errors
///
/// [`RngError::ConfigMismatch`] if the checkpoint was saved under a different
/// config; [`RngError::Serialization`] if the JSON is malformed.
pub fn load_checkpoint<E: DeserializeOwned>(
    json: &str,
    config: &SamplerConfig,
) -> Result<Sampler<E>, RngError> {
    let checkpoint: SamplerCheckpoint<Sampler<E>> = serde_json::from_str(json)?;
    let expected = compute_config_hash(config)?;
    if checkpoint.config_hash != expected {
        return Err(RngError::ConfigMismatch {
            expected,
            actual: checkpoint.config_hash,
        });
    }
    debug!(engine = %config.engine, "sampler checkpoint restored");
    Ok(checkpoint.sampler)
}
