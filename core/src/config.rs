//! Runtime engine selection and sampler configuration
//!
//! Generic `Sampler<E>` is the zero-cost path when the engine is known at
//! compile time. When it is chosen at runtime (config file, CLI flag, Python)
//! use [`AnyEngine`], a closed tagged union over every variant, built from a
//! [`SamplerConfig`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RngError;
use crate::rng::{
    BitEngine, HardwareEntropyEngine, Lcg16, McgLehmer32, MersenneTwister32, Pcg32, RdRand,
    SplitMix32, XorShift128, XorShift128Plus, XorShift64Star, DEFAULT_MAX_ATTEMPTS,
};
use crate::sampler::Sampler;

/// Identifies an engine variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    #[serde(rename = "lehmer")]
    McgLehmer32,
    #[serde(rename = "pcg32")]
    Pcg32,
    #[serde(rename = "splitmix")]
    SplitMix32,
    #[serde(rename = "xorshift128")]
    XorShift128,
    #[serde(rename = "xorshift128plus")]
    XorShift128Plus,
    #[serde(rename = "xorshift64star")]
    XorShift64Star,
    #[serde(rename = "lcg16")]
    Lcg16,
    #[serde(rename = "mt19937")]
    MersenneTwister32,
    #[serde(rename = "hardware")]
    Hardware,
}

impl EngineKind {
    pub const ALL: [EngineKind; 9] = [
        EngineKind::McgLehmer32,
        EngineKind::Pcg32,
        EngineKind::SplitMix32,
        EngineKind::XorShift128,
        EngineKind::XorShift128Plus,
        EngineKind::XorShift64Star,
        EngineKind::Lcg16,
        EngineKind::MersenneTwister32,
        EngineKind::Hardware,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EngineKind::McgLehmer32 => "lehmer",
            EngineKind::Pcg32 => "pcg32",
            EngineKind::SplitMix32 => "splitmix",
            EngineKind::XorShift128 => "xorshift128",
            EngineKind::XorShift128Plus => "xorshift128plus",
            EngineKind::XorShift64Star => "xorshift64star",
            EngineKind::Lcg16 => "lcg16",
            EngineKind::MersenneTwister32 => "mt19937",
            EngineKind::Hardware => "hardware",
        }
    }

    pub fn num_bits(self) -> u32 {
        match self {
            EngineKind::XorShift128 | EngineKind::Lcg16 => 16,
            _ => 32,
        }
    }

    /// Software engines replay exactly from a seed; hardware does not
    pub fn is_deterministic(self) -> bool {
        self != EngineKind::Hardware
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = RngError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EngineKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| RngError::UnknownEngine(s.to_string()))
    }
}

/// Any engine variant, dispatched at runtime
///
/// The hardware variant has no reproducible state; serializing it is an
/// error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnyEngine {
    #[serde(rename = "lehmer")]
    McgLehmer32(McgLehmer32),
    #[serde(rename = "pcg32")]
    Pcg32(Pcg32),
    #[serde(rename = "splitmix")]
    SplitMix32(SplitMix32),
    #[serde(rename = "xorshift128")]
    XorShift128(XorShift128),
    #[serde(rename = "xorshift128plus")]
    XorShift128Plus(XorShift128Plus),
    #[serde(rename = "xorshift64star")]
    XorShift64Star(XorShift64Star),
    #[serde(rename = "lcg16")]
    Lcg16(Lcg16),
    #[serde(rename = "mt19937")]
    MersenneTwister32(MersenneTwister32),
    #[serde(skip)]
    Hardware(HardwareEntropyEngine<RdRand>),
}

impl AnyEngine {
    pub fn new(kind: EngineKind, seed: u64) -> Self {
        match kind {
            EngineKind::McgLehmer32 => AnyEngine::McgLehmer32(McgLehmer32::from_seed(seed)),
            EngineKind::Pcg32 => AnyEngine::Pcg32(Pcg32::from_seed(seed)),
            EngineKind::SplitMix32 => AnyEngine::SplitMix32(SplitMix32::from_seed(seed)),
            EngineKind::XorShift128 => AnyEngine::XorShift128(XorShift128::from_seed(seed)),
            EngineKind::XorShift128Plus => {
                AnyEngine::XorShift128Plus(XorShift128Plus::from_seed(seed))
            }
            EngineKind::XorShift64Star => AnyEngine::XorShift64Star(XorShift64Star::from_seed(seed)),
            EngineKind::Lcg16 => AnyEngine::Lcg16(Lcg16::from_seed(seed)),
            EngineKind::MersenneTwister32 => {
                AnyEngine::MersenneTwister32(MersenneTwister32::from_seed(seed))
            }
            EngineKind::Hardware => AnyEngine::Hardware(HardwareEntropyEngine::new(RdRand::new())),
        }
    }

    pub fn kind(&self) -> EngineKind {
        match self {
            AnyEngine::McgLehmer32(_) => EngineKind::McgLehmer32,
            AnyEngine::Pcg32(_) => EngineKind::Pcg32,
            AnyEngine::SplitMix32(_) => EngineKind::SplitMix32,
            AnyEngine::XorShift128(_) => EngineKind::XorShift128,
            AnyEngine::XorShift128Plus(_) => EngineKind::XorShift128Plus,
            AnyEngine::XorShift64Star(_) => EngineKind::XorShift64Star,
            AnyEngine::Lcg16(_) => EngineKind::Lcg16,
            AnyEngine::MersenneTwister32(_) => EngineKind::MersenneTwister32,
            AnyEngine::Hardware(_) => EngineKind::Hardware,
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $engine:ident => $body:expr) => {
        match $self {
            AnyEngine::McgLehmer32($engine) => $body,
            AnyEngine::Pcg32($engine) => $body,
            AnyEngine::SplitMix32($engine) => $body,
            AnyEngine::XorShift128($engine) => $body,
            AnyEngine::XorShift128Plus($engine) => $body,
            AnyEngine::XorShift64Star($engine) => $body,
            AnyEngine::Lcg16($engine) => $body,
            AnyEngine::MersenneTwister32($engine) => $body,
            AnyEngine::Hardware($engine) => $body,
        }
    };
}

impl BitEngine for AnyEngine {
    /// Defaults to PCG32; use [`AnyEngine::new`] or [`SamplerConfig::build`]
    /// to pick a variant
    fn from_seed(seed: u64) -> Self {
        AnyEngine::new(EngineKind::Pcg32, seed)
    }

    fn reseed(&mut self, seed: u64) {
        dispatch!(self, engine => engine.reseed(seed))
    }

    #[inline]
    fn next_raw(&mut self) -> u32 {
        dispatch!(self, engine => engine.next_raw())
    }

    fn try_next_raw(&mut self) -> Result<u32, RngError> {
        dispatch!(self, engine => engine.try_next_raw())
    }

    #[inline]
    fn num_bits(&self) -> u32 {
        dispatch!(self, engine => engine.num_bits())
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

/// Everything needed to construct a sampler
///
/// # Example
/// ```
/// use tc_random_core::{EngineKind, SamplerConfig};
///
/// let config = SamplerConfig::from_json(r#"{"engine": "pcg32", "seed": 7}"#).unwrap();
/// assert_eq!(config.engine, EngineKind::Pcg32);
/// let mut sampler = config.build().unwrap();
/// assert!(sampler.next_below(10) < 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Engine variant
    pub engine: EngineKind,

    /// Seed passed to the engine (ignored by hardware)
    pub seed: u64,

    /// Strict unbiased bounded sampling
    #[serde(default)]
    pub reject_bias: bool,

    /// Raw draws to skip after seeding
    #[serde(default)]
    pub discard: u64,

    /// Per-draw attempt limit for the hardware engine
    #[serde(default = "default_max_attempts")]
    pub hardware_max_attempts: u32,
}

impl SamplerConfig {
    pub fn new(engine: EngineKind, seed: u64) -> Self {
        Self {
            engine,
            seed,
            reject_bias: false,
            discard: 0,
            hardware_max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_reject_bias(mut self, reject_bias: bool) -> Self {
        self.reject_bias = reject_bias;
        self
    }

    pub fn with_discard(mut self, discard: u64) -> Self {
        self.discard = discard;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, RngError> {
        let config: SamplerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RngError> {
        if self.hardware_max_attempts == 0 {
            return Err(RngError::InvalidConfig(
                "hardware_max_attempts must be positive".to_string(),
            ));
        }
        if self.engine == EngineKind::Hardware && self.discard > 0 {
            return Err(RngError::InvalidConfig(
                "discard has no meaning for the hardware engine".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a runtime-dispatched sampler
    pub fn build(&self) -> Result<Sampler<AnyEngine>, RngError> {
        self.build_with::<AnyEngine>()
    }

    /// Build a sampler over engine type `E`
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InvalidConfig`] when `E` is a concrete engine other
    /// than the configured one.
    pub fn build_with<E: ConfiguredEngine>(&self) -> Result<Sampler<E>, RngError> {
        self.validate()?;
        let engine = E::from_config(self)?;
        let mut sampler = Sampler::from_engine(engine).with_reject_bias(self.reject_bias);
        sampler.discard(self.discard);
        Ok(sampler)
    }
}

/// Engine constructible from a [`SamplerConfig`]
///
/// Concrete engines accept only their own [`EngineKind`]; [`AnyEngine`]
/// accepts every kind.
pub trait ConfiguredEngine: BitEngine + Sized {
    fn from_config(config: &SamplerConfig) -> Result<Self, RngError>;
}

fn expect_kind(config: &SamplerConfig, kind: EngineKind) -> Result<(), RngError> {
    if config.engine == kind {
        Ok(())
    } else {
        Err(RngError::InvalidConfig(format!(
            "config selects {} but the sampler engine is {}",
            config.engine, kind
        )))
    }
}

macro_rules! configured_engine {
    ($($engine:ty => $kind:ident),* $(,)?) => {
        $(
            impl ConfiguredEngine for $engine {
                fn from_config(config: &SamplerConfig) -> Result<Self, RngError> {
                    expect_kind(config, EngineKind::$kind)?;
                    Ok(<$engine>::from_seed(config.seed))
                }
            }
        )*
    };
}

configured_engine! {
    McgLehmer32 => McgLehmer32,
    Pcg32 => Pcg32,
    SplitMix32 => SplitMix32,
    XorShift128 => XorShift128,
    XorShift128Plus => XorShift128Plus,
    XorShift64Star => XorShift64Star,
    Lcg16 => Lcg16,
    MersenneTwister32 => MersenneTwister32,
}

impl ConfiguredEngine for HardwareEntropyEngine<RdRand> {
    fn from_config(config: &SamplerConfig) -> Result<Self, RngError> {
        expect_kind(config, EngineKind::Hardware)?;
        Ok(HardwareEntropyEngine::new(RdRand::new())
            .with_max_attempts(config.hardware_max_attempts))
    }
}

impl ConfiguredEngine for AnyEngine {
    fn from_config(config: &SamplerConfig) -> Result<Self, RngError> {
        Ok(match config.engine {
            EngineKind::Hardware => {
                AnyEngine::Hardware(HardwareEntropyEngine::from_config(config)?)
            }
            kind => AnyEngine::new(kind, config.seed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_names_round_trip() {
        for kind in EngineKind::ALL {
            assert_eq!(kind.name().parse::<EngineKind>(), Ok(kind));
        }
        assert_eq!("PCG32".parse::<EngineKind>(), Ok(EngineKind::Pcg32));
    }

    #[test]
    fn test_unknown_engine_rejected() {
        assert_eq!(
            "mt".parse::<EngineKind>(),
            Err(RngError::UnknownEngine("mt".to_string()))
        );
    }

    #[test]
    fn test_serde_names_match_display() {
        for kind in EngineKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_any_engine_matches_static_engine() {
        let mut dynamic = AnyEngine::new(EngineKind::XorShift128, 42);
        let mut fixed = XorShift128::from_seed(42);
        assert_eq!(dynamic.num_bits(), 16);
        for _ in 0..100 {
            assert_eq!(dynamic.next_raw(), fixed.next_raw());
        }
    }

    #[test]
    fn test_any_engine_reseed_keeps_variant() {
        let mut engine = AnyEngine::new(EngineKind::Lcg16, 1);
        engine.reseed(2);
        assert_eq!(engine.kind(), EngineKind::Lcg16);
    }

    #[test]
    fn test_zero_attempts_invalid() {
        let mut config = SamplerConfig::new(EngineKind::Hardware, 0);
        config.hardware_max_attempts = 0;
        assert!(matches!(config.build(), Err(RngError::InvalidConfig(_))));
    }

    #[test]
    fn test_build_with_rejects_other_engine() {
        let config = SamplerConfig::new(EngineKind::MersenneTwister32, 1);
        assert!(matches!(
            config.build_with::<Pcg32>(),
            Err(RngError::InvalidConfig(_))
        ));
        assert!(config.build_with::<MersenneTwister32>().is_ok());
    }

    #[test]
    fn test_build_with_any_engine_follows_config() {
        let config = SamplerConfig::new(EngineKind::Lcg16, 8);
        let sampler = config.build_with::<AnyEngine>().unwrap();
        assert_eq!(sampler.engine().kind(), EngineKind::Lcg16);
    }

    #[test]
    fn test_num_bits_agree_with_engines() {
        for kind in EngineKind::ALL {
            assert_eq!(AnyEngine::new(kind, 0).num_bits(), kind.num_bits());
        }
    }
}
