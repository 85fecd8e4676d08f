//! Hardware entropy engine: retry policy and fallback substitution
//!
//! The retry logic is exercised through scripted sources so these tests do
//! not depend on the host CPU.

use tc_random_core::{
    BitEngine, EngineKind, EntropySource, HardwareEntropyEngine, Lcg16, Pcg32, RdRand, RngError,
    Sampler, SamplerConfig, SoftwareFallback,
};

/// Source failing a fixed number of times before each success
#[derive(Debug, Clone, Default)]
struct Flaky {
    failures_per_draw: u32,
    failed: u32,
    attempts: u32,
    next: u32,
}

impl Flaky {
    fn new(failures_per_draw: u32) -> Self {
        Self {
            failures_per_draw,
            ..Self::default()
        }
    }
}

impl EntropySource for Flaky {
    fn is_available(&self) -> bool {
        true
    }

    fn try_draw(&mut self) -> Option<u32> {
        self.attempts += 1;
        if self.failed < self.failures_per_draw {
            self.failed += 1;
            return None;
        }
        self.failed = 0;
        self.next += 1;
        Some(self.next)
    }
}

/// Source that never succeeds
#[derive(Debug, Clone, Default)]
struct Dead {
    attempts: u32,
}

impl EntropySource for Dead {
    fn is_available(&self) -> bool {
        false
    }

    fn try_draw(&mut self) -> Option<u32> {
        self.attempts += 1;
        None
    }
}

#[test]
fn test_succeeds_within_retry_budget() {
    let mut engine = HardwareEntropyEngine::new(Flaky::new(9));
    assert_eq!(engine.try_next_raw(), Ok(1));
    assert_eq!(engine.try_next_raw(), Ok(2));
}

#[test]
fn test_fails_after_max_attempts() {
    let mut engine = HardwareEntropyEngine::new(Flaky::new(10));
    assert_eq!(
        engine.try_next_raw(),
        Err(RngError::EntropyUnavailable { attempts: 10 })
    );
}

#[test]
fn test_custom_attempt_limit() {
    let mut engine = HardwareEntropyEngine::new(Flaky::new(3)).with_max_attempts(3);
    assert_eq!(engine.max_attempts(), 3);
    assert_eq!(
        engine.try_next_raw(),
        Err(RngError::EntropyUnavailable { attempts: 3 })
    );
    // The source stays at its 3rd failure, so the next draw succeeds first try
    assert_eq!(engine.try_next_raw(), Ok(1));
}

#[test]
fn test_dead_source_attempts_are_bounded() {
    let mut engine = HardwareEntropyEngine::new(Dead::default()).with_max_attempts(4);
    assert!(!engine.is_available());
    for _ in 0..3 {
        assert!(engine.try_next_raw().is_err());
    }
}

#[test]
#[should_panic(expected = "Hardware entropy unavailable after 10 attempts")]
fn test_next_raw_panics_on_exhaustion() {
    let mut engine = HardwareEntropyEngine::new(Dead::default());
    engine.next_raw();
}

#[test]
fn test_sampler_surfaces_exhaustion() {
    let mut rng = Sampler::from_engine(HardwareEntropyEngine::new(Dead::default()));
    assert_eq!(
        rng.try_next_u32(),
        Err(RngError::EntropyUnavailable { attempts: 10 })
    );
}

#[test]
fn test_bounded_draw_surfaces_exhaustion() {
    let mut rng = Sampler::from_engine(HardwareEntropyEngine::new(Dead::default()))
        .with_reject_bias(true);
    assert_eq!(
        rng.try_next_below(6),
        Err(RngError::EntropyUnavailable { attempts: 10 })
    );
}

#[test]
fn test_seed_is_ignored() {
    let mut a = HardwareEntropyEngine::new(Flaky::new(0));
    let mut b = HardwareEntropyEngine::new(Flaky::new(0));
    a.reseed(12345);
    assert_eq!(a.next_raw(), b.next_raw());
    assert_eq!(a.num_bits(), 32);
}

#[test]
fn test_fallback_drives_sampler() {
    let mut rng: Sampler<HardwareEntropyEngine<SoftwareFallback<Pcg32>>> = Sampler::new(0);
    let mut reference: Sampler<Pcg32> = Sampler::new(0);
    assert_eq!(rng.num_bits(), 32);
    for n in 1..200 {
        assert_eq!(rng.next_below(n), reference.next_below(n));
    }
    let mut deck: Vec<u32> = (0..52).collect();
    rng.shuffle(&mut deck);
    deck.sort_unstable();
    assert_eq!(deck, (0..52).collect::<Vec<_>>());
}

#[test]
fn test_fallback_over_16_bit_engine_spans_32_bits() {
    let source = SoftwareFallback::new(Lcg16::from_seed(8));
    let mut engine = HardwareEntropyEngine::new(source);
    let high_bits_seen = (0..100).any(|_| engine.next_raw() > u16::MAX as u32);
    assert!(high_bits_seen);
}

#[test]
fn test_detect_matches_cpu_support() {
    let supported = RdRand::new().is_available();
    match HardwareEntropyEngine::detect() {
        Ok(mut engine) => {
            assert!(supported);
            assert!(engine.try_next_raw().is_ok());
        }
        Err(err) => {
            assert!(!supported);
            assert_eq!(err, RngError::EntropyUnavailable { attempts: 0 });
        }
    }
}

#[test]
fn test_config_builds_hardware_sampler() {
    let json = r#"{"engine": "hardware", "seed": 0, "hardware_max_attempts": 3}"#;
    let config = SamplerConfig::from_json(json).unwrap();
    assert_eq!(config.engine, EngineKind::Hardware);
    let mut rng = config.build().unwrap();
    assert_eq!(rng.num_bits(), 32);
    if RdRand::new().is_available() {
        assert!(rng.try_next_u32().is_ok());
    } else {
        assert_eq!(
            rng.try_next_u32(),
            Err(RngError::EntropyUnavailable { attempts: 3 })
        );
    }
}
