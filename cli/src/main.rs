//! tc-random: record and verify engine fixtures, print samples

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tc_random_core::{BitEngine, EngineKind, Fixture, RngError, Sampler, SamplerConfig};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tc-random", version, about = "Deterministic random engines and fixtures")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record the first raw outputs of an engine as a JSON fixture
    Fixture {
        #[arg(long)]
        engine: EngineKind,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 16)]
        count: usize,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replay a fixture file and check every pinned output
    Verify { file: PathBuf },

    /// Print samples, one per line
    Sample {
        #[arg(long)]
        engine: EngineKind,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Bounded draws in [0, N) instead of raw output
        #[arg(long)]
        below: Option<u32>,
        /// Strict unbiased bounded sampling
        #[arg(long, default_value_t = false)]
        unbiased: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Rng(#[from] RngError),

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("--below must be positive")]
    ZeroBound,
}

impl CliError {
    fn io(path: impl Into<String>, source: io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Fixture {
            engine,
            seed,
            count,
            out,
        } => record_fixture(engine, seed, count, out),
        Command::Verify { file } => verify_fixture(file),
        Command::Sample {
            engine,
            seed,
            count,
            below,
            unbiased,
        } => sample(engine, seed, count, below, unbiased),
    }
}

fn record_fixture(
    engine: EngineKind,
    seed: u64,
    count: usize,
    out: Option<PathBuf>,
) -> Result<(), CliError> {
    let fixture = Fixture::record(engine, seed, count)?;
    let json = fixture.to_json()?;
    match out {
        Some(path) => {
            fs::write(&path, json + "\n")
                .map_err(|e| CliError::io(path.display().to_string(), e))?;
            info!(%engine, seed, count, path = %path.display(), "fixture written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn verify_fixture(file: PathBuf) -> Result<(), CliError> {
    let name = file.display().to_string();
    let json = fs::read_to_string(&file).map_err(|e| CliError::io(name.clone(), e))?;
    let fixture = Fixture::from_json(&json)?;
    debug!(engine = %fixture.engine, seed = fixture.seed, "verifying fixture");
    fixture.verify()?;
    println!(
        "{}: ok ({} outputs, {} seed {})",
        name,
        fixture.outputs.len(),
        fixture.engine,
        fixture.seed
    );
    Ok(())
}

fn sample(
    engine: EngineKind,
    seed: u64,
    count: usize,
    below: Option<u32>,
    unbiased: bool,
) -> Result<(), CliError> {
    if below == Some(0) {
        return Err(CliError::ZeroBound);
    }
    let config = SamplerConfig::new(engine, seed).with_reject_bias(unbiased);
    let mut rng = config.build()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_samples(&mut rng, count, below, &mut out)?;
    out.flush().map_err(|e| CliError::io("stdout", e))?;
    Ok(())
}

/// Every draw is fallible so hardware exhaustion surfaces as an error
fn write_samples<E: BitEngine, W: Write>(
    rng: &mut Sampler<E>,
    count: usize,
    below: Option<u32>,
    out: &mut W,
) -> Result<(), CliError> {
    for _ in 0..count {
        let value = match below {
            Some(n) => rng.try_next_below(n)?,
            None => rng.try_next_u32()?,
        };
        writeln!(out, "{}", value).map_err(|e| CliError::io("stdout", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tc_random_core::{EntropySource, HardwareEntropyEngine, Pcg32};

    /// Source that succeeds a fixed number of times, then never again
    #[derive(Debug, Default)]
    struct Exhausting {
        remaining: u32,
    }

    impl EntropySource for Exhausting {
        fn is_available(&self) -> bool {
            true
        }

        fn try_draw(&mut self) -> Option<u32> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            Some(0x1234_5678)
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sample_args() {
        let cli = Cli::try_parse_from([
            "tc-random", "sample", "--engine", "MT19937", "--seed", "5489", "--count", "3",
            "--below", "6", "--unbiased",
        ])
        .unwrap();
        match cli.command {
            Command::Sample {
                engine,
                seed,
                count,
                below,
                unbiased,
            } => {
                assert_eq!(engine, EngineKind::MersenneTwister32);
                assert_eq!(seed, 5489);
                assert_eq!(count, 3);
                assert_eq!(below, Some(6));
                assert!(unbiased);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_engine_is_usage_error() {
        let result = Cli::try_parse_from(["tc-random", "fixture", "--engine", "minstd"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_bound_rejected() {
        let result = sample(EngineKind::Pcg32, 0, 1, Some(0), false);
        assert!(matches!(result, Err(CliError::ZeroBound)));
    }

    #[test]
    fn test_bounded_samples_report_exhaustion() {
        for reject in [false, true] {
            let engine = HardwareEntropyEngine::new(Exhausting { remaining: 3 });
            let mut rng = Sampler::from_engine(engine).with_reject_bias(reject);
            let mut out = Vec::new();
            let result = write_samples(&mut rng, 10, Some(6), &mut out);
            assert!(matches!(
                result,
                Err(CliError::Rng(RngError::EntropyUnavailable { attempts: 10 }))
            ));
            // Draws made before exhaustion are still written
            assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
        }
    }

    #[test]
    fn test_samples_written_one_per_line() {
        let mut rng: Sampler<Pcg32> = Sampler::new(7);
        let mut reference: Sampler<Pcg32> = Sampler::new(7);
        let mut out = Vec::new();
        write_samples(&mut rng, 5, Some(100), &mut out).unwrap();
        let expected: String = (0..5)
            .map(|_| format!("{}\n", reference.next_below(100)))
            .collect();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_fixture_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("tc-random-fixture-{}.json", std::process::id()));
        record_fixture(EngineKind::Lcg16, 3, 8, Some(path.clone())).unwrap();
        verify_fixture(path.clone()).unwrap();
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_verify_missing_file() {
        let result = verify_fixture(PathBuf::from("/nonexistent/tc-random.json"));
        assert!(matches!(result, Err(CliError::Io { .. })));
    }
}
