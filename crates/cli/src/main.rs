//! Branch predictor simulator CLI.
//!
//! This binary replays a branch trace through one prediction scheme. It performs:
//! 1. **Configuration:** Built-in defaults, optionally overlaid by a JSON file and `--predictor`.
//! 2. **Replay:** Predict then train every conditional branch in trace order.
//! 3. **Reporting:** Branch counts and misprediction rate, as text or JSON.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bpsim_core::common::{ConfigError, TraceError};
use bpsim_core::config::{Config, PredictorKind};
use bpsim_core::sim::{Simulator, TraceReader};

/// Scheme selection from the command line, with optional geometry overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PredictorArg {
    Static,
    GShare(Option<usize>),
    Tournament(Option<(usize, usize, usize)>),
    Tage,
}

impl PredictorArg {
    /// Applies the selection and any geometry overrides to `config`.
    fn apply(self, config: &mut Config) {
        match self {
            Self::Static => config.predictor = PredictorKind::Static,
            Self::GShare(bits) => {
                config.predictor = PredictorKind::GShare;
                if let Some(bits) = bits {
                    config.gshare.history_bits = bits;
                }
            }
            Self::Tournament(bits) => {
                config.predictor = PredictorKind::Tournament;
                if let Some((global, local, pc_index)) = bits {
                    config.tournament.global_history_bits = global;
                    config.tournament.local_history_bits = local;
                    config.tournament.pc_index_bits = pc_index;
                }
            }
            Self::Tage => config.predictor = PredictorKind::Tage,
        }
    }
}

fn parse_bits(raw: &str) -> Result<usize, String> {
    raw.parse()
        .map_err(|_| format!("`{raw}` is not a bit count"))
}

/// Parses `static`, `gshare[:<h>]`, `tournament[:<g>:<l>:<p>]` or `tage`.
fn parse_predictor(raw: &str) -> Result<PredictorArg, String> {
    let mut parts = raw.split(':');
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let params: Vec<&str> = parts.collect();

    match (name.as_str(), params.as_slice()) {
        ("static", []) => Ok(PredictorArg::Static),
        ("gshare", []) => Ok(PredictorArg::GShare(None)),
        ("gshare", [h]) => Ok(PredictorArg::GShare(Some(parse_bits(h)?))),
        ("tournament", []) => Ok(PredictorArg::Tournament(None)),
        ("tournament", [g, l, p]) => Ok(PredictorArg::Tournament(Some((
            parse_bits(g)?,
            parse_bits(l)?,
            parse_bits(p)?,
        )))),
        ("tage", []) => Ok(PredictorArg::Tage),
        _ => Err(format!(
            "unknown predictor `{raw}` (expected static, gshare:<h>, tournament:<g>:<l>:<p> or tage)"
        )),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "bpsim",
    author,
    version,
    about = "Trace-driven branch direction predictor simulator",
    long_about = "Replay a branch trace through a direction predictor and report its misprediction rate.\n\nTrace lines are `<pc> <outcome>` or `<pc> <target> <outcome> <conditional> <call> <ret> <direct>`, addresses in hex.\n\nExamples:\n  bpsim --predictor gshare:13 trace.txt\n  bpsim --predictor tournament:9:10:10 trace.txt\n  zcat trace.gz | bpsim --config tage.json --json"
)]
struct Cli {
    /// Trace file; omitted or `-` reads stdin.
    trace: Option<PathBuf>,

    /// Predictor: static, gshare:<h>, tournament:<g>:<l>:<p> or tage.
    #[arg(short, long, value_parser = parse_predictor)]
    predictor: Option<PredictorArg>,

    /// JSON configuration file; `--predictor` overrides its selection.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as a JSON object.
    #[arg(long)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

/// Failure surfaced to the user.
#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("trace error: {0}")]
    Trace(#[from] TraceError),
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&json).map_err(ConfigError::from)?
        }
        None => Config::default(),
    };
    if let Some(predictor) = cli.predictor {
        predictor.apply(&mut config);
    }
    config.validate()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

fn open_trace(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>, CliError> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            let file = File::open(p).map_err(|source| CliError::Read {
                path: p.clone(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let mut sim = Simulator::new(&config)?;
    let kind = sim.predictor.kind();
    let storage_bits = sim.predictor.storage_bits();

    let reader = open_trace(cli.trace.as_ref())?;
    sim.run(TraceReader::new(reader))?;
    let stats = sim.finish();

    if cli.json {
        let report = serde_json::json!({
            "predictor": kind.to_string(),
            "storage_bits": storage_bits,
            "stats": stats,
            "accuracy": stats.accuracy(),
            "misprediction_rate": stats.misprediction_rate(),
        });
        println!("{report:#}");
    } else {
        println!("Predictor:               {kind} ({storage_bits} bits)");
        stats.print();
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
