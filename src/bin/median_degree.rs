//! Median Degree CLI
//!
//! Reads interaction records (one JSON object per line) and writes the
//! rolling median degree after each record, one output line per input line.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `MEDIAN_WINDOW_SECS`: Window width in seconds (default: 60)
//! - `MEDIAN_UPPER_BOUND`: Exclusive timestamp upper bound, or `none` (default: now)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! Command-line flags override the environment.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin median_degree -- venmo_input/venmo-trans.txt venmo_output/output.txt
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use median_degree::{run_stream, StreamConfig, StreamProcessor};

#[derive(Parser)]
#[command(name = "median_degree")]
#[command(about = "Rolling median degree of a windowed interaction graph")]
#[command(version)]
struct Cli {
    /// Input file, one JSON record per line.
    input: PathBuf,
    /// Output file, one median per line.
    output: PathBuf,
    /// Window width in seconds.
    #[arg(long)]
    window_secs: Option<i64>,
    /// Exclusive upper bound on event timestamps (Unix seconds).
    #[arg(long, conflicts_with = "no_upper_bound")]
    upper_bound: Option<i64>,
    /// Accept timestamps in the future (streaming input).
    #[arg(long)]
    no_upper_bound: bool,
}

/// Initialize the tracing subscriber with JSON or pretty format, on stderr.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "median_degree=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = StreamConfig::from_env()?;
    if let Some(window_secs) = cli.window_secs {
        config.window_secs = window_secs;
    }
    if cli.no_upper_bound {
        config.upper_bound = None;
    } else if let Some(upper) = cli.upper_bound {
        config.upper_bound = Some(upper);
    }
    config.validate()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        input = %cli.input.display(),
        output = %cli.output.display(),
        window_secs = config.window_secs,
        upper_bound = ?config.upper_bound,
        "Starting median degree stream"
    );

    let reader = File::open(&cli.input)
        .map(BufReader::new)
        .with_context(|| format!("opening input {}", cli.input.display()))?;
    let writer = File::create(&cli.output)
        .map(BufWriter::new)
        .with_context(|| format!("creating output {}", cli.output.display()))?;

    let start = Instant::now();
    let mut processor = StreamProcessor::new(config.policy());
    let stats = run_stream(&mut processor, &config.validator(), reader, writer)?;

    info!(
        latency_ms = start.elapsed().as_millis() as u64,
        stats = %serde_json::to_string(&stats)?,
        "Median degree stream complete"
    );

    Ok(())
}
