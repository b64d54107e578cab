//! Binary entrypoint: read JSON log lines from files or stdin, print each
//! updated group, and write the full stats file on Ctrl-C or end of input.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use request_stats::config::{DEFAULT_OUTPUT_PATH, DEFAULT_SLOW_THRESHOLD};
use request_stats::{input, shutdown};
use request_stats::{Config, StreamAggregator, TextReporter};

/// Aggregate per-route request stats from JSON log lines
#[derive(Parser)]
#[command(name = "request-stats")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Input files, read in order ("-" or none means stdin)
  inputs: Vec<PathBuf>,

  /// File the final stats are written to (replaced on each run)
  #[arg(short, long, env = "REQUEST_STATS_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
  output: PathBuf,

  /// Runtime in seconds at or above which a request is slow
  #[arg(long, default_value_t = DEFAULT_SLOW_THRESHOLD)]
  slow_threshold: f64,

  /// Do not print group stats after every line
  #[arg(short, long)]
  quiet: bool,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let log_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
    )
    .init();

  let config = Config {
    output_path: cli.output,
    slow_threshold: cli.slow_threshold,
    display: !cli.quiet,
  };
  let shared = shutdown::shared(StreamAggregator::new(config.clone()));

  let interrupt_reporter = TextReporter::stdout(&config.output_path, false);
  if let Err(e) = shutdown::install_interrupt_flush(shared.clone(), interrupt_reporter) {
    error!(error = %e, "failed to install interrupt handler");
    return ExitCode::FAILURE;
  }

  info!(output = %config.output_path.display(), "reading request logs");

  let mut reporter = TextReporter::stdout(&config.output_path, config.display);
  let read_result = input::ingest_all(&cli.inputs, &shared, &mut reporter);
  if let Err(e) = &read_result {
    error!(error = %e, "input read failed");
  }

  let code = shutdown::finish(&mut shutdown::lock(&shared), &mut reporter);
  if code == 0 && read_result.is_ok() {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  }
}
