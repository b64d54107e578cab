//! Aggregator configuration with sane defaults.

use std::path::PathBuf;

/// Where the final snapshot goes when no output path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "/tmp/the_goods.txt";

/// Runtime (seconds) at or above which a request counts as slow.
pub const DEFAULT_SLOW_THRESHOLD: f64 = 1.0;

/// Tunable knobs for one aggregation run.
#[derive(Debug, Clone)]
pub struct Config {
  /// File the final snapshot is written to (truncated first).
  pub output_path: PathBuf,
  /// Slow-request threshold in seconds, inclusive.
  pub slow_threshold: f64,
  /// Print the updated group block after every recorded line.
  pub display: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
      slow_threshold: DEFAULT_SLOW_THRESHOLD,
      display: true,
    }
  }
}
