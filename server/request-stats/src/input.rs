//! Line sources: files in order, or stdin, fed one locked ingest at a time.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use tracing::{debug, error};

use crate::error::StatsError;
use crate::report::Reporter;
use crate::shutdown::{self, SharedAggregator};
use crate::types::IngestOutcome;

/// Feed every input through the aggregator. No inputs, or "-", means stdin.
/// Stops at the first input that cannot be opened or read; lines already
/// ingested stay counted.
pub fn ingest_all(
  inputs: &[PathBuf],
  shared: &SharedAggregator,
  reporter: &mut dyn Reporter,
) -> Result<(), StatsError> {
  if inputs.is_empty() {
    return ingest_reader(io::stdin().lock(), shared, reporter);
  }

  for path in inputs {
    if path.as_os_str() == "-" {
      ingest_reader(io::stdin().lock(), shared, reporter)?;
    } else {
      let file = File::open(path).map_err(|e| StatsError::open(path, e))?;
      debug!(path = %path.display(), "reading input");
      ingest_reader(BufReader::new(file), shared, reporter)?;
    }
  }
  Ok(())
}

/// Ingest every `\n`-separated line of `reader`. Bytes are decoded lossily, so
/// invalid UTF-8 ends up as an invalid JSON line rather than a read error.
pub fn ingest_reader(
  reader: impl BufRead,
  shared: &SharedAggregator,
  reporter: &mut dyn Reporter,
) -> Result<(), StatsError> {
  for line in reader.split(b'\n') {
    let line = line?;
    let line = String::from_utf8_lossy(&line);

    let mut aggregator = shutdown::lock(shared);
    if let IngestOutcome::Recorded(key) = aggregator.ingest(&line) {
      if let Some(view) = aggregator.group(&key) {
        if let Err(e) = reporter.display(&key, &view) {
          error!(error = %e, "failed to display group stats");
        }
      }
    }
  }
  Ok(())
}
