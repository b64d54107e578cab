//! Core aggregator: owns every group plus the stream counters, ingests one line
//! at a time, and produces snapshots.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ParseError, StatsError};
use crate::parse;
use crate::report::Reporter;
use crate::stats::GroupStats;
use crate::types::*;

/// Streaming aggregator. Holds in-memory state across lines.
pub struct StreamAggregator {
  config: Config,
  state: AggregatorState,
  groups: HashMap<GroupKey, GroupStats>,
  total_count: u64,
  total_runtime: f64,
  invalid_count: u64,
  phantom_count: u64,
  malformed_count: u64,
}

impl StreamAggregator {
  pub fn new(config: Config) -> Self {
    Self {
      config,
      state: AggregatorState::Running,
      groups: HashMap::new(),
      total_count: 0,
      total_runtime: 0.0,
      invalid_count: 0,
      phantom_count: 0,
      malformed_count: 0,
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn state(&self) -> AggregatorState {
    self.state
  }

  /// Parse and ingest one raw line.
  pub fn ingest(&mut self, raw_line: &str) -> IngestOutcome {
    self.ingest_parsed(parse::parse_line(raw_line))
  }

  /// Ingest the parser's outcome for one line. Every call counts toward
  /// `total_count`, whatever the outcome.
  pub fn ingest_parsed(&mut self, parsed: Result<LogRecord, ParseError>) -> IngestOutcome {
    self.total_count += 1;
    let line = self.total_count;

    let record = match parsed {
      Ok(r) => r,
      Err(e) => {
        self.invalid_count += 1;
        debug!(line, error = %e, "invalid json");
        return IngestOutcome::InvalidJson;
      }
    };

    // Phantom: method or route absent, or both empty. A single empty side
    // is still a usable key.
    let (method, route) = match (record.method, record.route) {
      (Some(m), Some(r)) if !(m.is_empty() && r.is_empty()) => (m, r),
      (method, route) => {
        self.phantom_count += 1;
        debug!(line, ?method, ?route, "phantom record");
        return IngestOutcome::Phantom;
      }
    };

    let runtime = match record.runtime {
      Some(r) => r,
      None => {
        self.malformed_count += 1;
        debug!(line, %method, %route, "record without numeric runtime");
        return IngestOutcome::MalformedRecord;
      }
    };

    self.total_runtime += runtime;

    let key = GroupKey::new(method, route);
    let slow_threshold = self.config.slow_threshold;
    self
      .groups
      .entry(key.clone())
      .or_insert_with(|| GroupStats::new(key.clone(), slow_threshold))
      .record(runtime, record.status);

    IngestOutcome::Recorded(key)
  }

  /// Current view of one group, if it has been seen.
  pub fn group(&self, key: &GroupKey) -> Option<StatsView> {
    self.groups.get(key).map(GroupStats::snapshot)
  }

  pub fn group_count(&self) -> usize {
    self.groups.len()
  }

  /// Point-in-time snapshot of every group and the stream counters.
  /// Groups are ordered by key so repeated snapshots line up.
  pub fn snapshot_all(&self) -> AggregateReport {
    let mut groups: Vec<(GroupKey, StatsView)> = self
      .groups
      .values()
      .map(|g| (g.key().clone(), g.snapshot()))
      .collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    let total = self.total_count;
    AggregateReport {
      groups,
      overall: OverallView {
        total_count: total,
        invalid_count: self.invalid_count,
        phantom_count: self.phantom_count,
        malformed_count: self.malformed_count,
        percent_invalid: percent(self.invalid_count, total),
        percent_phantom: percent(self.phantom_count, total),
        percent_malformed: percent(self.malformed_count, total),
        total_runtime: self.total_runtime,
        avg_runtime: ratio(self.total_runtime, total),
      },
    }
  }

  /// Flush the final snapshot through `reporter`. Must be called at most
  /// once; a second call is refused with `AlreadyFinalized`.
  ///
  /// The aggregator ends up `Terminated` whether or not the write succeeded.
  pub fn finalize(&mut self, reporter: &mut dyn Reporter) -> Result<AggregateReport, StatsError> {
    if self.state != AggregatorState::Running {
      return Err(StatsError::AlreadyFinalized);
    }
    self.state = AggregatorState::Flushing;

    let report = self.snapshot_all();
    let result = reporter.flush(&report);
    self.state = AggregatorState::Terminated;
    result?;

    info!(
      groups = report.groups.len(),
      total = report.overall.total_count,
      invalid = report.overall.invalid_count,
      phantom = report.overall.phantom_count,
      malformed = report.overall.malformed_count,
      "flushed aggregate report"
    );
    Ok(report)
  }
}
