//! Core types for the request stats engine (JSON contract + internal models).

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the log line carries)
// ---------------------------------------------------------------------------

/// One log line as it arrives. Unknown fields are silently ignored; every
/// known field may be absent or of an unexpected JSON type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundRecord {
  #[serde(default)]
  pub method: Option<Value>,
  #[serde(default)]
  pub route: Option<Value>,
  #[serde(default)]
  pub runtime: Option<Value>,
  #[serde(default)]
  pub status: Option<Value>,
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// A parsed log record. `None` means absent or null on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
  pub method: Option<String>,
  pub route: Option<String>,
  /// Seconds.
  pub runtime: Option<f64>,
  /// Compared by value, so `200.0` is a status like `200`.
  pub status: Option<f64>,
}

/// Composite (method, route) key of one aggregate bucket. Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
  pub method: String,
  pub route: String,
}

impl GroupKey {
  pub fn new(method: impl Into<String>, route: impl Into<String>) -> Self {
    Self {
      method: method.into(),
      route: route.into(),
    }
  }
}

impl fmt::Display for GroupKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} - {}", self.method, self.route)
  }
}

/// How the status code of a recorded request is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
  Success,
  Failure,
  Neither,
}

impl StatusClass {
  pub fn of(status: Option<f64>) -> Self {
    match status {
      Some(s) if (200.0..=299.0).contains(&s) => Self::Success,
      Some(s) if (300.0..=999.0).contains(&s) => Self::Failure,
      _ => Self::Neither,
    }
  }
}

// ---------------------------------------------------------------------------
// Ingest results
// ---------------------------------------------------------------------------

/// What happened to one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
  /// Distributed into the group with this key.
  Recorded(GroupKey),
  /// Not a JSON object.
  InvalidJson,
  /// Parsed, but without a usable method/route.
  Phantom,
  /// Has identity but no numeric runtime.
  MalformedRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
  Running,
  Flushing,
  Terminated,
}

// ---------------------------------------------------------------------------
// Snapshot views (read-only, point-in-time)
// ---------------------------------------------------------------------------

/// Immutable view of one group. Derived values are `None` when undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
  pub count: u64,
  pub total_runtime: f64,
  pub num_slow: u64,
  pub slowest_time: f64,
  pub success_count: u64,
  pub fail_count: u64,
  pub avg_runtime: Option<f64>,
  pub percent_slow: Option<f64>,
}

/// Stream-level counters plus derived ratios (`None` while nothing was read).
#[derive(Debug, Clone, PartialEq)]
pub struct OverallView {
  pub total_count: u64,
  pub invalid_count: u64,
  pub phantom_count: u64,
  pub malformed_count: u64,
  pub percent_invalid: Option<f64>,
  pub percent_phantom: Option<f64>,
  pub percent_malformed: Option<f64>,
  pub total_runtime: f64,
  pub avg_runtime: Option<f64>,
}

/// Full snapshot: every group (ordered by key) followed by the overall stats.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
  pub groups: Vec<(GroupKey, StatsView)>,
  pub overall: OverallView,
}

/// `numerator / denominator`, or `None` for a zero denominator.
pub fn ratio(numerator: f64, denominator: u64) -> Option<f64> {
  if denominator == 0 {
    None
  } else {
    Some(numerator / denominator as f64)
  }
}

/// `100 * part / whole`, or `None` for a zero whole.
pub fn percent(part: u64, whole: u64) -> Option<f64> {
  ratio(100.0 * part as f64, whole)
}
