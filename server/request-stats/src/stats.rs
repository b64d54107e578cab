//! Streaming per-(method, route) statistics.

use crate::types::{percent, ratio, GroupKey, StatsView, StatusClass};

/// Running accumulator for one group key. Every stored counter only grows.
#[derive(Debug, Clone)]
pub struct GroupStats {
  key: GroupKey,
  slow_threshold: f64,
  count: u64,
  total_runtime: f64,
  num_slow: u64,
  slowest_time: f64,
  success_count: u64,
  fail_count: u64,
}

impl GroupStats {
  pub fn new(key: GroupKey, slow_threshold: f64) -> Self {
    Self {
      key,
      slow_threshold,
      count: 0,
      total_runtime: 0.0,
      num_slow: 0,
      slowest_time: 0.0,
      success_count: 0,
      fail_count: 0,
    }
  }

  pub fn key(&self) -> &GroupKey {
    &self.key
  }

  pub fn count(&self) -> u64 {
    self.count
  }

  /// Fold one request into the running totals.
  pub fn record(&mut self, runtime: f64, status: Option<f64>) {
    self.count += 1;
    self.total_runtime += runtime;
    if runtime >= self.slow_threshold {
      self.num_slow += 1;
    }
    self.slowest_time = self.slowest_time.max(runtime);

    match StatusClass::of(status) {
      StatusClass::Success => self.success_count += 1,
      StatusClass::Failure => self.fail_count += 1,
      StatusClass::Neither => {}
    }
  }

  pub fn snapshot(&self) -> StatsView {
    StatsView {
      count: self.count,
      total_runtime: self.total_runtime,
      num_slow: self.num_slow,
      slowest_time: self.slowest_time,
      success_count: self.success_count,
      fail_count: self.fail_count,
      avg_runtime: ratio(self.total_runtime, self.count),
      percent_slow: percent(self.num_slow, self.count),
    }
  }
}
