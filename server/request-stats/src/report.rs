//! Text rendering of snapshots and the reporter seam the aggregator writes through.

use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::StatsError;
use crate::types::{AggregateReport, GroupKey, OverallView, StatsView};

/// Receives incremental group updates and the final snapshot.
pub trait Reporter {
  /// Show the current view of a group that was just updated.
  fn display(&mut self, key: &GroupKey, view: &StatsView) -> Result<(), StatsError>;

  /// Persist the final snapshot.
  fn flush(&mut self, report: &AggregateReport) -> Result<(), StatsError>;
}

/// Plain-text reporter: group blocks to a console writer, full report to a file.
pub struct TextReporter<W: Write> {
  console: Option<W>,
  output_path: PathBuf,
}

impl TextReporter<io::Stdout> {
  pub fn stdout(output_path: impl Into<PathBuf>, display: bool) -> Self {
    Self::new(display.then(io::stdout), output_path)
  }
}

impl<W: Write> TextReporter<W> {
  /// `console: None` disables the per-record display.
  pub fn new(console: Option<W>, output_path: impl Into<PathBuf>) -> Self {
    Self {
      console,
      output_path: output_path.into(),
    }
  }

  pub fn output_path(&self) -> &Path {
    &self.output_path
  }

  pub fn into_console(self) -> Option<W> {
    self.console
  }
}

impl<W: Write> Reporter for TextReporter<W> {
  fn display(&mut self, key: &GroupKey, view: &StatsView) -> Result<(), StatsError> {
    if let Some(console) = self.console.as_mut() {
      console.write_all(render_group(key, view).as_bytes())?;
      console.flush()?;
    }
    Ok(())
  }

  fn flush(&mut self, report: &AggregateReport) -> Result<(), StatsError> {
    write_report(&self.output_path, report)
  }
}

/// Truncate `path` and write the rendered report to it.
pub fn write_report(path: &Path, report: &AggregateReport) -> Result<(), StatsError> {
  let write = || -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(render_report(report).as_bytes())?;
    out.flush()?;
    out.into_inner().map_err(|e| e.into_error())?.sync_all()
  };
  write().map_err(|e| StatsError::flush(path, e))
}

/// One group block, followed by a blank line.
pub fn render_group(key: &GroupKey, view: &StatsView) -> String {
  let mut out = String::new();
  // Writing into a String cannot fail.
  let _ = write_group(&mut out, key, view);
  out
}

/// Every group block in report order, then the overall block.
pub fn render_report(report: &AggregateReport) -> String {
  let mut out = String::new();
  for (key, view) in &report.groups {
    let _ = write_group(&mut out, key, view);
  }
  let _ = write_overall(&mut out, &report.overall, !report.groups.is_empty());
  out
}

fn write_group(out: &mut String, key: &GroupKey, view: &StatsView) -> fmt::Result {
  writeln!(out, "**** {} ****", key)?;
  writeln!(out, "response time total: {}", Num(view.total_runtime))?;
  writeln!(out, "num requests: {}", view.count)?;
  writeln!(out, "avg time: {}", Maybe(view.avg_runtime))?;
  writeln!(out, "num slow requests: {}", view.num_slow)?;
  writeln!(out, "longest request time: {}", Num(view.slowest_time))?;
  writeln!(out, "percent slow: {}%", Maybe(view.percent_slow))?;
  writeln!(out, "num successful requests: {}", view.success_count)?;
  writeln!(out, "num failed requests: {}", view.fail_count)?;
  writeln!(out)
}

/// Malformed lines only appear when a stream had any, so clean streams keep
/// the original layout. `any_recorded` is false while the runtime total has
/// never been added to; it then prints as the integer `0`.
fn write_overall(out: &mut String, overall: &OverallView, any_recorded: bool) -> fmt::Result {
  let malformed = overall.malformed_count > 0;

  writeln!(out, "**** Overall stats ****")?;
  writeln!(out, "TOTAL COUNT: {}", overall.total_count)?;
  writeln!(out, "INVALID JSON COUNT: {}", overall.invalid_count)?;
  writeln!(out, "PHANTOM COUNT: {}", overall.phantom_count)?;
  if malformed {
    writeln!(out, "MALFORMED COUNT: {}", overall.malformed_count)?;
  }
  writeln!(out)?;
  writeln!(out, "PERCENT INVALID JSON: {}%", Maybe(overall.percent_invalid))?;
  writeln!(out, "PERCENT PHANTOM: {}%", Maybe(overall.percent_phantom))?;
  if malformed {
    writeln!(out, "PERCENT MALFORMED: {}%", Maybe(overall.percent_malformed))?;
  }
  writeln!(out)?;
  if any_recorded {
    writeln!(out, "TOTAL RUNTIME: {}", Num(overall.total_runtime))?;
  } else {
    writeln!(out, "TOTAL RUNTIME: 0")?;
  }
  writeln!(out, "AVG RUNTIME: {}", Maybe(overall.avg_runtime))
}

/// Float in the log tool's shape: always a decimal point ("3.0"), and
/// scientific notation ("1.0e-05", "1.0e+16") outside 1e-4 <= |v| < 1e16.
struct Num(f64);

impl fmt::Display for Num {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let v = self.0;
    if v.is_nan() {
      return f.write_str("NaN");
    }
    if v.is_infinite() {
      return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }

    // Shortest round-trip digits, as "d.ddde[-]x".
    let sci = format!("{:e}", v);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if v == 0.0 || (-4..16).contains(&exp) {
      let fixed = v.to_string();
      if fixed.contains('.') {
        f.write_str(&fixed)
      } else {
        write!(f, "{}.0", fixed)
      }
    } else {
      let point = if mantissa.contains('.') { "" } else { ".0" };
      let sign = if exp < 0 { '-' } else { '+' };
      write!(f, "{}{}e{}{:02}", mantissa, point, sign, exp.abs())
    }
  }
}

/// Undefined derived values render as "NaN".
struct Maybe(Option<f64>);

impl fmt::Display for Maybe {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&Num(self.0.unwrap_or(f64::NAN)), f)
  }
}
