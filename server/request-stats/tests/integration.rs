//! Integration tests for the request stats engine.

use request_stats::report::render_report;
use request_stats::types::AggregatorState;
use request_stats::{Config, GroupKey, IngestOutcome, StreamAggregator, TextReporter};

const FIXTURE: &str = r#"{"method":"GET","route":"/x","runtime":0.5,"status":200}
{"method":"GET","route":"/x","runtime":1.2,"status":500}
not json
{"route":"/y"}
"#;

fn ingest_fixture(agg: &mut StreamAggregator) -> Vec<IngestOutcome> {
  FIXTURE.lines().map(|line| agg.ingest(line)).collect()
}

#[test]
fn fixture_stream_produces_expected_stats() {
  let mut agg = StreamAggregator::with_defaults();
  let outcomes = ingest_fixture(&mut agg);
  let key = GroupKey::new("GET", "/x");

  assert_eq!(
    outcomes,
    vec![
      IngestOutcome::Recorded(key.clone()),
      IngestOutcome::Recorded(key.clone()),
      IngestOutcome::InvalidJson,
      IngestOutcome::Phantom,
    ]
  );

  let report = agg.snapshot_all();
  assert_eq!(report.groups.len(), 1);
  let (k, view) = &report.groups[0];
  assert_eq!(k, &key);
  assert_eq!(view.count, 2);
  assert!((view.total_runtime - 1.7).abs() < 1e-9);
  assert_eq!(view.num_slow, 1);
  assert!((view.slowest_time - 1.2).abs() < f64::EPSILON);
  assert_eq!(view.success_count, 1);
  assert_eq!(view.fail_count, 1);

  assert_eq!(report.overall.total_count, 4);
  assert_eq!(report.overall.invalid_count, 1);
  assert_eq!(report.overall.phantom_count, 1);
}

#[test]
fn flushed_file_matches_legacy_layout() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("the_goods.txt");
  std::fs::write(&path, "old run\n").unwrap();

  let mut agg = StreamAggregator::new(Config {
    output_path: path.clone(),
    display: false,
    ..Config::default()
  });
  ingest_fixture(&mut agg);

  let mut reporter: TextReporter<Vec<u8>> = TextReporter::new(None, &path);
  agg.finalize(&mut reporter).unwrap();
  assert_eq!(agg.state(), AggregatorState::Terminated);

  let expected = "\
**** GET - /x ****
response time total: 1.7
num requests: 2
avg time: 0.85
num slow requests: 1
longest request time: 1.2
percent slow: 50.0%
num successful requests: 1
num failed requests: 1

**** Overall stats ****
TOTAL COUNT: 4
INVALID JSON COUNT: 1
PHANTOM COUNT: 1

PERCENT INVALID JSON: 25.0%
PERCENT PHANTOM: 25.0%

TOTAL RUNTIME: 1.7
AVG RUNTIME: 0.425
";
  assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn incremental_display_shows_cumulative_group() {
  let mut agg = StreamAggregator::with_defaults();
  let mut reporter = TextReporter::new(Some(Vec::new()), "/unused");

  for line in FIXTURE.lines() {
    if let IngestOutcome::Recorded(key) = agg.ingest(line) {
      let view = agg.group(&key).unwrap();
      request_stats::Reporter::display(&mut reporter, &key, &view).unwrap();
    }
  }

  let console = String::from_utf8(reporter.into_console().unwrap()).unwrap();
  assert_eq!(console.matches("**** GET - /x ****").count(), 2);
  assert!(console.contains("num requests: 1\n"));
  assert!(console.contains("num requests: 2\n"));
}

#[test]
fn empty_input_flushes_undefined_markers() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("empty.txt");

  let mut agg = StreamAggregator::with_defaults();
  let mut reporter: TextReporter<Vec<u8>> = TextReporter::new(None, &path);
  let report = agg.finalize(&mut reporter).unwrap();

  assert_eq!(report.overall.total_count, 0);
  assert_eq!(report.overall.avg_runtime, None);
  let text = std::fs::read_to_string(&path).unwrap();
  assert_eq!(text, render_report(&report));
  assert!(text.ends_with("TOTAL RUNTIME: 0\nAVG RUNTIME: NaN\n"));
}

#[test]
fn identical_streams_render_identically() {
  let lines = [
    r#"{"method":"POST","route":"/b","runtime":0.2,"status":201}"#,
    r#"{"method":"GET","route":"/a","runtime":1.5,"status":302}"#,
    r#"{"method":"DELETE","route":"/c","runtime":0.01}"#,
    r#"{"method":"GET","route":"/a","runtime":0.7,"status":200}"#,
  ];

  let mut a = StreamAggregator::with_defaults();
  let mut b = StreamAggregator::with_defaults();
  for line in lines {
    a.ingest(line);
    b.ingest(line);
  }

  assert_eq!(
    render_report(&a.snapshot_all()),
    render_report(&b.snapshot_all()),
    "Same inputs must produce identical reports"
  );
}

#[test]
fn malformed_lines_do_not_disturb_other_groups() {
  let mut agg = StreamAggregator::with_defaults();
  agg.ingest(r#"{"method":"GET","route":"/a","runtime":0.4,"status":200}"#);
  agg.ingest(r#"{"method":"GET","route":"/a","status":200}"#);
  agg.ingest(r#"{"method":"GET","route":"/b","runtime":null}"#);
  agg.ingest(r#"{"method":"GET","route":"/a","runtime":0.6,"status":200}"#);

  let report = agg.snapshot_all();
  assert_eq!(report.groups.len(), 1);
  assert_eq!(report.groups[0].1.count, 2);
  assert!((report.overall.total_runtime - 1.0).abs() < 1e-9);
  assert_eq!(report.overall.malformed_count, 2);

  let text = render_report(&report);
  assert!(text.contains("MALFORMED COUNT: 2\n"));
  assert!(text.contains("PERCENT MALFORMED: 50.0%\n"));
}

#[test]
fn float_status_codes_are_classified_like_integers() {
  let mut agg = StreamAggregator::with_defaults();
  agg.ingest(r#"{"method":"GET","route":"/x","runtime":0.5,"status":200.0}"#);
  agg.ingest(r#"{"method":"GET","route":"/x","runtime":0.5,"status":503.0}"#);

  let view = agg.group(&GroupKey::new("GET", "/x")).unwrap();
  assert_eq!((view.success_count, view.fail_count), (1, 1));
}
