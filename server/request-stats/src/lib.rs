//! Request stats engine: streaming aggregation over JSON request logs.
//!
//! Ingests newline-delimited JSON records, keeps running per-(method, route)
//! statistics plus stream-level counters, and renders a snapshot on demand or
//! at shutdown.
//!
//! No DB, no network; pure computation + in-memory state.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod input;
pub mod parse;
pub mod report;
pub mod shutdown;
pub mod stats;
pub mod types;

pub use aggregator::StreamAggregator;
pub use config::Config;
pub use error::{ParseError, StatsError};
pub use report::{Reporter, TextReporter};
pub use stats::GroupStats;
pub use types::{AggregateReport, GroupKey, IngestOutcome, StatsView};
