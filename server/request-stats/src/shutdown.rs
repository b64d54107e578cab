//! Interrupt handling: flush the final snapshot and exit.
//!
//! The aggregator lives behind one mutex shared by the ingest loop and the
//! interrupt handler. The ingest loop holds it for exactly one line, so the
//! handler only ever sees state between two records. The handler exits the
//! process while still holding the lock; nothing is ingested after the flush.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};

use crate::aggregator::StreamAggregator;
use crate::error::StatsError;
use crate::report::Reporter;
use crate::types::AggregatorState;

pub type SharedAggregator = Arc<Mutex<StreamAggregator>>;

pub fn shared(aggregator: StreamAggregator) -> SharedAggregator {
  Arc::new(Mutex::new(aggregator))
}

/// Lock the aggregator, recovering from poisoning: a panic elsewhere must not
/// cost us the flush.
pub fn lock(shared: &Mutex<StreamAggregator>) -> MutexGuard<'_, StreamAggregator> {
  shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Finalize and map the outcome to a process exit code.
pub fn finish(aggregator: &mut StreamAggregator, reporter: &mut dyn Reporter) -> i32 {
  match aggregator.finalize(reporter) {
    Ok(_) => {
      info!(path = %aggregator.config().output_path.display(), "stats written");
      0
    }
    Err(StatsError::AlreadyFinalized) => {
      debug!("stats already flushed");
      0
    }
    Err(e) => {
      error!(error = %e, "failed to write stats");
      1
    }
  }
}

/// Register a Ctrl-C / SIGINT handler that flushes through `reporter` and exits.
pub fn install_interrupt_flush<R>(shared: SharedAggregator, mut reporter: R) -> Result<(), ctrlc::Error>
where
  R: Reporter + Send + 'static,
{
  ctrlc::set_handler(move || {
    let mut aggregator = lock(&shared);
    if let Some(code) = on_interrupt(&mut aggregator, &mut reporter) {
      std::process::exit(code);
    }
  })
}

/// Interrupt path: flush and return the exit code, or `None` when a flush
/// already ran. In that case whoever ran it owns the exit status.
pub fn on_interrupt(aggregator: &mut StreamAggregator, reporter: &mut dyn Reporter) -> Option<i32> {
  if aggregator.state() != AggregatorState::Running {
    debug!("interrupt after flush, leaving exit to the flusher");
    return None;
  }
  info!("interrupt received, flushing stats");
  Some(finish(aggregator, reporter))
}
