//! Structured error types for the request stats engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A raw line that could not be turned into a record object.
#[derive(Debug, Error)]
#[error("invalid json: {0}")]
pub struct ParseError(#[from] pub serde_json::Error);

#[derive(Debug, Error)]
pub enum StatsError {
  #[error("flush to {}: {source}", path.display())]
  Flush {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("open {}: {source}", path.display())]
  Open {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("io: {0}")]
  Io(#[from] io::Error),

  #[error("aggregator already finalized")]
  AlreadyFinalized,
}

impl StatsError {
  pub fn flush(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Flush {
      path: path.into(),
      source,
    }
  }

  pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Open {
      path: path.into(),
      source,
    }
  }
}
