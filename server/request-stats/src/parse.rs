//! Parse raw log lines into records.

use serde_json::Value;

use crate::error::ParseError;
use crate::types::{InboundRecord, LogRecord};

/// Parse one raw line. Anything that is not a JSON object is a structural
/// failure; missing or oddly typed fields are not.
pub fn parse_line(raw: &str) -> Result<LogRecord, ParseError> {
  let inbound: InboundRecord = serde_json::from_str(raw.trim())?;
  Ok(normalize(inbound))
}

/// Normalize a deserialized record into the internal model.
pub fn normalize(inbound: InboundRecord) -> LogRecord {
  LogRecord {
    method: inbound.method.and_then(identity_text),
    route: inbound.route.and_then(identity_text),
    runtime: inbound.runtime.as_ref().and_then(Value::as_f64),
    status: inbound.status.as_ref().and_then(Value::as_f64),
  }
}
