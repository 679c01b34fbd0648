//! NDJSON output for `--json`.
//!
//! Every line on stdout is one event object with an `event` field. Logs go
//! to stderr so the stream stays machine-readable.

pub mod events;

use serde::Serialize;
use std::io::{self, Write};

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Convenience helper that writes to stdout.
pub fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}

/// Serialize a typed event and write it to stdout.
pub fn emit_event<T: Serialize>(event: &T) -> io::Result<()> {
    let value = serde_json::to_value(event).map_err(io::Error::other)?;
    emit(value)
}
