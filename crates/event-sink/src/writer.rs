//! Append-only JSONL sinks for gesture events.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use facegest_common::clock::SessionClock;
use facegest_common::error::{FacegestError, FacegestResult};
use facegest_signal_model::gesture::GestureEvent;

use crate::record::GestureRecord;
use crate::GestureSink;

/// Metadata written as the first line of an event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at session start (RFC 3339).
    pub epoch_wall: String,

    /// Debounce window the log was written with.
    pub debounce_ms: u64,
}

impl SessionHeader {
    pub fn new(clock: &SessionClock, debounce_ms: u64) -> Self {
        Self {
            schema_version: "1.0".to_string(),
            epoch_wall: clock.epoch_wall().to_rfc3339(),
            debounce_ms,
        }
    }
}

/// Writes every transition event as a JSONL line, header first.
pub struct JsonlEventWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    events_written: u64,
}

impl JsonlEventWriter {
    /// Create (or truncate) the log, writing the header as the first line.
    pub fn create(path: impl AsRef<Path>, header: &SessionHeader) -> FacegestResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = open_truncated(&path)?;

        // Header is a comment line so event parsers skip it
        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| FacegestError::sink(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            events_written: 0,
        })
    }

    /// Write a single event as a JSONL line.
    pub fn write_event(&mut self, event: &GestureEvent) -> FacegestResult<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| FacegestError::sink(format!("Failed to write event: {e}")))?;
        self.events_written += 1;
        Ok(())
    }

    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GestureSink for JsonlEventWriter {
    fn name(&self) -> &str {
        "jsonl-events"
    }

    fn deliver(&mut self, batch: &[GestureEvent]) -> FacegestResult<()> {
        for event in batch {
            self.write_event(event)?;
        }
        // One flush per batch keeps the log crash-safe at debounce granularity
        self.flush()
    }

    fn flush(&mut self) -> FacegestResult<()> {
        self.writer
            .flush()
            .map_err(|e| FacegestError::sink(format!("Failed to flush events: {e}")))
    }
}

impl Drop for JsonlEventWriter {
    fn drop(&mut self) {
        let _ = GestureSink::flush(self);
    }
}

/// Writes one [`GestureRecord`] per completed gesture, in the shape a
/// remote gesture store expects.
pub struct RecordWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    clock: SessionClock,
    records_written: u64,
}

impl RecordWriter {
    pub fn create(path: impl AsRef<Path>, clock: SessionClock) -> FacegestResult<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = open_truncated(&path)?;
        Ok(Self {
            writer,
            path,
            clock,
            records_written: 0,
        })
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GestureSink for RecordWriter {
    fn name(&self) -> &str {
        "jsonl-records"
    }

    fn deliver(&mut self, batch: &[GestureEvent]) -> FacegestResult<()> {
        for record in GestureRecord::from_batch(batch, &self.clock) {
            tracing::debug!(
                channel = %record.channel(),
                at = %record.recorded_at,
                "Recording gesture"
            );
            let json = serde_json::to_string(&record)?;
            writeln!(self.writer, "{json}")
                .map_err(|e| FacegestError::sink(format!("Failed to write record: {e}")))?;
            self.records_written += 1;
        }
        self.flush()
    }

    fn flush(&mut self) -> FacegestResult<()> {
        self.writer
            .flush()
            .map_err(|e| FacegestError::sink(format!("Failed to flush records: {e}")))
    }
}

impl Drop for RecordWriter {
    fn drop(&mut self) {
        let _ = GestureSink::flush(self);
    }
}

fn open_truncated(path: &Path) -> FacegestResult<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    Ok(BufWriter::new(file))
}
