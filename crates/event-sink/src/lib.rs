//! Facegest Event Sink
//!
//! Delivers gesture transition events to their consumers. Consumers
//! implement [`GestureSink`] and receive events in batches:
//!
//! - **JSONL event log:** every transition, header first ([`JsonlEventWriter`])
//! - **JSONL records:** one row per completed gesture ([`RecordWriter`])
//! - **Memory:** collected batches for tests and embedding ([`MemorySink`])
//!
//! [`DebouncedSink`] groups rapid successive events into a single delivery
//! so a burst of blinks does not turn into a burst of writes.

pub mod debounce;
pub mod record;
pub mod writer;

pub use debounce::DebouncedSink;
pub use record::GestureRecord;
pub use writer::{JsonlEventWriter, RecordWriter, SessionHeader};

use facegest_common::error::FacegestResult;
use facegest_signal_model::gesture::GestureEvent;

/// Trait for gesture event consumers.
pub trait GestureSink {
    /// Sink name for logging.
    fn name(&self) -> &str;

    /// Deliver one batch of events in emission order.
    fn deliver(&mut self, batch: &[GestureEvent]) -> FacegestResult<()>;

    /// Push buffered output to its destination.
    fn flush(&mut self) -> FacegestResult<()> {
        Ok(())
    }
}

impl<S: GestureSink + ?Sized> GestureSink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn deliver(&mut self, batch: &[GestureEvent]) -> FacegestResult<()> {
        (**self).deliver(batch)
    }

    fn flush(&mut self) -> FacegestResult<()> {
        (**self).flush()
    }
}

/// Fans every batch out to each sink in order. The first failure is
/// returned after all sinks have been tried.
impl GestureSink for Vec<Box<dyn GestureSink>> {
    fn name(&self) -> &str {
        "fan-out"
    }

    fn deliver(&mut self, batch: &[GestureEvent]) -> FacegestResult<()> {
        let mut first_error = None;
        for sink in self.iter_mut() {
            if let Err(e) = sink.deliver(batch) {
                tracing::warn!(sink = sink.name(), error = %e, "Sink delivery failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn flush(&mut self) -> FacegestResult<()> {
        let mut first_error = None;
        for sink in self.iter_mut() {
            if let Err(e) = sink.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Keeps every delivered batch in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    batches: Vec<Vec<GestureEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> &[Vec<GestureEvent>] {
        &self.batches
    }

    /// All delivered events, flattened in delivery order.
    pub fn events(&self) -> Vec<GestureEvent> {
        self.batches.iter().flatten().copied().collect()
    }
}

impl GestureSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn deliver(&mut self, batch: &[GestureEvent]) -> FacegestResult<()> {
        if !batch.is_empty() {
            self.batches.push(batch.to_vec());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facegest_common::error::FacegestError;
    use facegest_signal_model::gesture::{GestureChannel, GesturePhase};

    struct Failing;

    impl GestureSink for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn deliver(&mut self, _batch: &[GestureEvent]) -> FacegestResult<()> {
            Err(FacegestError::sink("store unreachable"))
        }
    }

    fn blink(t: u64) -> GestureEvent {
        GestureEvent {
            timestamp_ns: t,
            channel: GestureChannel::Eye,
            new_phase: GesturePhase::Inactive,
            count: 1,
        }
    }

    #[test]
    fn test_memory_sink_skips_empty_batches() {
        let mut sink = MemorySink::new();
        sink.deliver(&[]).unwrap();
        sink.deliver(&[blink(1), blink(2)]).unwrap();
        assert_eq!(sink.batches().len(), 1);
        assert_eq!(sink.events().len(), 2);
    }

    #[test]
    fn test_fan_out_reports_first_failure() {
        let mut sinks: Vec<Box<dyn GestureSink>> =
            vec![Box::new(Failing), Box::new(MemorySink::new())];
        let err = sinks.deliver(&[blink(5)]).unwrap_err();
        assert!(matches!(err, FacegestError::Sink { .. }));
        assert_eq!(sinks.len(), 2);
    }
}
