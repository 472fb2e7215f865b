//! Time-window batching in front of a [`GestureSink`].
//!
//! Events are buffered until one arrives more than the window after the
//! first buffered event, then the buffer is delivered as a single batch.
//! Time is taken from event timestamps, so replays batch exactly as live
//! sessions do.

use facegest_signal_model::gesture::{GestureEvent, TimestampNs};

use crate::GestureSink;

/// Batches events from a session before handing them to `S`.
///
/// Delivery failures are logged and the batch is dropped; gesture
/// processing never stalls on a slow or broken consumer.
pub struct DebouncedSink<S: GestureSink> {
    inner: S,
    window_ns: u64,
    pending: Vec<GestureEvent>,
    batches_delivered: u64,
    events_delivered: u64,
    failed_batches: u64,
}

impl<S: GestureSink> DebouncedSink<S> {
    pub fn new(inner: S, window_ns: u64) -> Self {
        Self {
            inner,
            window_ns,
            pending: Vec::new(),
            batches_delivered: 0,
            events_delivered: 0,
            failed_batches: 0,
        }
    }

    /// Queue one event, delivering the current batch first if the event
    /// falls outside its window.
    pub fn push(&mut self, event: GestureEvent) {
        self.poll(event.timestamp_ns);
        self.pending.push(event);
    }

    pub fn push_all(&mut self, events: &[GestureEvent]) {
        for event in events {
            self.push(*event);
        }
    }

    /// Deliver the pending batch if its window has elapsed at `now_ns`.
    ///
    /// Hosts call this once per frame so a lone event is not held until
    /// the next one arrives.
    pub fn poll(&mut self, now_ns: TimestampNs) {
        let expired = self
            .pending
            .first()
            .is_some_and(|first| now_ns.saturating_sub(first.timestamp_ns) > self.window_ns);
        if expired {
            self.flush();
        }
    }

    /// Deliver whatever is pending, regardless of the window.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);

        match self.inner.deliver(&batch) {
            Ok(()) => {
                self.batches_delivered += 1;
                self.events_delivered += batch.len() as u64;
                tracing::debug!(
                    sink = self.inner.name(),
                    events = batch.len(),
                    "Delivered gesture batch"
                );
            }
            Err(e) => {
                self.failed_batches += 1;
                tracing::warn!(
                    sink = self.inner.name(),
                    events = batch.len(),
                    error = %e,
                    "Dropping gesture batch"
                );
            }
        }
    }

    /// Flush and hand back the wrapped sink.
    pub fn finish(mut self) -> S {
        self.flush();
        if let Err(e) = self.inner.flush() {
            tracing::warn!(sink = self.inner.name(), error = %e, "Sink flush failed");
        }
        self.inner
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn batches_delivered(&self) -> u64 {
        self.batches_delivered
    }

    pub fn events_delivered(&self) -> u64 {
        self.events_delivered
    }

    pub fn failed_batches(&self) -> u64 {
        self.failed_batches
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySink;
    use facegest_common::error::{FacegestError, FacegestResult};
    use facegest_signal_model::gesture::{GestureChannel, GesturePhase};

    const MS: u64 = 1_000_000;

    fn event(t_ms: u64) -> GestureEvent {
        GestureEvent {
            timestamp_ns: t_ms * MS,
            channel: GestureChannel::Eye,
            new_phase: GesturePhase::Active,
            count: 0,
        }
    }

    #[test]
    fn test_burst_becomes_one_batch() {
        let mut sink = DebouncedSink::new(MemorySink::new(), 300 * MS);
        sink.push_all(&[event(0), event(100), event(300)]);
        assert_eq!(sink.pending(), 3);

        // 301 ms after the first buffered event closes the window.
        sink.push(event(301));
        assert_eq!(sink.inner().batches().len(), 1);
        assert_eq!(sink.inner().batches()[0].len(), 3);
        assert_eq!(sink.pending(), 1);

        let memory = sink.finish();
        assert_eq!(memory.batches().len(), 2);
        assert_eq!(memory.events().len(), 4);
    }

    #[test]
    fn test_poll_releases_lone_event() {
        let mut sink = DebouncedSink::new(MemorySink::new(), 300 * MS);
        sink.push(event(1_000));
        sink.poll(1_200 * MS);
        assert_eq!(sink.pending(), 1);
        sink.poll(1_301 * MS);
        assert_eq!(sink.pending(), 0);
        assert_eq!(sink.events_delivered(), 1);
    }

    #[test]
    fn test_zero_window_delivers_per_timestamp() {
        let mut sink = DebouncedSink::new(MemorySink::new(), 0);
        // Same-frame events share a batch.
        sink.push_all(&[event(10), event(10), event(20)]);
        let memory = sink.finish();
        assert_eq!(memory.batches().len(), 2);
        assert_eq!(memory.batches()[0].len(), 2);
    }

    struct Broken;

    impl GestureSink for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn deliver(&mut self, _batch: &[GestureEvent]) -> FacegestResult<()> {
            Err(FacegestError::sink("connection refused"))
        }
    }

    #[test]
    fn test_failures_are_counted_not_raised() {
        let mut sink = DebouncedSink::new(Broken, 300 * MS);
        sink.push(event(0));
        sink.push(event(1_000));
        sink.flush();
        assert_eq!(sink.failed_batches(), 2);
        assert_eq!(sink.batches_delivered(), 0);
        assert_eq!(sink.pending(), 0);
    }
}
