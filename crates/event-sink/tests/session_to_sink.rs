use facegest_event_sink::{DebouncedSink, MemorySink};
use facegest_processing_core::SessionController;
use facegest_signal_model::gesture::{GestureChannel, GesturePhase, GestureSignal};

const FRAME_NS: u64 = 33_333_333;
const WINDOW_NS: u64 = 500_000_000;

fn ear_trace() -> Vec<f64> {
    let mut trace = Vec::new();
    for _ in 0..2 {
        trace.extend([0.35; 20]);
        trace.extend([0.10; 6]);
    }
    trace.extend([0.35; 20]);
    trace
}

#[test]
fn blinks_arrive_as_one_batch_per_blink() {
    let mut session = SessionController::with_defaults();
    let mut sink = DebouncedSink::new(MemorySink::new(), WINDOW_NS);

    for (i, ear) in ear_trace().into_iter().enumerate() {
        let t = i as u64 * FRAME_NS;
        let report = session.process_signal(t, GestureSignal::new(ear, 0.1, 0.5));
        sink.push_all(&report.events);
        sink.poll(t);
    }

    let memory = sink.finish();
    let batches = memory.batches();
    assert_eq!(batches.len(), 2);
    for (n, batch) in batches.iter().enumerate() {
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|e| e.channel == GestureChannel::Eye));
        assert_eq!(batch[0].new_phase, GesturePhase::Active);
        assert_eq!(batch[1].new_phase, GesturePhase::Inactive);
        assert_eq!(batch[1].count, n as u32 + 1);
    }
    assert_eq!(session.totals().blinks, 2);
}

#[test]
fn delivery_order_matches_emission_order() {
    let mut session = SessionController::with_defaults();
    let mut emitted = Vec::new();
    let mut sink = DebouncedSink::new(MemorySink::new(), 0);

    for (i, ear) in ear_trace().into_iter().enumerate() {
        let t = i as u64 * FRAME_NS;
        let report = session.process_signal(t, GestureSignal::new(ear, 0.1, 0.5));
        emitted.extend(report.events.iter().copied());
        sink.push_all(&report.events);
    }

    assert_eq!(sink.finish().events(), emitted);
}
