//! Replay a landmark recording through a gesture session.

use std::path::PathBuf;

use facegest_common::clock::SessionClock;
use facegest_common::config::AppConfig;
use facegest_event_sink::{
    DebouncedSink, GestureSink, JsonlEventWriter, RecordWriter, SessionHeader,
};
use facegest_processing_core::SessionController;
use facegest_signal_model::gesture::GestureChannel;

use super::load_recording;

pub fn run(
    mut config: AppConfig,
    path: PathBuf,
    events_out: Option<PathBuf>,
    records_out: Option<PathBuf>,
    debounce_ms: Option<u64>,
) -> anyhow::Result<()> {
    if let Some(ms) = debounce_ms {
        config.sink.debounce_ms = ms;
    }
    let events_out = events_out.or_else(|| config.sink.events_path.clone());

    let (_, frames) = load_recording(&path)?;
    println!("Replaying {} frames from {}", frames.len(), path.display());

    let mut session = SessionController::new(config.gestures.clone())?;
    let clock = SessionClock::start();

    let mut sinks: Vec<Box<dyn GestureSink>> = Vec::new();
    if let Some(out) = &events_out {
        let header = SessionHeader::new(&clock, config.sink.debounce_ms);
        sinks.push(Box::new(JsonlEventWriter::create(out, &header)?));
    }
    if let Some(out) = &records_out {
        sinks.push(Box::new(RecordWriter::create(out, clock)?));
    }
    let mut sink = DebouncedSink::new(sinks, config.sink.debounce_ns());

    let mut skipped = 0u64;
    let mut calibrated = false;

    for frame in &frames {
        let report = match session.process_frame(frame.timestamp_ns, frame.landmarks.as_ref()) {
            Ok(report) => report,
            Err(e) if e.is_frame_local() => {
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if !calibrated && report.calibration.is_complete {
            calibrated = true;
            println!(
                "{:>9.3}s  brow baseline {:.4}",
                SessionClock::ns_to_secs(report.timestamp_ns),
                report.calibration.baseline
            );
        }

        for event in &report.events {
            println!(
                "{:>9.3}s  {:<5} {:<7} count={}",
                event.timestamp_secs(),
                event.channel,
                event.phase_label(),
                event.count
            );
        }

        sink.push_all(&report.events);
        sink.poll(report.timestamp_ns);
    }

    sink.flush();
    let delivered = sink.events_delivered();
    let failed = sink.failed_batches();
    sink.finish();

    let totals = session.totals();
    let states = session.states();
    println!();
    println!("Totals:");
    for channel in GestureChannel::ALL {
        println!(
            "  {:<11} {}",
            format!("{}s:", channel.gesture_name()),
            states.get(channel).count
        );
    }
    println!("  Face frames: {}", session.frames_processed());
    if skipped > 0 {
        println!("  Skipped frames: {skipped}");
    }
    if events_out.is_some() || records_out.is_some() {
        println!("  Events delivered: {delivered}");
        if failed > 0 {
            println!("  [WARN] {failed} batch(es) failed to deliver");
        }
    }

    tracing::info!(
        blinks = totals.blinks,
        mouth_opens = totals.mouth_opens,
        brow_raises = totals.brow_raises,
        skipped,
        "Replay finished"
    );
    Ok(())
}
