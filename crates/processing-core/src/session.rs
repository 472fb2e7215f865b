//! Per-frame orchestration of the gesture pipeline.
//!
//! A `SessionController` owns every piece of pipeline state for one camera
//! session. The host calls [`SessionController::process_frame`] once per
//! detector result; nothing runs in the background and no state is shared
//! between sessions.

use facegest_common::config::GestureConfig;
use facegest_common::error::FacegestResult;
use facegest_signal_model::frame::FrameReport;
use facegest_signal_model::gesture::{
    Calibration, ChannelStates, GestureChannel, GestureEvent, GestureSignal, GestureTotals,
    RatioSample, TimestampNs,
};
use facegest_signal_model::landmark::{LandmarkLayout, LandmarkSet};

use crate::calibration::BaselineCalibrator;
use crate::hysteresis::{GestureStateMachine, HysteresisConfig, Transition};
use crate::ratios::RatioExtractor;
use crate::smoothing::SignalSmoother;

/// Owns and advances the full landmark-to-event pipeline.
#[derive(Debug, Clone)]
pub struct SessionController {
    config: GestureConfig,
    extractor: RatioExtractor,
    smoother: SignalSmoother,
    calibrator: BaselineCalibrator,
    eye: GestureStateMachine,
    mouth: GestureStateMachine,
    brow: GestureStateMachine,
    frames_processed: u64,
}

impl SessionController {
    /// Create a session for the FaceMesh layout after validating `config`.
    pub fn new(config: GestureConfig) -> FacegestResult<Self> {
        Self::with_layout(config, LandmarkLayout::face_mesh())
    }

    /// Create a session for a custom landmark numbering scheme.
    pub fn with_layout(config: GestureConfig, layout: LandmarkLayout) -> FacegestResult<Self> {
        config.validate()?;
        Ok(Self::build(config, layout))
    }

    /// Session with the reference thresholds.
    pub fn with_defaults() -> Self {
        Self::build(GestureConfig::default(), LandmarkLayout::face_mesh())
    }

    fn build(config: GestureConfig, layout: LandmarkLayout) -> Self {
        Self {
            extractor: RatioExtractor::new(layout),
            smoother: SignalSmoother::new(config.smoothing_alpha),
            calibrator: BaselineCalibrator::new(config.calibration_frames),
            eye: machine(GestureChannel::Eye, &config),
            mouth: machine(GestureChannel::Mouth, &config),
            brow: machine(GestureChannel::Brow, &config),
            frames_processed: 0,
            config,
        }
    }

    /// Advance the pipeline by one detector result.
    ///
    /// `None` means no face was found: nothing is mutated and the last known
    /// state is reported with `face_detected == false`. A landmark set that
    /// lacks a required index fails with `InsufficientLandmarks` and also
    /// leaves the session untouched.
    pub fn process_frame(
        &mut self,
        timestamp_ns: TimestampNs,
        landmarks: Option<&LandmarkSet>,
    ) -> FacegestResult<FrameReport> {
        let Some(landmarks) = landmarks else {
            return Ok(self.report(timestamp_ns, None, Vec::new()));
        };

        let raw = self.extractor.sample(landmarks).map_err(|e| {
            tracing::warn!(timestamp_ns, error = %e, "Skipping frame");
            e
        })?;

        Ok(self.process_sample(timestamp_ns, raw))
    }

    /// Advance the pipeline with ratios computed elsewhere. Non-finite
    /// ratios are treated as unmeasured.
    pub fn process_signal(&mut self, timestamp_ns: TimestampNs, raw: GestureSignal) -> FrameReport {
        self.process_sample(timestamp_ns, RatioSample::from_signal(raw))
    }

    /// Advance the pipeline with one frame's ratios.
    ///
    /// A `None` channel was not measurable on this frame: its smoother,
    /// the calibrator (for brow) and its state machine are left untouched.
    pub fn process_sample(&mut self, timestamp_ns: TimestampNs, raw: RatioSample) -> FrameReport {
        let smoothed = self.smoother.update(raw);
        self.frames_processed += 1;

        for channel in GestureChannel::ALL {
            if raw.is_degenerate(channel) {
                tracing::debug!(
                    timestamp_ns,
                    channel = %channel,
                    "Degenerate geometry, holding channel"
                );
            }
        }

        if smoothed.brow.is_some_and(|brow| self.calibrator.observe(brow)) {
            tracing::info!(
                baseline = self.calibrator.baseline(),
                frames = self.config.calibration_frames,
                "Brow calibration complete"
            );
        }

        let mut events = Vec::new();
        let mut emit = |channel: GestureChannel, transition: Option<Transition>| {
            if let Some(t) = transition {
                tracing::debug!(
                    channel = %channel,
                    phase = channel.phase_label(t.phase),
                    count = t.count,
                    timestamp_ns,
                    "Gesture transition"
                );
                events.push(GestureEvent {
                    timestamp_ns,
                    channel,
                    new_phase: t.phase,
                    count: t.count,
                });
            }
        };

        if let Some(ear) = smoothed.ear {
            emit(GestureChannel::Eye, self.eye.update(ear));
        }
        if let Some(mar) = smoothed.mar {
            emit(GestureChannel::Mouth, self.mouth.update(mar));
        }
        // No brow gesture can be scored until the baseline exists.
        if let Some(delta) = smoothed.brow.and_then(|b| self.calibrator.delta(b)) {
            emit(GestureChannel::Brow, self.brow.update(delta));
        }

        self.report(timestamp_ns, Some(raw), events)
    }

    /// Restore construction-time state: cold smoothers, fresh calibration,
    /// inactive channels with zero counts. Emits nothing.
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.calibrator.reset();
        self.eye.reset();
        self.mouth.reset();
        self.brow.reset();
        self.frames_processed = 0;
        tracing::debug!("Session reset");
    }

    pub fn states(&self) -> ChannelStates {
        ChannelStates {
            eye: self.eye.state(),
            mouth: self.mouth.state(),
            brow: self.brow.state(),
        }
    }

    pub fn calibration(&self) -> Calibration {
        self.calibrator.snapshot()
    }

    pub fn totals(&self) -> GestureTotals {
        self.states().totals()
    }

    /// Latest smoothed signal, `None` before the first face frame.
    pub fn signal(&self) -> Option<GestureSignal> {
        self.smoother.current()
    }

    /// Face frames processed since start or reset.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    fn report(
        &self,
        timestamp_ns: TimestampNs,
        raw: Option<RatioSample>,
        events: Vec<GestureEvent>,
    ) -> FrameReport {
        let signal = self.signal();
        FrameReport {
            timestamp_ns,
            face_detected: raw.is_some(),
            raw,
            signal,
            brow_delta: signal.and_then(|s| self.calibrator.delta(s.brow)),
            calibration: self.calibration(),
            states: self.states(),
            events,
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn machine(channel: GestureChannel, config: &GestureConfig) -> GestureStateMachine {
    GestureStateMachine::new(HysteresisConfig::for_channel(channel, config))
}
