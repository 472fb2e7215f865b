//! Gesture channels, per-channel state, and the events emitted on transitions.
//!
//! Events are persisted in append-only JSONL format, one event per line.

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in nanoseconds since session start.
pub type TimestampNs = u64;

/// One of the independently tracked facial gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureChannel {
    Eye,
    Mouth,
    Brow,
}

impl GestureChannel {
    pub const ALL: [GestureChannel; 3] = [Self::Eye, Self::Mouth, Self::Brow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eye => "eye",
            Self::Mouth => "mouth",
            Self::Brow => "brow",
        }
    }

    /// Human-readable label for a phase of this channel.
    pub fn phase_label(&self, phase: GesturePhase) -> &'static str {
        match (self, phase) {
            (Self::Eye, GesturePhase::Inactive) => "open",
            (Self::Eye, GesturePhase::Active) => "closed",
            (Self::Mouth, GesturePhase::Inactive) => "closed",
            (Self::Mouth, GesturePhase::Active) => "open",
            (Self::Brow, GesturePhase::Inactive) => "neutral",
            (Self::Brow, GesturePhase::Active) => "raised",
        }
    }

    /// Name of one completed cycle on this channel.
    pub fn gesture_name(&self) -> &'static str {
        match self {
            Self::Eye => "blink",
            Self::Mouth => "mouth open",
            Self::Brow => "brow raise",
        }
    }
}

impl std::fmt::Display for GestureChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary phase of a gesture channel.
///
/// `Active` is the triggered phase: eyes closed, mouth open, brow raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    #[default]
    Inactive,
    Active,
}

impl GesturePhase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Phase and completed-cycle count of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GestureState {
    pub phase: GesturePhase,
    /// Completed active-to-inactive cycles since session start or reset.
    pub count: u32,
}

impl GestureState {
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }
}

/// Snapshot of all three channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelStates {
    pub eye: GestureState,
    pub mouth: GestureState,
    pub brow: GestureState,
}

impl ChannelStates {
    pub fn get(&self, channel: GestureChannel) -> GestureState {
        match channel {
            GestureChannel::Eye => self.eye,
            GestureChannel::Mouth => self.mouth,
            GestureChannel::Brow => self.brow,
        }
    }

    pub fn totals(&self) -> GestureTotals {
        GestureTotals {
            blinks: self.eye.count,
            mouth_opens: self.mouth.count,
            brow_raises: self.brow.count,
        }
    }
}

/// Aggregate gesture counts, as reported to persistence sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GestureTotals {
    pub blinks: u32,
    pub mouth_opens: u32,
    pub brow_raises: u32,
}

impl GestureTotals {
    pub fn total(&self) -> u64 {
        self.blinks as u64 + self.mouth_opens as u64 + self.brow_raises as u64
    }
}

/// A phase transition on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureEvent {
    /// Timestamp of the frame that caused the transition.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    pub channel: GestureChannel,

    /// Phase the channel moved into.
    #[serde(rename = "phase")]
    pub new_phase: GesturePhase,

    /// Channel count after the transition.
    pub count: u32,
}

impl GestureEvent {
    /// Whether this transition completed a gesture (returned to inactive).
    pub fn completes_gesture(&self) -> bool {
        self.new_phase == GesturePhase::Inactive
    }

    /// Timestamp as fractional seconds since session start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }

    /// Label of the new phase, e.g. "closed" for an eye entering active.
    pub fn phase_label(&self) -> &'static str {
        self.channel.phase_label(self.new_phase)
    }
}

/// Ratios derived from one frame's landmarks (raw or smoothed).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureSignal {
    /// Eye aspect ratio averaged over both eyes. Low means closed.
    pub ear: f64,
    /// Mouth aspect ratio. High means open.
    pub mar: f64,
    /// Brow-to-lid distance over eye width. Increasing means raised.
    pub brow: f64,
}

impl GestureSignal {
    pub fn new(ear: f64, mar: f64, brow: f64) -> Self {
        Self { ear, mar, brow }
    }

    pub fn is_finite(&self) -> bool {
        self.ear.is_finite() && self.mar.is_finite() && self.brow.is_finite()
    }
}

/// Ratios of one frame with degenerate channels marked.
///
/// A channel is `None` when its geometry could not be measured on this
/// frame (collapsed or non-finite denominator). Such a channel must not
/// advance any per-channel state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatioSample {
    pub ear: Option<f64>,
    pub mar: Option<f64>,
    pub brow: Option<f64>,
}

impl RatioSample {
    /// Treat every finite ratio as measured.
    pub fn from_signal(signal: GestureSignal) -> Self {
        let measured = |v: f64| v.is_finite().then_some(v);
        Self {
            ear: measured(signal.ear),
            mar: measured(signal.mar),
            brow: measured(signal.brow),
        }
    }

    /// Flatten to a signal, reporting degenerate channels as `0.0`.
    pub fn to_signal(&self) -> GestureSignal {
        GestureSignal {
            ear: self.ear.unwrap_or(0.0),
            mar: self.mar.unwrap_or(0.0),
            brow: self.brow.unwrap_or(0.0),
        }
    }

    pub fn get(&self, channel: GestureChannel) -> Option<f64> {
        match channel {
            GestureChannel::Eye => self.ear,
            GestureChannel::Mouth => self.mar,
            GestureChannel::Brow => self.brow,
        }
    }

    pub fn is_degenerate(&self, channel: GestureChannel) -> bool {
        self.get(channel).is_none()
    }
}

/// Progress of the per-session brow baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Mean smoothed brow ratio over the frames seen so far.
    pub baseline: f64,
    pub frames_seen: u32,
    pub target_frames: u32,
    pub is_complete: bool,
}

impl Calibration {
    pub fn new(target_frames: u32) -> Self {
        Self {
            baseline: 0.0,
            frames_seen: 0,
            target_frames,
            is_complete: false,
        }
    }

    /// Fraction of the target frames collected, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.target_frames == 0 {
            return 1.0;
        }
        (self.frames_seen as f64 / self.target_frames as f64).min(1.0)
    }
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<GestureEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[GestureEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
