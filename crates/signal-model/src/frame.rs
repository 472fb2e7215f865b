//! Per-frame input records and per-frame pipeline results.
//!
//! Landmark recordings are JSONL: an optional `# {header}` first line,
//! then one `FaceFrame` per line.

use serde::{Deserialize, Serialize};

use crate::gesture::{
    Calibration, ChannelStates, GestureChannel, GestureEvent, GestureSignal, RatioSample,
    TimestampNs,
};
use crate::landmark::LandmarkSet;

/// One frame of detector output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceFrame {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Landmarks of the single tracked face, absent when no face was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<LandmarkSet>,
}

impl FaceFrame {
    pub fn with_face(timestamp_ns: TimestampNs, landmarks: LandmarkSet) -> Self {
        Self {
            timestamp_ns,
            landmarks: Some(landmarks),
        }
    }

    pub fn empty(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            landmarks: None,
        }
    }
}

/// Metadata written as the first line of a landmark recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingHeader {
    pub schema_version: String,

    /// Detector that produced the landmarks (e.g. "mediapipe-face-mesh").
    pub detector: String,

    /// Nominal capture rate (Hz).
    pub fps: u32,
}

/// Everything a host needs to render one processed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub timestamp_ns: TimestampNs,

    /// False when the frame carried no landmarks; nothing was updated.
    pub face_detected: bool,

    /// Ratios measured on this frame, `None` when no face was detected.
    /// Degenerate channels are `None` inside the sample.
    pub raw: Option<RatioSample>,

    /// Latest smoothed signal, `None` until every channel has been measured.
    pub signal: Option<GestureSignal>,

    /// Smoothed brow minus baseline; `None` while calibrating.
    pub brow_delta: Option<f64>,

    pub calibration: Calibration,

    pub states: ChannelStates,

    /// Transitions caused by this frame, at most one per channel.
    pub events: Vec<GestureEvent>,
}

impl FrameReport {
    /// Status text for a channel: "no face", "calibrating", or its phase label.
    pub fn status_label(&self, channel: GestureChannel) -> &'static str {
        if !self.face_detected {
            return "no face";
        }
        if channel == GestureChannel::Brow && !self.calibration.is_complete {
            return "calibrating";
        }
        channel.phase_label(self.states.get(channel).phase)
    }
}

/// Parse frames from JSONL content (one JSON object per line).
pub fn parse_frames(jsonl: &str) -> Result<Vec<FaceFrame>, serde_json::Error> {
    parse_frame_lines(jsonl).map(|(_, frame)| frame).collect()
}

/// Parse frames lazily, pairing each result with its 1-based line number.
/// Blank and `#` lines are skipped but still counted.
pub fn parse_frame_lines(
    jsonl: &str,
) -> impl Iterator<Item = (usize, Result<FaceFrame, serde_json::Error>)> + '_ {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| (number, serde_json::from_str(line)))
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[FaceFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

/// Extract the header from a recording's first line, if it has one.
pub fn parse_header(jsonl: &str) -> Option<RecordingHeader> {
    let first = jsonl.lines().map(str::trim).find(|l| !l.is_empty())?;
    let body = first.strip_prefix('#')?.trim();
    serde_json::from_str(body).ok()
}
