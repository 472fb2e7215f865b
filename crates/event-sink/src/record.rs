//! Flat per-gesture rows for remote gesture stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use facegest_common::clock::SessionClock;
use facegest_signal_model::gesture::{GestureChannel, GestureEvent};

/// One completed gesture, flagged by channel and stamped with wall time.
///
/// Exactly one of the flags is `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureRecord {
    pub blink: u8,
    pub mouth: u8,
    pub brow: u8,
    pub recorded_at: DateTime<Utc>,
}

impl GestureRecord {
    /// Record for a completed gesture; `None` for transitions into the
    /// active phase.
    pub fn from_event(event: &GestureEvent, clock: &SessionClock) -> Option<Self> {
        if !event.completes_gesture() {
            return None;
        }
        let flag = |channel: GestureChannel| u8::from(event.channel == channel);
        Some(Self {
            blink: flag(GestureChannel::Eye),
            mouth: flag(GestureChannel::Mouth),
            brow: flag(GestureChannel::Brow),
            recorded_at: clock.wall_time_at(event.timestamp_ns),
        })
    }

    pub fn from_batch(batch: &[GestureEvent], clock: &SessionClock) -> Vec<Self> {
        batch
            .iter()
            .filter_map(|e| Self::from_event(e, clock))
            .collect()
    }

    /// Channel this record flags.
    pub fn channel(&self) -> GestureChannel {
        if self.blink == 1 {
            GestureChannel::Eye
        } else if self.mouth == 1 {
            GestureChannel::Mouth
        } else {
            GestureChannel::Brow
        }
    }
}
