//! Facegest Signal Model
//!
//! Defines the data contracts of the gesture pipeline:
//! - **Landmarks:** Normalized face points and the fixed anatomical index layout
//! - **Gestures:** Channels, phases, per-channel counts, and transition events
//! - **Frames:** Recorded detector output and the per-frame pipeline report
//!
//! All coordinates are normalized to `[0.0, 1.0]` relative to the image
//! so recordings survive changes in camera resolution.

pub mod frame;
pub mod gesture;
pub mod landmark;

pub use frame::*;
pub use gesture::*;
pub use landmark::*;
