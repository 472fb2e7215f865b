//! Facegest Processing Core
//!
//! Turns per-frame facial landmarks into countable gesture events:
//! - **Ratios:** Eye/mouth aspect ratios and brow elevation from landmarks
//! - **Smoothing:** Exponential low-pass filter per ratio
//! - **Calibration:** Per-session neutral brow baseline
//! - **Hysteresis:** Two-threshold state machines that count gestures
//! - **Session:** Owns all of the above and advances them once per frame
//!
//! This crate is pure computation: no I/O, no threads, no platform
//! dependencies. All inputs are data; all outputs are data.

pub mod calibration;
pub mod hysteresis;
pub mod ratios;
pub mod session;
pub mod smoothing;

#[doc(hidden)]
pub mod test_support;

pub use calibration::BaselineCalibrator;
pub use hysteresis::{GestureStateMachine, HysteresisConfig, TriggerDirection};
pub use ratios::RatioExtractor;
pub use session::SessionController;
pub use smoothing::ExponentialSmoother;
