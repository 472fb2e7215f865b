//! Facegest Common Utilities
//!
//! Shared infrastructure for all facegest crates:
//! - Error types and result aliases
//! - Session clock for mapping frame timestamps to wall time
//! - Tracing/logging initialization
//! - Configuration loading (gesture thresholds, sink, logging)

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
