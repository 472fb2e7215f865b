//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FacegestError, FacegestResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gesture pipeline thresholds and calibration settings.
    #[serde(default)]
    pub gestures: GestureConfig,

    /// Event sink settings.
    #[serde(default)]
    pub sink: SinkConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// An enter/exit threshold pair for one hysteresis channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    /// Value that moves the channel into its active phase.
    pub enter: f64,
    /// Value that moves the channel back to inactive.
    pub exit: f64,
}

impl ThresholdPair {
    pub const fn new(enter: f64, exit: f64) -> Self {
        Self { enter, exit }
    }
}

/// Parameters of the per-frame gesture signal pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Exponential smoothing factor in (0, 1]. Higher follows raw input faster.
    pub smoothing_alpha: f64,

    /// Number of face frames averaged into the brow baseline.
    pub calibration_frames: u32,

    /// Eye aspect ratio thresholds: enter closes, exit reopens.
    pub eye: ThresholdPair,

    /// Mouth aspect ratio thresholds: enter opens, exit closes.
    pub mouth: ThresholdPair,

    /// Brow delta over baseline that counts as raised.
    pub brow_raise_delta: f64,

    /// Fraction of `brow_raise_delta` below which a raised brow returns to neutral.
    pub brow_exit_factor: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.2,
            calibration_frames: 30,
            eye: ThresholdPair::new(0.25, 0.30),
            mouth: ThresholdPair::new(0.50, 0.40),
            brow_raise_delta: 0.015,
            brow_exit_factor: 0.5,
        }
    }
}

impl GestureConfig {
    /// Brow thresholds expressed as an enter/exit pair over the baseline delta.
    pub fn brow(&self) -> ThresholdPair {
        ThresholdPair::new(
            self.brow_raise_delta,
            self.brow_raise_delta * self.brow_exit_factor,
        )
    }

    /// Check that every channel keeps two distinct, correctly ordered thresholds.
    pub fn validate(&self) -> FacegestResult<()> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(FacegestError::config(format!(
                "smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        if self.calibration_frames == 0 {
            return Err(FacegestError::config(
                "calibration_frames must be at least 1",
            ));
        }
        check_finite("eye", self.eye)?;
        check_finite("mouth", self.mouth)?;
        if self.eye.exit <= self.eye.enter {
            return Err(FacegestError::config(format!(
                "eye exit threshold ({}) must be above the enter threshold ({})",
                self.eye.exit, self.eye.enter
            )));
        }
        if self.mouth.exit >= self.mouth.enter {
            return Err(FacegestError::config(format!(
                "mouth exit threshold ({}) must be below the enter threshold ({})",
                self.mouth.exit, self.mouth.enter
            )));
        }
        if !(self.brow_raise_delta.is_finite() && self.brow_raise_delta > 0.0) {
            return Err(FacegestError::config(format!(
                "brow_raise_delta must be positive, got {}",
                self.brow_raise_delta
            )));
        }
        if !(self.brow_exit_factor > 0.0 && self.brow_exit_factor < 1.0) {
            return Err(FacegestError::config(format!(
                "brow_exit_factor must be in (0, 1), got {}",
                self.brow_exit_factor
            )));
        }
        Ok(())
    }
}

fn check_finite(channel: &str, pair: ThresholdPair) -> FacegestResult<()> {
    if pair.enter.is_finite() && pair.exit.is_finite() {
        Ok(())
    } else {
        Err(FacegestError::config(format!(
            "{channel} thresholds must be finite"
        )))
    }
}

/// Event sink settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Events closer together than this are delivered as one batch.
    pub debounce_ms: u64,

    /// Where gesture events are persisted, if anywhere.
    pub events_path: Option<PathBuf>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            events_path: None,
        }
    }
}

impl SinkConfig {
    /// Debounce window in nanoseconds.
    pub fn debounce_ns(&self) -> u64 {
        self.debounce_ms.saturating_mul(1_000_000)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "facegest_processing_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> FacegestResult<Self> {
        if !path.exists() {
            return Err(FacegestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.gestures.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("facegest").join("config.json")
}
