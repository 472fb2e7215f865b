//! Exponential smoothing of the per-frame gesture ratios.

use facegest_signal_model::gesture::{GestureSignal, RatioSample};

/// Default smoothing factor.
pub const DEFAULT_ALPHA: f64 = 0.2;

/// One exponential smoothing step: `previous + alpha * (current - previous)`.
pub fn smooth(previous: f64, current: f64, alpha: f64) -> f64 {
    previous + alpha * (current - previous)
}

/// Stateful low-pass filter for one signal.
///
/// The first sample after construction or reset is passed through unchanged
/// so the output is not biased toward an arbitrary starting value.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    alpha: f64,
    value: Option<f64>,
}

impl ExponentialSmoother {
    /// `alpha` is clamped to `[0, 1]`; larger values follow the input faster.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            value: None,
        }
    }

    /// Feed one sample and return the smoothed value.
    ///
    /// Non-finite samples leave the filter untouched; the previous output
    /// is returned (or the sample itself if nothing was seen yet).
    pub fn update(&mut self, sample: f64) -> f64 {
        if !sample.is_finite() {
            return self.value.unwrap_or(sample);
        }
        let next = match self.value {
            Some(previous) => smooth(previous, sample, self.alpha),
            None => sample,
        };
        self.value = Some(next);
        next
    }

    /// Current smoothed value, `None` before the first sample.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Forget history; the next sample passes through unchanged.
    pub fn reset(&mut self) {
        self.value = None;
    }
}

impl Default for ExponentialSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

/// Three independent smoothers, one per gesture ratio.
#[derive(Debug, Clone)]
pub struct SignalSmoother {
    ear: ExponentialSmoother,
    mar: ExponentialSmoother,
    brow: ExponentialSmoother,
}

impl SignalSmoother {
    pub fn new(alpha: f64) -> Self {
        Self {
            ear: ExponentialSmoother::new(alpha),
            mar: ExponentialSmoother::new(alpha),
            brow: ExponentialSmoother::new(alpha),
        }
    }

    /// Smooth the measured channels of one frame.
    ///
    /// Degenerate channels are skipped: their filter keeps its value and the
    /// channel stays `None` in the result, so nothing downstream advances.
    pub fn update(&mut self, raw: RatioSample) -> RatioSample {
        RatioSample {
            ear: raw.ear.map(|v| self.ear.update(v)),
            mar: raw.mar.map(|v| self.mar.update(v)),
            brow: raw.brow.map(|v| self.brow.update(v)),
        }
    }

    /// Latest smoothed signal, once every channel has seen a sample.
    pub fn current(&self) -> Option<GestureSignal> {
        Some(GestureSignal {
            ear: self.ear.value()?,
            mar: self.mar.value()?,
            brow: self.brow.value()?,
        })
    }

    pub fn reset(&mut self) {
        self.ear.reset();
        self.mar.reset();
        self.brow.reset();
    }
}
