//! Per-session neutral brow baseline.
//!
//! The brow ratio depends on the subject's anatomy, so raises are measured
//! as a delta over the mean of the first `target_frames` smoothed samples.

use facegest_signal_model::gesture::Calibration;

/// Reference number of frames averaged into the baseline.
pub const DEFAULT_TARGET_FRAMES: u32 = 30;

/// Running-mean calibrator for the brow baseline.
#[derive(Debug, Clone)]
pub struct BaselineCalibrator {
    state: Calibration,
}

impl BaselineCalibrator {
    pub fn new(target_frames: u32) -> Self {
        Self {
            state: Calibration::new(target_frames),
        }
    }

    /// Fold one smoothed brow sample into the baseline.
    ///
    /// Returns `true` only on the call that completes calibration. Samples
    /// after completion, and non-finite samples, are ignored.
    pub fn observe(&mut self, sample: f64) -> bool {
        if self.state.is_complete || !sample.is_finite() {
            return false;
        }

        // Same mean as `(baseline * n + sample) / (n + 1)`, but a constant
        // input leaves the baseline bit-identical to that input.
        let n = self.state.frames_seen as f64;
        self.state.baseline += (sample - self.state.baseline) / (n + 1.0);
        self.state.frames_seen += 1;

        if self.state.frames_seen >= self.state.target_frames {
            self.state.is_complete = true;
            return true;
        }
        false
    }

    /// `sample - baseline` once calibrated.
    pub fn delta(&self, sample: f64) -> Option<f64> {
        self.state
            .is_complete
            .then(|| sample - self.state.baseline)
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    pub fn baseline(&self) -> f64 {
        self.state.baseline
    }

    pub fn snapshot(&self) -> Calibration {
        self.state
    }

    /// Discard the baseline and start collecting again.
    pub fn reset(&mut self) {
        self.state = Calibration::new(self.state.target_frames);
    }
}

impl Default for BaselineCalibrator {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_samples_complete_with_exact_baseline() {
        let mut cal = BaselineCalibrator::default();
        let mut completions = 0;
        for _ in 0..30 {
            if cal.observe(0.42) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert!(cal.is_complete());
        assert_eq!(cal.baseline(), 0.42);
        assert_eq!(cal.snapshot().frames_seen, 30);
    }

    #[test]
    fn test_fewer_frames_stay_incomplete() {
        let mut cal = BaselineCalibrator::default();
        for _ in 0..29 {
            assert!(!cal.observe(0.42));
        }
        assert!(!cal.is_complete());
        assert_eq!(cal.delta(0.5), None);
        assert_eq!(cal.snapshot().frames_seen, 29);
    }

    #[test]
    fn test_baseline_is_arithmetic_mean() {
        let mut cal = BaselineCalibrator::new(4);
        for s in [0.1, 0.2, 0.3, 0.4] {
            cal.observe(s);
        }
        assert!((cal.baseline() - 0.25).abs() < 1e-12);
        assert!((cal.delta(0.3).unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_frozen_after_completion() {
        let mut cal = BaselineCalibrator::new(2);
        cal.observe(0.5);
        cal.observe(0.5);
        assert!(!cal.observe(10.0));
        assert_eq!(cal.baseline(), 0.5);
        assert_eq!(cal.snapshot().frames_seen, 2);
    }

    #[test]
    fn test_non_finite_samples_skipped() {
        let mut cal = BaselineCalibrator::new(2);
        cal.observe(0.5);
        cal.observe(f64::NAN);
        assert_eq!(cal.snapshot().frames_seen, 1);
        cal.observe(0.7);
        assert!(cal.is_complete());
        assert!((cal.baseline() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_reset_keeps_target() {
        let mut cal = BaselineCalibrator::new(3);
        for _ in 0..3 {
            cal.observe(0.2);
        }
        cal.reset();
        let snap = cal.snapshot();
        assert!(!snap.is_complete);
        assert_eq!(snap.frames_seen, 0);
        assert_eq!(snap.target_frames, 3);
        assert_eq!(snap.baseline, 0.0);
    }
}
