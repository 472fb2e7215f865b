//! Two-threshold state machine shared by every gesture channel.
//!
//! A channel enters its active phase when the signal crosses the enter
//! threshold and only leaves it after crossing a distinct exit threshold.
//! A signal hovering around a single cutoff therefore cannot toggle the
//! state on every frame. One gesture is counted per completed
//! active-to-inactive cycle (one blink = close, then reopen).

use facegest_common::config::{GestureConfig, ThresholdPair};
use facegest_common::error::{FacegestError, FacegestResult};
use facegest_signal_model::gesture::{GestureChannel, GesturePhase, GestureState};

/// Which way the signal moves to trigger the active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDirection {
    /// Active above `enter`, back to inactive below `exit` (`exit < enter`).
    Rising,
    /// Active below `enter`, back to inactive above `exit` (`exit > enter`).
    Falling,
}

/// Thresholds and direction of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisConfig {
    pub enter: f64,
    pub exit: f64,
    pub direction: TriggerDirection,
}

impl HysteresisConfig {
    /// Checked constructor: thresholds must be finite and leave a non-empty
    /// band on the correct side of `enter`.
    pub fn new(enter: f64, exit: f64, direction: TriggerDirection) -> FacegestResult<Self> {
        let config = Self {
            enter,
            exit,
            direction,
        };
        if !config.is_ordered() {
            return Err(FacegestError::config(format!(
                "hysteresis band {direction:?} needs distinct ordered thresholds, got enter {enter} exit {exit}"
            )));
        }
        Ok(config)
    }

    /// Unchecked in release builds; callers pass validated config.
    pub fn rising(thresholds: ThresholdPair) -> Self {
        let config = Self {
            enter: thresholds.enter,
            exit: thresholds.exit,
            direction: TriggerDirection::Rising,
        };
        debug_assert!(config.is_ordered(), "rising band needs exit < enter");
        config
    }

    /// Unchecked in release builds; callers pass validated config.
    pub fn falling(thresholds: ThresholdPair) -> Self {
        let config = Self {
            enter: thresholds.enter,
            exit: thresholds.exit,
            direction: TriggerDirection::Falling,
        };
        debug_assert!(config.is_ordered(), "falling band needs exit > enter");
        config
    }

    /// Whether `exit` lies strictly on the release side of `enter`.
    pub fn is_ordered(&self) -> bool {
        if !self.enter.is_finite() || !self.exit.is_finite() {
            return false;
        }
        match self.direction {
            TriggerDirection::Rising => self.exit < self.enter,
            TriggerDirection::Falling => self.exit > self.enter,
        }
    }

    /// Channel configuration derived from the pipeline config.
    ///
    /// Eye closes on a falling EAR; mouth opens on a rising MAR; brow raises
    /// on a rising delta over the calibrated baseline.
    pub fn for_channel(channel: GestureChannel, config: &GestureConfig) -> Self {
        match channel {
            GestureChannel::Eye => Self::falling(config.eye),
            GestureChannel::Mouth => Self::rising(config.mouth),
            GestureChannel::Brow => Self::rising(config.brow()),
        }
    }

    fn should_enter(&self, value: f64) -> bool {
        match self.direction {
            TriggerDirection::Rising => value > self.enter,
            TriggerDirection::Falling => value < self.enter,
        }
    }

    fn should_exit(&self, value: f64) -> bool {
        match self.direction {
            TriggerDirection::Rising => value < self.exit,
            TriggerDirection::Falling => value > self.exit,
        }
    }
}

/// Result of a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub phase: GesturePhase,
    /// Count after the transition.
    pub count: u32,
}

/// Hysteresis tracker for one gesture channel.
#[derive(Debug, Clone)]
pub struct GestureStateMachine {
    config: HysteresisConfig,
    state: GestureState,
}

impl GestureStateMachine {
    pub fn new(config: HysteresisConfig) -> Self {
        debug_assert!(config.is_ordered(), "collapsed hysteresis band: {config:?}");
        Self {
            config,
            state: GestureState::default(),
        }
    }

    /// Evaluate one sample. At most one transition happens per call.
    ///
    /// Non-finite samples never change state.
    pub fn update(&mut self, value: f64) -> Option<Transition> {
        if !value.is_finite() {
            return None;
        }

        match self.state.phase {
            GesturePhase::Inactive if self.config.should_enter(value) => {
                self.state.phase = GesturePhase::Active;
            }
            GesturePhase::Active if self.config.should_exit(value) => {
                self.state.phase = GesturePhase::Inactive;
                self.state.count = self.state.count.saturating_add(1);
            }
            _ => return None,
        }

        Some(Transition {
            phase: self.state.phase,
            count: self.state.count,
        })
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn config(&self) -> &HysteresisConfig {
        &self.config
    }

    /// Back to inactive with a zero count, without reporting a transition.
    pub fn reset(&mut self) {
        self.state = GestureState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye() -> GestureStateMachine {
        GestureStateMachine::new(HysteresisConfig::for_channel(
            GestureChannel::Eye,
            &GestureConfig::default(),
        ))
    }

    fn mouth() -> GestureStateMachine {
        GestureStateMachine::new(HysteresisConfig::for_channel(
            GestureChannel::Mouth,
            &GestureConfig::default(),
        ))
    }

    fn transitions(machine: &mut GestureStateMachine, values: &[f64]) -> Vec<Transition> {
        values.iter().filter_map(|&v| machine.update(v)).collect()
    }

    #[test]
    fn test_eye_blink_counts_once() {
        let mut machine = eye();
        let seen = transitions(&mut machine, &[0.35, 0.20, 0.20, 0.35]);

        assert_eq!(
            seen,
            vec![
                Transition {
                    phase: GesturePhase::Active,
                    count: 0
                },
                Transition {
                    phase: GesturePhase::Inactive,
                    count: 1
                },
            ]
        );
        assert_eq!(machine.state().count, 1);
        assert!(!machine.state().is_active());
    }

    #[test]
    fn test_chatter_between_thresholds_is_ignored() {
        let mut machine = eye();
        // Dips below close, then hovers inside the dead band.
        let seen = transitions(&mut machine, &[0.24, 0.26, 0.29, 0.26, 0.28, 0.255]);
        assert_eq!(seen.len(), 1);
        assert!(machine.state().is_active());
        assert_eq!(machine.state().count, 0);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let mut machine = eye();
        assert_eq!(machine.update(0.25), None);
        assert!(machine.update(0.2499).is_some());
        assert_eq!(machine.update(0.30), None);
        assert!(machine.update(0.3001).is_some());
    }

    #[test]
    fn test_mouth_rises_to_open() {
        let mut machine = mouth();
        assert_eq!(machine.update(0.45), None);
        assert_eq!(
            machine.update(0.55).map(|t| t.phase),
            Some(GesturePhase::Active)
        );
        assert_eq!(machine.update(0.45), None);
        assert_eq!(machine.update(0.35).map(|t| t.count), Some(1));
    }

    #[test]
    fn test_brow_exits_at_half_delta() {
        let mut machine = GestureStateMachine::new(HysteresisConfig::for_channel(
            GestureChannel::Brow,
            &GestureConfig::default(),
        ));
        assert!(machine.update(0.02).is_some());
        assert_eq!(machine.update(0.01), None);
        assert!(machine.update(0.007).is_some());
        assert_eq!(machine.state().count, 1);
    }

    #[test]
    fn test_checked_config_rejects_collapsed_band() {
        assert!(HysteresisConfig::new(0.25, 0.25, TriggerDirection::Falling).is_err());
        assert!(HysteresisConfig::new(0.30, 0.25, TriggerDirection::Falling).is_err());
        assert!(HysteresisConfig::new(0.40, 0.50, TriggerDirection::Rising).is_err());
        assert!(HysteresisConfig::new(f64::NAN, 0.5, TriggerDirection::Rising).is_err());

        let ok = HysteresisConfig::new(0.50, 0.40, TriggerDirection::Rising).unwrap();
        assert_eq!(ok, HysteresisConfig::rising(ThresholdPair::new(0.50, 0.40)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "collapsed hysteresis band")]
    fn test_machine_refuses_unordered_band_in_debug() {
        let config = HysteresisConfig {
            enter: 0.3,
            exit: 0.3,
            direction: TriggerDirection::Rising,
        };
        GestureStateMachine::new(config);
    }

    #[test]
    fn test_non_finite_input_never_transitions() {
        let mut machine = eye();
        assert_eq!(machine.update(f64::NAN), None);
        assert_eq!(machine.update(f64::NEG_INFINITY), None);
        machine.update(0.1);
        assert_eq!(machine.update(f64::INFINITY), None);
        assert_eq!(machine.update(f64::NAN), None);
        assert!(machine.state().is_active());
    }

    #[test]
    fn test_count_is_monotonic_over_many_cycles() {
        let mut machine = mouth();
        let mut last = 0;
        for _ in 0..10 {
            machine.update(0.6);
            machine.update(0.3);
            assert!(machine.state().count > last);
            last = machine.state().count;
        }
        assert_eq!(last, 10);
    }

    #[test]
    fn test_reset_clears_active_phase_and_count() {
        let mut machine = eye();
        machine.update(0.1);
        machine.update(0.4);
        machine.update(0.1);
        machine.reset();
        assert_eq!(machine.state(), GestureState::default());
        // Reopening after reset is not a completed blink.
        assert_eq!(machine.update(0.4), None);
    }
}
