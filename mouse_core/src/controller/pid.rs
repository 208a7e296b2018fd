// mouse_core/src/controller/pid.rs

use crate::controller::{SteeringController, WheelCommand};
use serde::Deserialize;

/// Proportional / integral / derivative gains on the steering error.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PidGains {
    pub p: f64,
    pub i: f64,
    pub d: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        // D dominates: the per-tick change of the error is tiny.
        Self {
            p: 1.6,
            i: 0.02,
            d: 120.0,
        }
    }
}

/// Full tuning of the corridor-following controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PidConfig {
    pub gains: PidGains,
    /// Signal substituted on both sides when neither sensor sees a wall.
    pub blind_signal: f64,
    /// Per-tick factor applied to the remembered signals while blind.
    pub memory_decay: f64,
    /// Scale from "free space" (2 - left - right) to the cruising speed cap.
    pub top_speed_gain: f64,
    /// Steering errors above this cut the speed proportionally.
    pub ratio_tolerance: f64,
    /// Error changes above this cut the speed proportionally.
    pub change_tolerance: f64,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            gains: PidGains::default(),
            blind_signal: 0.9,
            memory_decay: 0.99,
            top_speed_gain: 1.6,
            ratio_tolerance: 0.1,
            change_tolerance: 0.05,
        }
    }
}

/// Everything the controller remembers between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerState {
    pub last_left_signal: f64,
    pub last_right_signal: f64,
    pub last_ratio: f64,
    pub integral_ratio: f64,
    pub last_change: f64,
}

/// Keeps the robot centred between two walls.
///
/// The steering error is `right - left`; a positive error means the right wall
/// is closer. Speed is capped by how much free space both sensors report and
/// is cut further when the error, or its rate of change, is large.
#[derive(Debug, Clone, Default)]
pub struct CorridorPid {
    config: PidConfig,
    state: ControllerState,
}

impl CorridorPid {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            state: ControllerState::default(),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Fills in a missing (exactly zero) side and updates the signal memory.
    fn resolve_signals(&mut self, left: f64, right: f64) -> (f64, f64) {
        let state = &mut self.state;
        let remembered = state.last_left_signal + state.last_right_signal;

        if left == 0.0 {
            if right != 0.0 {
                return (remembered - right, right);
            }
            // Blind on both sides: coast straight, slowly forget, drop the integral.
            state.last_left_signal *= self.config.memory_decay;
            state.last_right_signal *= self.config.memory_decay;
            state.integral_ratio = 0.0;
            return (self.config.blind_signal, self.config.blind_signal);
        }
        if right == 0.0 {
            return (left, remembered - left);
        }

        state.last_left_signal = left;
        state.last_right_signal = right;
        (left, right)
    }

    fn top_speed(&self, ratio: f64, change: f64) -> f64 {
        let cfg = &self.config;
        let free_space = 2.0 - self.state.last_left_signal - self.state.last_right_signal;
        let mut top_speed = (free_space * cfg.top_speed_gain).min(1.0);
        if ratio.abs() > cfg.ratio_tolerance {
            top_speed *= cfg.ratio_tolerance / ratio.abs();
        }
        if change.abs() > cfg.change_tolerance {
            top_speed *= cfg.change_tolerance / change.abs();
        }
        top_speed
    }
}

impl SteeringController for CorridorPid {
    fn name(&self) -> &str {
        "corridor-pid"
    }

    fn update(&mut self, left_response: f64, right_response: f64) -> WheelCommand {
        let (left, right) = self.resolve_signals(left_response, right_response);

        let ratio = right - left;
        self.state.integral_ratio += ratio;
        let change = ratio - self.state.last_ratio;
        self.state.last_change = change;

        let top_speed = self.top_speed(ratio, change);
        let gains = self.config.gains;
        let correction = (gains.p * ratio + gains.i * self.state.integral_ratio + gains.d * change)
            * (1.0 + top_speed)
            / 2.0;

        self.state.last_ratio = ratio;

        if correction < 0.0 {
            WheelCommand::new(top_speed, (top_speed + correction).max(0.0))
        } else if correction > 0.0 {
            WheelCommand::new((top_speed - correction).max(0.0), top_speed)
        } else {
            WheelCommand::new(top_speed, top_speed)
        }
    }

    fn reset(&mut self) {
        self.state = ControllerState::default();
    }
}
