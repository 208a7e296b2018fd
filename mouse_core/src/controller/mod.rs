// mouse_core/src/controller/mod.rs

use std::fmt::Debug;

/// A pair of wheel-speed commands, nominally in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelCommand {
    pub left: f64,
    pub right: f64,
}

impl WheelCommand {
    pub const STOP: WheelCommand = WheelCommand {
        left: 0.0,
        right: 0.0,
    };

    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Both wheels limited to `[lo, hi]`.
    pub fn clamped(&self, lo: f64, hi: f64) -> Self {
        Self {
            left: self.left.clamp(lo, hi),
            right: self.right.clamp(lo, hi),
        }
    }
}

/// The contract for anything that turns the two sensor responses of the
/// previous tick into wheel commands for this tick.
///
/// `update` is called exactly once per tick. `reset` is called whenever the
/// episode restarts so that no integral/derivative memory leaks across runs.
pub trait SteeringController: Debug + Send {
    /// A short label for logs.
    fn name(&self) -> &str;

    /// Consumes the previous tick's `(left, right)` responses, each in [0, 1]
    /// where 0 means "no wall".
    fn update(&mut self, left_response: f64, right_response: f64) -> WheelCommand;

    /// Forgets all accumulated state.
    fn reset(&mut self);
}

/// A controller that never moves the robot.
#[derive(Debug, Default, Clone)]
pub struct IdleController;

impl SteeringController for IdleController {
    fn name(&self) -> &str {
        "idle"
    }

    fn update(&mut self, _left_response: f64, _right_response: f64) -> WheelCommand {
        WheelCommand::STOP
    }

    fn reset(&mut self) {
        // No-op
    }
}

mod pid;

pub use pid::{ControllerState, CorridorPid, PidConfig, PidGains};
