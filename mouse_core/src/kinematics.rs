// mouse_core/src/kinematics.rs

use crate::geometry::{from_polar, Vec2};
use serde::Deserialize;

/// Physical constants of the two-wheeled robot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveConfig {
    /// Wheel travel per second at a full (1.0) command.
    pub max_speed: f64,
    /// Half the distance between the wheels.
    pub axle_radius: f64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            max_speed: 500.0,
            axle_radius: 25.0,
        }
    }
}

/// Wheel travel for one tick under a square-root motor response.
///
/// Small commands move the wheel proportionally further than a linear map
/// would; the sign of the command is kept.
pub fn shape_wheel_signal(speed: f64, max_speed: f64, dt: f64) -> f64 {
    if speed == 0.0 {
        return 0.0;
    }
    max_speed * dt * speed.signum() * speed.abs().sqrt()
}

/// The motion of the robot during one tick, expressed in its own frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveStep {
    /// Change of heading (radians). Positive when the left wheel travels further.
    pub angle_delta: f64,
    /// Forward travel along the heading.
    pub translation_delta: f64,
    /// Unit heading after the step, `angle 0` pointing away from the start line (-y).
    pub heading_vector: Vec2,
}

/// Kinematic differential-drive model.
#[derive(Debug, Clone, Default)]
pub struct DifferentialDrive {
    pub config: DriveConfig,
}

impl DifferentialDrive {
    pub fn new(config: DriveConfig) -> Self {
        Self { config }
    }

    /// Integrates one tick of wheel commands starting from `heading_angle`.
    ///
    /// # Arguments
    /// * `heading_angle`: Integrated heading before this tick (radians).
    /// * `left`, `right`: Wheel commands, nominally in [-1, 1].
    /// * `dt`: Tick duration in seconds.
    ///
    /// # Returns
    /// The angle and translation deltas plus the heading vector after the step.
    pub fn step(&self, heading_angle: f64, left: f64, right: f64, dt: f64) -> DriveStep {
        let v_left = shape_wheel_signal(left, self.config.max_speed, dt);
        let v_right = shape_wheel_signal(right, self.config.max_speed, dt);

        let angle_delta = (v_left - v_right) / (2.0 * self.config.axle_radius);
        let translation_delta = (v_left + v_right) / 2.0;
        let heading_vector = from_polar(1.0, (heading_angle + angle_delta).to_degrees() - 90.0);

        DriveStep {
            angle_delta,
            translation_delta,
            heading_vector,
        }
    }
}

/// Pose of the robot in start-line coordinates.
///
/// Kept by the episode driver for telemetry; the corridor never needs it
/// because the walls are moved instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotPose {
    pub position: Vec2,
    pub heading_angle: f64,
    pub heading_vector: Vec2,
}

impl Default for RobotPose {
    fn default() -> Self {
        Self::origin()
    }
}

impl RobotPose {
    pub fn origin() -> Self {
        Self {
            position: Vec2::zeros(),
            heading_angle: 0.0,
            heading_vector: Vec2::new(1.0, 0.0),
        }
    }

    /// Applies one integrated step: turn first, then drive along the new heading.
    pub fn advance(&mut self, step: &DriveStep) {
        self.heading_angle += step.angle_delta;
        self.heading_vector = step.heading_vector;
        self.position += step.heading_vector * step.translation_delta;
    }
}
