// mouse_core/src/simulation.rs

use crate::config::{CommandClamp, SimConfig};
use crate::controller::{SteeringController, WheelCommand};
use crate::corridor::{Corridor, WallSegment};
use crate::episode::{EpisodePhase, EpisodeState};
use crate::error::CoreError;
use crate::kinematics::{DifferentialDrive, DriveStep, RobotPose};
use crate::sensor::{SensorModel, SensorReading};

/// What happened during one tick. This is all a renderer or telemetry sink
/// needs besides the wall list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Controller output before clamping and gating.
    pub raw_command: WheelCommand,
    /// The command that was actually integrated.
    pub command: WheelCommand,
    pub step: DriveStep,
    pub reading: SensorReading,
    pub left_response: f64,
    pub right_response: f64,
    pub phase: EpisodePhase,
    pub score: i64,
}

/// The closed loop: controller, drive, corridor, sensors and run bookkeeping.
///
/// The caller owns the clock. `now` is any monotonic time in seconds; the
/// simulation only compares it against the start deadline and measures the
/// elapsed running time with it.
#[derive(Debug)]
pub struct Simulation {
    corridor: Box<dyn Corridor>,
    controller: Box<dyn SteeringController>,
    drive: DifferentialDrive,
    sensor: SensorModel,
    command_clamp: CommandClamp,
    pose: RobotPose,
    episode: EpisodeState,
    reading: SensorReading,
    responses: (f64, f64),
    phase: EpisodePhase,
}

impl Simulation {
    pub fn new(
        config: &SimConfig,
        corridor: Box<dyn Corridor>,
        controller: Box<dyn SteeringController>,
        now: f64,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let sensor = SensorModel::new(config.sensor.clone());
        let mut simulation = Self {
            corridor,
            controller,
            drive: DifferentialDrive::new(config.drive.clone()),
            reading: sensor.empty_reading(),
            sensor,
            command_clamp: config.command_clamp,
            pose: RobotPose::origin(),
            episode: EpisodeState::new(config.episode.clone(), now),
            responses: (0.0, 0.0),
            phase: EpisodePhase::Countdown,
        };
        simulation.reset(now)?;
        Ok(simulation)
    }

    /// Starts a fresh episode: new walls, a blank controller, the robot back
    /// at the origin and the countdown restarted.
    ///
    /// The walls are rebuilt first so that a failing rebuild leaves the rest
    /// of the state untouched.
    pub fn reset(&mut self, now: f64) -> Result<(), CoreError> {
        self.corridor.reset()?;
        self.controller.reset();
        self.pose = RobotPose::origin();
        self.episode.reset(now);
        self.reading = self.sensor.distances(self.corridor.segments());
        self.responses = self.reading.responses(&self.sensor);
        self.phase = self.episode.phase(now);
        tracing::debug!(
            "Reset '{}' with controller '{}', {} walls, start at t={:.2}",
            self.corridor.name(),
            self.controller.name(),
            self.corridor.segments().len(),
            self.episode.start_deadline
        );
        Ok(())
    }

    /// Advances the loop by `dt` seconds, with `now` being the time at the
    /// end of the tick.
    pub fn tick(&mut self, dt: f64, now: f64) -> TickReport {
        let (left_response, right_response) = self.responses;
        let raw_command = self.controller.update(left_response, right_response);

        let (lo, hi) = self.command_clamp.bounds();
        let command = self.episode.gate(raw_command.clamped(lo, hi), now);

        let step = self
            .drive
            .step(self.pose.heading_angle, command.left, command.right, dt);
        self.pose.advance(&step);
        self.corridor
            .apply_motion_delta(step.angle_delta, step.translation_delta);

        self.reading = self.sensor.distances(self.corridor.segments());
        self.episode.record(step.translation_delta, &self.reading, now);
        self.responses = self.reading.responses(&self.sensor);

        let phase = self.episode.phase(now);
        if phase != self.phase {
            tracing::debug!("Episode phase {:?} -> {:?} at t={:.2}", self.phase, phase, now);
            self.phase = phase;
        }

        TickReport {
            raw_command,
            command,
            step,
            reading: self.reading,
            left_response: self.responses.0,
            right_response: self.responses.1,
            phase,
            score: self.episode.score,
        }
    }

    /// Swaps the steering source mid-run. The new controller starts blank.
    pub fn set_controller(&mut self, mut controller: Box<dyn SteeringController>) {
        controller.reset();
        tracing::debug!(
            "Controller '{}' replaced by '{}'",
            self.controller.name(),
            controller.name()
        );
        self.controller = controller;
    }

    pub fn controller(&self) -> &dyn SteeringController {
        self.controller.as_ref()
    }

    pub fn segments(&self) -> &[WallSegment] {
        self.corridor.segments()
    }

    pub fn pose(&self) -> &RobotPose {
        &self.pose
    }

    pub fn episode(&self) -> &EpisodeState {
        &self.episode
    }

    pub fn reading(&self) -> &SensorReading {
        &self.reading
    }

    /// `(left, right)` responses the controller will see on the next tick.
    pub fn responses(&self) -> (f64, f64) {
        self.responses
    }
}
