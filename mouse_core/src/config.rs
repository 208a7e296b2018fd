// mouse_core/src/config.rs

use crate::controller::PidConfig;
use crate::corridor::ObstacleCourseConfig;
use crate::episode::EpisodeConfig;
use crate::error::CoreError;
use crate::kinematics::DriveConfig;
use crate::sensor::SensorConfig;
use serde::Deserialize;
use std::path::PathBuf;

// =========================================================================
// == Top-Level Kernel Configuration ==
// =========================================================================

/// Everything the kernel needs to build and step a simulation.
///
/// Every section falls back to its defaults, which reproduce the reference
/// robot, so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub drive: DriveConfig,
    pub sensor: SensorConfig,
    pub controller: PidConfig,
    pub episode: EpisodeConfig,
    pub course: CourseConfig,
    pub command_clamp: CommandClamp,
}

impl SimConfig {
    /// Rejects values the model cannot step with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.drive.max_speed <= 0.0 || self.drive.axle_radius <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "drive max_speed and axle_radius must be positive, got {} and {}",
                self.drive.max_speed, self.drive.axle_radius
            )));
        }
        if self.sensor.response_span <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "sensor response_span must be positive, got {}",
                self.sensor.response_span
            )));
        }
        if self.episode.countdown < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "episode countdown cannot be negative, got {}",
                self.episode.countdown
            )));
        }
        if let CourseConfig::Layout {
            cell_size,
            grid_rows,
            ..
        } = &self.course
        {
            if *cell_size <= 0.0 || *grid_rows == 0 {
                return Err(CoreError::InvalidConfig(format!(
                    "layout needs a positive cell_size and at least one row, got {cell_size} and {grid_rows}"
                )));
            }
        }
        Ok(())
    }
}

// =========================================================================
// == Course Selection ==
// =========================================================================

fn default_cell_size() -> f64 {
    100.0
}

fn default_grid_rows() -> usize {
    16
}

/// Which corridor the robot drives through. The `type` field picks the variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "PascalCase")] // "Procedural" / "Layout" in TOML
pub enum CourseConfig {
    /// The generated obstacle course.
    Procedural(ObstacleCourseConfig),
    /// A maze read from a text grid file.
    Layout {
        path: PathBuf,
        #[serde(default = "default_cell_size")]
        cell_size: f64,
        #[serde(default = "default_grid_rows")]
        grid_rows: usize,
    },
}

impl Default for CourseConfig {
    fn default() -> Self {
        CourseConfig::Procedural(ObstacleCourseConfig::default())
    }
}

impl CourseConfig {
    /// A layout course with the default grid geometry.
    pub fn layout(path: impl Into<PathBuf>) -> Self {
        CourseConfig::Layout {
            path: path.into(),
            cell_size: default_cell_size(),
            grid_rows: default_grid_rows(),
        }
    }
}

// =========================================================================
// == Command Limits ==
// =========================================================================

/// Range the controller's wheel commands are clamped to before integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CommandClamp {
    /// [-1, 1]: wheels may be driven backwards.
    #[default]
    Symmetric,
    /// [0, 1]: forward only.
    Forward,
}

impl CommandClamp {
    pub fn bounds(self) -> (f64, f64) {
        match self {
            CommandClamp::Symmetric => (-1.0, 1.0),
            CommandClamp::Forward => (0.0, 1.0),
        }
    }
}
