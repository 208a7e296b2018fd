// mouse_core/src/sensor.rs

use crate::corridor::WallSegment;
use crate::geometry::{scan_line_crossing, skewed};
use serde::Deserialize;

/// Tuning of the two proximity sensors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorConfig {
    /// How far a point is pushed forward per unit of lateral offset before the
    /// scan-line test. 0.5 turns the two lateral rays into diagonal feelers.
    pub skew_factor: f64,
    /// Hidden walls only register when they are closer than this.
    pub hidden_contact_threshold: f64,
    /// Distance reported when nothing was found on a side.
    pub no_hit_distance: f64,
    /// Distance at which the response starts to rise above zero.
    pub response_range: f64,
    /// Distance over which the response ramps from 0 to 1.
    pub response_span: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            skew_factor: 0.5,
            hidden_contact_threshold: 10.0,
            no_hit_distance: 1_000_000.0,
            response_range: 200.0,
            response_span: 180.0,
        }
    }
}

/// The nearest wall found on one side of the robot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Always non-negative. Equals `SensorConfig::no_hit_distance` when nothing counted.
    pub distance: f64,
    /// Whether the nearest crossing came from a hidden wall.
    pub hidden: bool,
}

/// Both sensors for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub left: RayHit,
    pub right: RayHit,
}

/// Casts the two lateral rays against a wall list.
#[derive(Debug, Clone, Default)]
pub struct SensorModel {
    pub config: SensorConfig,
}

impl SensorModel {
    pub fn new(config: SensorConfig) -> Self {
        Self { config }
    }

    /// A reading with nothing on either side.
    pub fn empty_reading(&self) -> SensorReading {
        let nothing = RayHit {
            distance: self.config.no_hit_distance,
            hidden: false,
        };
        SensorReading {
            left: nothing,
            right: nothing,
        }
    }

    /// Finds the nearest skewed wall crossing on each side of the robot.
    ///
    /// Crossings with negative x belong to the left sensor, all others to the
    /// right. Ties keep the first wall in iteration order. A hidden nearest hit
    /// that is not within `hidden_contact_threshold` is discarded entirely.
    pub fn distances(&self, segments: &[WallSegment]) -> SensorReading {
        let mut reading = self.empty_reading();

        for segment in segments {
            let start = skewed(segment.start, self.config.skew_factor);
            let end = skewed(segment.end, self.config.skew_factor);
            let Some(x) = scan_line_crossing(start, end) else {
                continue;
            };

            let side = if x < 0.0 {
                &mut reading.left
            } else {
                &mut reading.right
            };
            let distance = x.abs();
            if distance < side.distance {
                side.distance = distance;
                side.hidden = segment.hidden;
            }
        }

        for side in [&mut reading.left, &mut reading.right] {
            if side.hidden && side.distance >= self.config.hidden_contact_threshold {
                side.distance = self.config.no_hit_distance;
            }
        }
        reading
    }

    /// Maps a hit onto the controller's proximity signal: 0 when far (or hidden),
    /// rising linearly as the wall gets closer.
    pub fn response(&self, hit: &RayHit) -> f64 {
        if hit.hidden || hit.distance >= self.config.response_range {
            return 0.0;
        }
        (self.config.response_range - hit.distance) / self.config.response_span
    }
}

impl SensorReading {
    /// `(left, right)` proximity signals for the controller.
    pub fn responses(&self, model: &SensorModel) -> (f64, f64) {
        (model.response(&self.left), model.response(&self.right))
    }
}
