// mouse_core/src/corridor/obstacle_course.rs

use crate::corridor::{Corridor, WallSegment};
use crate::error::CoreError;
use crate::geometry::{as_polar, from_polar, Vec2};
use serde::Deserialize;

/// Number of steps at the end of the course whose walls are hidden and whose
/// width collapses to zero.
const END_CAP_STEPS: usize = 3;

/// Parameters of the procedural obstacle course.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObstacleCourseConfig {
    /// Number of centre-line steps (each step emits one left and one right wall).
    pub steps: usize,
    /// Distance between consecutive centre-line points.
    pub step_size: f64,
    /// Lateral distance from the centre line to each wall at the start.
    pub initial_width: f64,
    /// y-coordinate of the starting line (behind the robot, which faces -y).
    pub start_y: f64,
}

impl Default for ObstacleCourseConfig {
    fn default() -> Self {
        Self {
            steps: 1500,
            step_size: 50.0,
            initial_width: 120.0,
            start_y: 100.0,
        }
    }
}

/// A long, winding corridor generated from a deterministic wobble function.
///
/// The width narrows, opens into a wide hall, pinches hard, then pulsates; past
/// step 1000 the walls have periodic gaps, and the last few steps open up
/// entirely.
#[derive(Debug, Clone)]
pub struct ObstacleCourse {
    config: ObstacleCourseConfig,
    segments: Vec<WallSegment>,
}

impl ObstacleCourse {
    pub fn new(config: ObstacleCourseConfig) -> Result<Self, CoreError> {
        if config.steps <= END_CAP_STEPS {
            return Err(CoreError::InvalidConfig(format!(
                "obstacle course needs more than {} steps, got {}",
                END_CAP_STEPS, config.steps
            )));
        }
        if config.step_size <= 0.0 || config.initial_width <= 0.0 {
            return Err(CoreError::InvalidConfig(
                "obstacle course step_size and initial_width must be positive".to_string(),
            ));
        }
        Ok(Self {
            config,
            segments: Vec::new(),
        })
    }

    /// Raw lateral offset of the centre line at step `i`.
    fn wobble(i: f64) -> f64 {
        i * (i.powf(1.1 + 0.2 * (i / 50.0).sin()) / 100.0).sin() * (i.powf(1.25) / 77.0).sin()
    }

    /// Visibility of the (left, right) walls emitted at step `i`.
    fn hidden_pattern(&self, i: usize) -> (bool, bool) {
        let mut hidden = (false, false);
        if i == 501 {
            hidden = (true, true);
        }
        if i > 999 {
            hidden = (i % 89 < 4, i % 67 < 4);
        }
        if i >= self.config.steps - END_CAP_STEPS {
            hidden = (true, true);
        }
        hidden
    }

    /// Width to use for the step after `i`.
    fn next_width(&self, i: usize, width: f64) -> f64 {
        let last_pulse = self.config.steps - END_CAP_STEPS;
        let mut width = width;
        if 420 < i && i <= 460 {
            width -= 2.0;
        }
        if i == 500 {
            width += 400.0;
        }
        if 530 < i && i <= 550 {
            width -= 19.0;
        }
        if 600 < i && i <= last_pulse {
            width += 0.6 * (i as f64 / 20.0).sin();
        }
        if i > last_pulse {
            width = 0.0;
        }
        width
    }

    fn generate(&self) -> Vec<WallSegment> {
        let cfg = &self.config;
        let mut width = cfg.initial_width;
        let mut last_center = Vec2::new(0.0, cfg.start_y);
        let mut last_left = Vec2::new(-width, cfg.start_y);
        let mut last_right = Vec2::new(width, cfg.start_y);

        let mut segments = Vec::with_capacity(1 + 2 * cfg.steps);
        // Closes the corridor behind the robot.
        segments.push(WallSegment::new(last_left, last_right, true));

        for i in 0..cfg.steps {
            let raw_center = Vec2::new(Self::wobble(i as f64), -(i as f64) * cfg.step_size);
            // Re-step at a fixed length along the direction of the raw centre.
            let (_, angle) = as_polar(raw_center - last_center);
            let center = last_center + from_polar(cfg.step_size, angle);
            let left = center + from_polar(width, angle - 90.0);
            let right = center + from_polar(width, angle + 90.0);

            let (left_hidden, right_hidden) = self.hidden_pattern(i);
            segments.push(WallSegment::new(last_left, left, left_hidden));
            segments.push(WallSegment::new(last_right, right, right_hidden));

            last_left = left;
            last_right = right;
            last_center = center;
            width = self.next_width(i, width);
        }
        segments
    }
}

impl Corridor for ObstacleCourse {
    fn name(&self) -> &str {
        "obstacle-course"
    }

    fn reset(&mut self) -> Result<(), CoreError> {
        self.segments = self.generate();
        Ok(())
    }

    fn segments(&self) -> &[WallSegment] {
        &self.segments
    }

    fn segments_mut(&mut self) -> &mut [WallSegment] {
        &mut self.segments
    }
}
