// mouse_core/src/corridor/mod.rs

use crate::config::CourseConfig;
use crate::error::CoreError;
use crate::geometry::{rotated, Vec2};
use std::fmt::Debug;

/// A single wall obstacle in robot-relative coordinates.
///
/// `hidden` walls are still handed to the renderer, but they only count as an
/// obstacle for the sensors when the robot is practically touching them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub hidden: bool,
}

impl WallSegment {
    pub fn new(start: Vec2, end: Vec2, hidden: bool) -> Self {
        Self { start, end, hidden }
    }

    pub fn visible(start: Vec2, end: Vec2) -> Self {
        Self::new(start, end, false)
    }

    /// Returns this segment as seen by a robot that turned by `angle_delta`
    /// and drove `translation_delta` forward: both endpoints rotate by
    /// `-angle_delta` about the origin, then shift by `translation_delta` in y.
    pub fn moved(&self, angle_delta: f64, translation_delta: f64) -> Self {
        let shift = Vec2::new(0.0, translation_delta);
        Self {
            start: rotated(self.start, -angle_delta) + shift,
            end: rotated(self.end, -angle_delta) + shift,
            hidden: self.hidden,
        }
    }
}

/// The contract for any source of corridor walls.
///
/// The robot never moves in corridor coordinates: it sits at the origin facing
/// -y, and every tick the whole wall set is moved by the inverse of the robot's
/// motion. Implementations only decide how the walls are produced on `reset`.
pub trait Corridor: Debug + Send + Sync {
    /// A short label for logs.
    fn name(&self) -> &str;

    /// (Re)builds the complete, ordered wall list, replacing whatever was there.
    fn reset(&mut self) -> Result<(), CoreError>;

    /// Read-only view of the current walls, in generation order.
    fn segments(&self) -> &[WallSegment];

    /// Mutable access used by the provided `apply_motion_delta`.
    fn segments_mut(&mut self) -> &mut [WallSegment];

    /// Moves every wall by the inverse of one tick of robot motion.
    ///
    /// Cumulative: always applied to the walls as left by the previous tick.
    fn apply_motion_delta(&mut self, angle_delta: f64, translation_delta: f64) {
        for segment in self.segments_mut() {
            *segment = segment.moved(angle_delta, translation_delta);
        }
    }
}

mod layout;
mod obstacle_course;

pub use layout::{LayoutMaze, LayoutSource};
pub use obstacle_course::{ObstacleCourse, ObstacleCourseConfig};

/// Builds and resets the corridor described by `config`.
pub fn build_corridor(config: &CourseConfig) -> Result<Box<dyn Corridor>, CoreError> {
    let mut corridor: Box<dyn Corridor> = match config {
        CourseConfig::Procedural(course) => Box::new(ObstacleCourse::new(course.clone())?),
        CourseConfig::Layout {
            path,
            cell_size,
            grid_rows,
        } => Box::new(LayoutMaze::new(
            LayoutSource::File(path.clone()),
            *cell_size,
            *grid_rows,
        )?),
    };
    corridor.reset()?;
    tracing::debug!(
        "Built corridor '{}' with {} segments",
        corridor.name(),
        corridor.segments().len()
    );
    Ok(corridor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-9;

    /// A fixed wall list, enough to exercise the provided trait methods.
    #[derive(Debug)]
    struct FixedCorridor {
        initial: Vec<WallSegment>,
        segments: Vec<WallSegment>,
    }

    impl Corridor for FixedCorridor {
        fn name(&self) -> &str {
            "fixed"
        }

        fn reset(&mut self) -> Result<(), CoreError> {
            self.segments = self.initial.clone();
            Ok(())
        }

        fn segments(&self) -> &[WallSegment] {
            &self.segments
        }

        fn segments_mut(&mut self) -> &mut [WallSegment] {
            &mut self.segments
        }
    }

    fn fixed(segments: Vec<WallSegment>) -> FixedCorridor {
        FixedCorridor {
            initial: segments.clone(),
            segments,
        }
    }

    fn assert_vec_eq(actual: Vec2, expected: Vec2) {
        assert_abs_diff_eq!(actual.x, expected.x, epsilon = EPSILON);
        assert_abs_diff_eq!(actual.y, expected.y, epsilon = EPSILON);
    }

    #[test]
    fn test_zero_motion_is_identity() {
        let walls = vec![
            WallSegment::visible(Vec2::new(-60.0, 50.0), Vec2::new(60.0, 50.0)),
            WallSegment::new(Vec2::new(3.5, -7.25), Vec2::new(-1.0, 2.0), true),
        ];
        let mut corridor = fixed(walls.clone());
        corridor.apply_motion_delta(0.0, 0.0);
        assert_eq!(corridor.segments(), walls.as_slice());
    }

    #[test]
    fn test_motion_rotates_then_translates() {
        let mut corridor = fixed(vec![WallSegment::visible(
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        )]);
        // Robot turns a quarter: the world turns the other way, then slides by 5.
        corridor.apply_motion_delta(FRAC_PI_2, 5.0);
        let wall = corridor.segments()[0];
        assert_vec_eq(wall.start, Vec2::new(0.0, -5.0));
        assert_vec_eq(wall.end, Vec2::new(10.0, 5.0));
        assert!(!wall.hidden);
    }

    #[test]
    fn test_motion_sequence_is_cumulative() {
        let mut corridor = fixed(vec![WallSegment::visible(
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 20.0),
        )]);

        // Three ticks worked out by hand:
        // (pi/2, 10): (10,0)->(0,-10)->(0,0)      (10,20)->(20,-10)->(20,0)
        // (0, -5):    (0,0)->(0,-5)               (20,0)->(20,-5)
        // (pi, 0):    (0,-5)->(0,5)               (20,-5)->(-20,5)
        corridor.apply_motion_delta(FRAC_PI_2, 10.0);
        corridor.apply_motion_delta(0.0, -5.0);
        corridor.apply_motion_delta(PI, 0.0);

        let wall = corridor.segments()[0];
        assert_vec_eq(wall.start, Vec2::new(0.0, 5.0));
        assert_vec_eq(wall.end, Vec2::new(-20.0, 5.0));

        // Rotation does not commute with the interleaved translation: a single
        // combined step ends somewhere else.
        let mut combined = fixed(vec![WallSegment::visible(
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 20.0),
        )]);
        combined.apply_motion_delta(FRAC_PI_2 + PI, 5.0);
        assert!((combined.segments()[0].start - wall.start).norm() > 1.0);
    }

    #[test]
    fn test_reset_restores_generated_walls() {
        let walls = vec![WallSegment::visible(
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, 1.0),
        )];
        let mut corridor = fixed(walls.clone());
        corridor.apply_motion_delta(0.3, 12.0);
        assert_ne!(corridor.segments(), walls.as_slice());
        corridor.reset().unwrap();
        assert_eq!(corridor.segments(), walls.as_slice());
    }
}
