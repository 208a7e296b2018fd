// mouse_core/src/geometry.rs

//! Small 2D helpers shared by the corridor, sensor and kinematics modules.
//!
//! All operations return new values; nothing here mutates through a shared
//! reference.

use nalgebra::{Rotation2, Vector2};

/// The only vector type the kernel uses. The robot sits at the origin facing -y.
pub type Vec2 = Vector2<f64>;

/// Rotates `v` about the origin by `radians` (counter-clockwise for positive values).
pub fn rotated(v: Vec2, radians: f64) -> Vec2 {
    Rotation2::new(radians) * v
}

/// Builds a vector from a magnitude and an angle in **degrees**.
pub fn from_polar(magnitude: f64, angle_degrees: f64) -> Vec2 {
    let angle = angle_degrees.to_radians();
    Vec2::new(magnitude * angle.cos(), magnitude * angle.sin())
}

/// Returns `(magnitude, angle_degrees)` of `v`, with the angle measured by `atan2`.
pub fn as_polar(v: Vec2) -> (f64, f64) {
    (v.norm(), v.y.atan2(v.x).to_degrees())
}

/// Pushes a point "forward" in proportion to its lateral offset: `(x, y + |x|·factor)`.
///
/// The sensor rays are horizontal, so skewing the geometry this way makes the
/// two rays behave like a pair of diagonal feelers.
pub fn skewed(v: Vec2, factor: f64) -> Vec2 {
    Vec2::new(v.x, v.y + v.x.abs() * factor)
}

/// Returns the x-coordinate at which the segment `start → end` crosses `y = 0`.
///
/// The test is half-open (`end.y < 0 <= start.y` or `start.y < 0 <= end.y`), so
/// a vertex lying exactly on the line is counted once for two adjacent segments.
pub fn scan_line_crossing(start: Vec2, end: Vec2) -> Option<f64> {
    let crosses = (end.y < 0.0 && 0.0 <= start.y) || (start.y < 0.0 && 0.0 <= end.y);
    if !crosses {
        return None;
    }
    let y_ratio = -start.y / (end.y - start.y);
    Some((end.x - start.x) * y_ratio + start.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_rotated_quarter_turn() {
        let v = rotated(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_polar_round_trip_angles() {
        let v = from_polar(50.0, -90.0);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(v.y, -50.0, epsilon = EPSILON);

        let (magnitude, angle) = as_polar(Vec2::new(-3.0, 0.0));
        assert_abs_diff_eq!(magnitude, 3.0, epsilon = EPSILON);
        assert_abs_diff_eq!(angle, 180.0, epsilon = EPSILON);
    }

    #[test]
    fn test_skewed_uses_absolute_offset() {
        assert_eq!(skewed(Vec2::new(-60.0, 50.0), 0.5), Vec2::new(-60.0, 80.0));
        assert_eq!(skewed(Vec2::new(60.0, 50.0), 0.5), Vec2::new(60.0, 80.0));
    }

    #[test]
    fn test_scan_line_crossing_interpolates() {
        let x = scan_line_crossing(Vec2::new(10.0, 10.0), Vec2::new(30.0, -10.0));
        assert_abs_diff_eq!(x.unwrap(), 20.0, epsilon = EPSILON);
    }

    #[test]
    fn test_scan_line_crossing_is_half_open() {
        // A shared vertex on the line belongs to exactly one of the two segments.
        let vertex = Vec2::new(5.0, 0.0);
        let above = Vec2::new(0.0, 10.0);
        let below = Vec2::new(10.0, -10.0);
        assert!(scan_line_crossing(above, vertex).is_none());
        assert!(scan_line_crossing(vertex, below).is_some());

        // Segments that stay on one side never cross.
        assert!(scan_line_crossing(Vec2::new(0.0, 1.0), Vec2::new(5.0, 2.0)).is_none());
    }
}
