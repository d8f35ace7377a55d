/// Arcball: map a screen-space drag to a rotation
use nalgebra::{Point2, Unit, UnitQuaternion, Vector3};

/// Scale applied to the angle between the two projected drag points
pub const TRACKBALL_SENSITIVITY: f32 = 0.8;

/// Cross products shorter than this are treated as "no drag"
const DEGENERATE_AXIS: f32 = 1e-6;

/// Project a point in normalized device coordinates onto the unit hemisphere
/// facing the viewer. Points outside the unit circle land on its rim.
pub fn project_to_sphere(point: Point2<f32>) -> Vector3<f32> {
    let d2 = point.x * point.x + point.y * point.y;
    if d2 <= 1.0 {
        Vector3::new(point.x, point.y, (1.0 - d2).sqrt())
    } else {
        let d = d2.sqrt();
        Vector3::new(point.x / d, point.y / d, 0.0)
    }
}

/// Rotation for a drag from `start` to `end`, both in `[-1, 1]²`.
///
/// Returns the identity when the drag does not define an axis, such as a
/// zero-length drag.
pub fn drag_rotation(start: Point2<f32>, end: Point2<f32>) -> UnitQuaternion<f32> {
    let p1 = project_to_sphere(start);
    let p2 = project_to_sphere(end);

    let axis = p1.cross(&p2);
    if axis.norm() < DEGENERATE_AXIS {
        return UnitQuaternion::identity();
    }

    let angle = p1.dot(&p2).clamp(-1.0, 1.0).acos() * TRACKBALL_SENSITIVITY;
    UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_zero_drag_is_identity() {
        let p = Point2::new(0.3, -0.2);
        let q = drag_rotation(p, p);
        assert_eq!(q, UnitQuaternion::identity());
    }

    #[test]
    fn test_projection_inside_and_outside() {
        let inside = project_to_sphere(Point2::new(0.0, 0.0));
        assert_relative_eq!(inside, Vector3::new(0.0, 0.0, 1.0));

        let outside = project_to_sphere(Point2::new(2.0, 0.0));
        assert_relative_eq!(outside, Vector3::new(1.0, 0.0, 0.0));

        let edge = project_to_sphere(Point2::new(0.6, 0.8));
        assert_relative_eq!(edge.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_center_to_right_edge_golden_value() {
        // (0,0,1) to (1,0,0): axis +Y, angle 90° scaled by the sensitivity
        let q = drag_rotation(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let half = 0.5 * (PI / 2.0) * TRACKBALL_SENSITIVITY;

        assert_relative_eq!(q.i, 0.0, epsilon = 1e-6);
        assert_relative_eq!(q.j, half.sin(), epsilon = 1e-6);
        assert_relative_eq!(q.k, 0.0, epsilon = 1e-6);
        assert_relative_eq!(q.w, half.cos(), epsilon = 1e-6);
        assert_relative_eq!(q.angle(), 0.4 * PI, epsilon = 1e-5);
    }

    #[test]
    fn test_drag_right_turns_front_toward_right() {
        let q = drag_rotation(Point2::new(0.0, 0.0), Point2::new(0.5, 0.0));
        let front = q * Vector3::new(0.0, 0.0, 1.0);
        assert!(front.x > 0.0);
        assert_relative_eq!(front.y, 0.0, epsilon = 1e-6);
    }
}
