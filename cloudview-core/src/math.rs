//! Camera math helpers
//!
//! All matrices use the column-vector convention (`p' = M * p`) and map eye
//! space depth into the OpenGL clip range [-1, 1].

use nalgebra::{Perspective3, Unit, Vector3};

use crate::point::*;

/// The world "up" axis shared by turntable rotation and navigation.
pub const WORLD_UP: Vector3d = Vector3::new(0.0, 0.0, 1.0);

/// Lengths below this are treated as zero when building rotation axes.
const AXIS_EPSILON: f64 = 1e-12;

/// Unit viewing direction for a yaw in the XY plane and a pitch towards +Z,
/// both in degrees.
pub fn direction_from_yaw_pitch(yaw: f64, pitch: f64) -> Vector3d {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vector3d::new(
        yaw.cos() * pitch.cos(),
        yaw.sin() * pitch.cos(),
        pitch.sin(),
    )
    .normalize()
}

/// Symmetric perspective projection from a vertical field of view in degrees.
pub fn perspective(fov_degrees: f64, aspect: f64, near: f64, far: f64) -> Matrix4d {
    Perspective3::new(aspect, fov_degrees.to_radians(), near, far).into_inner()
}

/// Right-handed look-at view transform.
pub fn look_at(eye: &Point3d, target: &Point3d, up: &Vector3d) -> Matrix4d {
    Matrix4d::look_at_rh(eye, target, up)
}

/// Rotation taking local +Z onto `direction`, with local +Y kept in the plane
/// spanned by `direction` and `up`.
///
/// When `direction` is parallel to `up` there is no such plane, and the
/// shortest-arc rotation from +Z is returned instead.
pub fn quaternion_from_direction(direction: &Vector3d, up: &Vector3d) -> UnitQuaterniond {
    if up.cross(direction).norm() > AXIS_EPSILON {
        return UnitQuaterniond::face_towards(direction, up);
    }
    UnitQuaterniond::rotation_between(&Vector3d::z(), direction).unwrap_or_else(|| {
        // Antiparallel to +Z: any half turn about a perpendicular axis works.
        UnitQuaterniond::from_axis_angle(&Vector3d::x_axis(), std::f64::consts::PI)
    })
}

/// Rotation by `angle` radians about `axis`, or the identity if the axis is
/// numerically zero.
pub fn axis_angle(axis: &Vector3d, angle: f64) -> UnitQuaterniond {
    match Unit::try_new(*axis, AXIS_EPSILON) {
        Some(axis) => UnitQuaterniond::from_axis_angle(&axis, angle),
        None => UnitQuaterniond::identity(),
    }
}

/// Examiner orientation for view angles given in degrees.
///
/// With all angles zero the camera looks horizontally along +Y with world +Z
/// pointing up on screen. Yaw turns about the world vertical, pitch tilts the
/// view downwards (90 is a top-down view) and roll spins it about the viewing
/// direction.
pub fn view_angles_rotation(yaw: f64, pitch: f64, roll: f64) -> UnitQuaterniond {
    let rx = UnitQuaterniond::from_axis_angle(&Vector3d::x_axis(), (pitch - 90.0).to_radians());
    let ry = UnitQuaterniond::from_axis_angle(&Vector3d::y_axis(), roll.to_radians());
    let rz = UnitQuaterniond::from_axis_angle(&Vector3d::z_axis(), yaw.to_radians());
    rx * ry * rz
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_from_yaw_pitch() {
        assert_relative_eq!(direction_from_yaw_pitch(0.0, 0.0), Vector3d::x(), epsilon = 1e-12);
        assert_relative_eq!(direction_from_yaw_pitch(90.0, 0.0), Vector3d::y(), epsilon = 1e-12);
        assert_relative_eq!(direction_from_yaw_pitch(30.0, 90.0), Vector3d::z(), epsilon = 1e-12);
        assert_relative_eq!(direction_from_yaw_pitch(123.0, -37.0).norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perspective_clip_planes() {
        let m = perspective(60.0, 4.0 / 3.0, 0.05, 500.0);
        let p = Perspective3::from_matrix_unchecked(m);
        assert_relative_eq!(p.znear(), 0.05, epsilon = 1e-9);
        assert_relative_eq!(p.zfar(), 500.0, max_relative = 1e-9);
        assert_relative_eq!(p.aspect(), 4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(p.fovy(), 60f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_quaternion_from_direction_maps_z_to_direction() {
        let dir = Vector3d::new(1.0, 2.0, 0.5).normalize();
        let q = quaternion_from_direction(&dir, &WORLD_UP);
        assert_relative_eq!(q * Vector3d::z(), dir, epsilon = 1e-12);
        // local +Y stays in the vertical plane containing the direction
        let y = q * Vector3d::y();
        assert_relative_eq!(y.dot(&dir.cross(&WORLD_UP)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quaternion_from_direction_degenerate() {
        let q = quaternion_from_direction(&WORLD_UP, &WORLD_UP);
        assert_relative_eq!(q * Vector3d::z(), WORLD_UP, epsilon = 1e-12);

        let down = -WORLD_UP;
        let q = quaternion_from_direction(&down, &WORLD_UP);
        assert_relative_eq!(q * Vector3d::z(), down, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_angle_zero_axis_is_identity() {
        let q = axis_angle(&Vector3d::zeros(), 1.0);
        assert_eq!(q, UnitQuaterniond::identity());

        let q = axis_angle(&Vector3d::new(0.0, 0.0, 2.0), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(q * Vector3d::x(), Vector3d::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_view_angles_rotation_level_view() {
        let r = view_angles_rotation(0.0, 0.0, 0.0);
        // the world direction mapped onto the camera's -Z is the viewing direction
        let forward = r.inverse() * -Vector3d::z();
        assert_relative_eq!(forward, Vector3d::y(), epsilon = 1e-12);
        assert_relative_eq!(r * WORLD_UP, Vector3d::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_view_angles_rotation_pitch_looks_down_from_above() {
        let r = view_angles_rotation(0.0, 90.0, 0.0);
        let forward = r.inverse() * -Vector3d::z();
        assert_relative_eq!(forward, -WORLD_UP, epsilon = 1e-12);
    }
}
