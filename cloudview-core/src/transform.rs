//! 3D transformation utilities

use nalgebra::{Matrix4, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::point::*;

/// A homogeneous 3D transformation that can be applied to points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f64>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(translation: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Create a rotation transformation from a quaternion
    pub fn rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Create a scaling transformation
    pub fn scaling(scale: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Apply the transformation to a point, including the perspective divide
    pub fn transform_point(&self, point: &Point3d) -> Result<Point3d> {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3d::from_homogeneous(homogeneous).ok_or_else(|| {
            Error::SingularTransform(format!("point {point} maps to infinity"))
        })
    }

    /// Compose this transformation with another; `other` is applied first
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Get the inverse transformation
    pub fn inverse(self) -> Result<Self> {
        self.matrix
            .try_inverse()
            .map(|matrix| Self { matrix })
            .ok_or_else(|| Error::SingularTransform("matrix has no inverse".to_string()))
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Matrix4<f64>> for Transform3D {
    fn from(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compose_applies_right_hand_side_first() {
        let t = Transform3D::translation(Vector3::new(1.0, 0.0, 0.0));
        let s = Transform3D::scaling(Vector3::new(2.0, 2.0, 2.0));
        let p = (t * s).transform_point(&Point3d::new(1.0, 1.0, 1.0)).unwrap();
        assert_relative_eq!(p, Point3d::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let rot = UnitQuaternion::from_euler_angles(0.3, -0.2, 1.1);
        let t = Transform3D::translation(Vector3::new(1.0, -2.0, 3.0)) * Transform3D::rotation(rot);
        let p = Point3d::new(0.5, 0.25, -4.0);
        let q = t.transform_point(&p).unwrap();
        let back = t.inverse().unwrap().transform_point(&q).unwrap();
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_inverse_is_an_error() {
        let flat = Transform3D::scaling(Vector3::new(1.0, 1.0, 0.0));
        assert!(matches!(flat.inverse(), Err(Error::SingularTransform(_))));
    }

    #[test]
    fn test_point_at_infinity_is_an_error() {
        let mut m = Matrix4::identity();
        m[(3, 3)] = 0.0;
        let t = Transform3D::from(m);
        assert!(t.transform_point(&Point3d::origin()).is_err());
    }
}
