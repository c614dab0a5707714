//! Point and vector aliases
//!
//! Everything the camera touches is double precision; single precision only
//! appears at the GPU boundary.

use nalgebra::{Matrix3, Matrix4, Point2, Point3, UnitQuaternion, Vector2, Vector3};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A 2D point, used for pixel positions inside a viewport
pub type Point2d = Point2<f64>;

/// A 2D vector, used for pointer movement in pixels
pub type Vector2d = Vector2<f64>;

/// A 3x3 matrix with double precision entries
pub type Matrix3d = Matrix3<f64>;

/// A 4x4 homogeneous matrix with double precision entries
pub type Matrix4d = Matrix4<f64>;

/// A unit quaternion with double precision components
pub type UnitQuaterniond = UnitQuaternion<f64>;
