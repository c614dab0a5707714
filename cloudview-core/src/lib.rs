//! Core math types and errors for cloudview
//!
//! This crate provides the double precision linear algebra vocabulary shared by
//! the camera controller and its hosts, plus the workspace error type.

pub mod point;
pub mod math;
pub mod transform;
pub mod error;

pub use point::*;
pub use math::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point2, Point3, Vector2, Vector3, Matrix3, Matrix4, UnitQuaternion};
