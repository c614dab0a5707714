//! Interactive camera for 3D point cloud viewers
//!
//! This crate provides the camera side of a viewer widget:
//! - Examiner camera with trackball and turntable rotation
//! - First-person navigation with keyboard movement and mouse-look
//! - Projection, view, viewport and rotation matrices for rendering
//! - Change notification for cached matrices and redraws
//! - A `winit` input adapter that drives the camera from window events

pub mod camera;
pub mod config;
pub mod events;
pub mod input;
pub mod navigation;
pub mod uniform;
pub mod viewport;

pub use camera::*;
pub use config::*;
pub use events::*;
pub use input::*;
pub use navigation::*;
pub use uniform::*;
pub use viewport::*;
