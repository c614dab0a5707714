//! GPU-facing camera uniform

use bytemuck::{Pod, Zeroable};
use nalgebra::Matrix4;

use crate::camera::InteractiveCamera;

/// Camera matrices in the layout a point shader consumes.
///
/// Matrices are column-major, matching both nalgebra and WGSL/GLSL `mat4x4`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub view_pos: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn from_camera(camera: &InteractiveCamera) -> Self {
        let view = camera.view();
        let proj = camera.projection();
        let eye = camera.position();
        Self {
            view_proj: to_f32(&(proj * view)),
            view: to_f32(&view),
            proj: to_f32(&proj),
            view_pos: [eye.x as f32, eye.y as f32, eye.z as f32],
            _padding: 0.0,
        }
    }

    /// Raw bytes for uploading into a uniform buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        Self {
            view_proj: identity,
            view: identity,
            proj: identity,
            view_pos: [0.0; 3],
            _padding: 0.0,
        }
    }
}

fn to_f32(m: &Matrix4<f64>) -> [[f32; 4]; 4] {
    m.cast::<f32>().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;

    #[test]
    fn test_uniform_size_is_aligned() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 3 * 64 + 16);
        assert_eq!(CameraUniform::default().as_bytes().len(), 208);
    }

    #[test]
    fn test_from_camera_columns() {
        let mut camera = InteractiveCamera::new();
        camera.set_viewport(Viewport::with_size(800, 600).unwrap());
        let uniform = CameraUniform::from_camera(&camera);
        // default examiner view pushes the scene 5 units down -Z; translation is the last column
        assert_eq!(uniform.view[3], [0.0, 0.0, -5.0, 1.0]);
        assert_eq!(uniform.view_pos, [0.0, 0.0, 5.0]);
    }
}
