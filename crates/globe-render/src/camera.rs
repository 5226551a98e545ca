//! Perspective camera producing reverse-Z view and projection matrices.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::buffer::{BufferAllocator, uniform_bind_group, uniform_bind_group_layout};

/// Camera data uploaded once per frame and shared by every pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection * view.
    pub view_proj: [[f32; 4]; 4],
    /// World to view space.
    pub view: [[f32; 4]; 4],
    /// View to clip space.
    pub proj: [[f32; 4]; 4],
    /// World-space eye position (w unused).
    pub camera_pos: [f32; 4],
}

impl CameraUniform {
    /// Size in bytes, for bind group layout `min_binding_size`.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;
}

/// Perspective camera looking at a target point.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// World up direction.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl PerspectiveCamera {
    /// Camera at `(0, 0, distance)` looking at the origin.
    pub fn new(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32, distance: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: fov_y_degrees.to_radians(),
            aspect_ratio,
            near,
            far,
        }
    }

    /// Compute the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Compute the projection matrix with reverse-Z.
    pub fn projection_matrix(&self) -> Mat4 {
        // Swapped near/far maps the near plane to depth 1 and the far plane to 0.
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from the eye toward the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Update the aspect ratio to exactly `width / height`.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height;
    }

    /// Convert the camera to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        let view = self.view_matrix();
        let proj = self.projection_matrix();
        CameraUniform {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            camera_pos: self.position.extend(1.0).to_array(),
        }
    }
}

/// GPU copy of the camera: one uniform buffer bound at group 0 by every pipeline.
pub struct CameraBinding {
    pub buffer: wgpu::Buffer,
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    pub fn new(device: &wgpu::Device, camera: &PerspectiveCamera) -> Self {
        let buffer =
            BufferAllocator::new(device).create_uniform("camera-uniform", &camera.to_uniform());
        let layout = uniform_bind_group_layout(
            device,
            "camera-bind-group-layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            CameraUniform::SIZE,
        );
        let bind_group = uniform_bind_group(device, "camera-bind-group", &layout, &buffer);
        Self {
            buffer,
            layout,
            bind_group,
        }
    }

    /// Upload the camera's current matrices.
    pub fn update(&self, queue: &wgpu::Queue, camera: &PerspectiveCamera) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&camera.to_uniform()));
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 16.0 / 9.0, 0.1, 1000.0, 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn ndc(camera: &PerspectiveCamera, p: Vec3) -> Vec3 {
        let clip = camera.view_projection_matrix() * p.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn test_default_camera_matches_viewer_setup() {
        let camera = PerspectiveCamera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert!((camera.fov_y - 50f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn test_looks_down_neg_z_at_origin() {
        let camera = PerspectiveCamera::default();
        let forward = camera.forward();
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
        let center = ndc(&camera, Vec3::ZERO);
        assert!(center.x.abs() < 1e-6 && center.y.abs() < 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio_is_exact() {
        let mut camera = PerspectiveCamera::default();
        camera.set_aspect_ratio(1917.0, 1043.0);
        assert_eq!(camera.aspect_ratio, 1917.0 / 1043.0);
    }

    #[test]
    fn test_reverse_z_near_is_one_far_is_zero() {
        let camera = PerspectiveCamera::default();
        let near = ndc(&camera, Vec3::new(0.0, 0.0, 5.0 - 0.1));
        let far = ndc(&camera, Vec3::new(0.0, 0.0, 5.0 - 1000.0));
        assert!((near.z - 1.0).abs() < 1e-4);
        assert!(far.z.abs() < 1e-4);
    }

    #[test]
    fn test_closer_points_have_greater_depth() {
        let camera = PerspectiveCamera::default();
        let front = ndc(&camera, Vec3::new(0.0, 0.0, 1.0));
        let back = ndc(&camera, Vec3::new(0.0, 0.0, -1.0));
        assert!(front.z > back.z);
    }

    #[test]
    fn test_uniform_carries_eye_position() {
        let camera = PerspectiveCamera::default();
        let uniform = camera.to_uniform();
        assert_eq!(uniform.camera_pos, [0.0, 0.0, 5.0, 1.0]);
        let vp = Mat4::from_cols_array_2d(&uniform.view_proj);
        let expected = camera.view_projection_matrix();
        assert!((vp * Vec4::ONE - expected * Vec4::ONE).length() < 1e-5);
    }

    #[test]
    fn test_uniform_size_is_std140_friendly() {
        assert_eq!(CameraUniform::SIZE, 3 * 64 + 16);
        assert_eq!(CameraUniform::SIZE % 16, 0);
    }
}
