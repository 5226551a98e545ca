//! Orbit controls: drag to rotate around the target, wheel to dolly,
//! right-drag to pan.
//!
//! The camera offset from the target is kept in spherical coordinates
//! (radius, polar angle from +Y, azimuth around Y from +Z).

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use globe_config::CameraConfig;
use globe_render::PerspectiveCamera;

use crate::input::PointerState;

/// Keeps the polar angle off the poles, where the view basis degenerates.
const POLAR_EPSILON: f32 = 1e-6;

/// Dolly factor per wheel step at `zoom_speed = 1`.
const ZOOM_BASE: f32 = 0.95;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    polar: f32,
    azimuth: f32,
    min_distance: f32,
    max_distance: f32,
    rotate_speed: f32,
    zoom_speed: f32,
}

impl OrbitControls {
    /// Start from the camera's current placement.
    pub fn new(camera: &PerspectiveCamera, config: &CameraConfig) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        let polar = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };
        let mut controls = Self {
            target: camera.target,
            radius,
            polar,
            azimuth: offset.x.atan2(offset.z),
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
        };
        controls.clamp();
        controls
    }

    /// Fold this frame's pointer input into the camera. Returns whether the
    /// camera moved.
    pub fn update(
        &mut self,
        camera: &mut PerspectiveCamera,
        pointer: &PointerState,
        viewport_height: u32,
    ) -> bool {
        let height = viewport_height.max(1) as f32;
        let rotate = pointer.rotate_drag();
        let pan = pointer.pan_drag();
        let scroll = pointer.scroll();
        if rotate == Vec2::ZERO && pan == Vec2::ZERO && scroll == 0.0 {
            return false;
        }

        self.rotate(rotate, height);
        self.dolly(scroll);
        self.pan(camera, pan, height);
        self.clamp();
        self.apply(camera);
        true
    }

    /// Dragging the full viewport height turns the camera `2π × rotate_speed`.
    fn rotate(&mut self, drag: Vec2, height: f32) {
        self.azimuth -= TAU * drag.x / height * self.rotate_speed;
        self.polar -= TAU * drag.y / height * self.rotate_speed;
        self.azimuth = self.azimuth.rem_euclid(TAU);
    }

    /// Positive steps dolly in.
    fn dolly(&mut self, steps: f32) {
        if steps != 0.0 {
            self.radius *= ZOOM_BASE.powf(self.zoom_speed * steps);
        }
    }

    /// Move the target in the camera plane so the point under the cursor
    /// follows the pointer at the target's depth.
    fn pan(&mut self, camera: &PerspectiveCamera, drag: Vec2, height: f32) {
        if drag == Vec2::ZERO {
            return;
        }
        let world_per_pixel = 2.0 * self.radius * (camera.fov_y / 2.0).tan() / height;
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward);
        self.target += (-right * drag.x + up * drag.y) * world_per_pixel;
    }

    fn clamp(&mut self) {
        self.polar = self.polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);
    }

    /// Write the spherical state back into the camera.
    pub fn apply(&self, camera: &mut PerspectiveCamera) {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        let offset = Vec3::new(
            sin_polar * sin_azimuth,
            cos_polar,
            sin_polar * cos_azimuth,
        ) * self.radius;
        camera.target = self.target;
        camera.position = self.target + offset;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Angle from +Y in radians.
    pub fn polar_angle(&self) -> f32 {
        self.polar
    }

    /// Angle around Y from +Z in radians.
    pub fn azimuth_angle(&self) -> f32 {
        self.azimuth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::{ElementState, MouseButton, MouseScrollDelta};

    fn setup() -> (PerspectiveCamera, OrbitControls) {
        let config = CameraConfig::default();
        let camera = PerspectiveCamera::new(
            config.fov_y_degrees,
            16.0 / 9.0,
            config.near,
            config.far,
            3.0,
        );
        let controls = OrbitControls::new(&camera, &config);
        (camera, controls)
    }

    fn drag(button: MouseButton, dx: f64, dy: f64) -> PointerState {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(0.0, 0.0);
        pointer.on_button(button, ElementState::Pressed);
        pointer.on_cursor_moved(dx, dy);
        pointer
    }

    fn wheel(steps: f32) -> PointerState {
        let mut pointer = PointerState::new();
        pointer.on_scroll(MouseScrollDelta::LineDelta(0.0, steps));
        pointer
    }

    #[test]
    fn test_initial_spherical_state() {
        let (_camera, controls) = setup();
        assert!((controls.distance() - 3.0).abs() < 1e-6);
        assert!((controls.polar_angle() - PI / 2.0).abs() < 1e-6);
        assert!(controls.azimuth_angle().abs() < 1e-6);
        assert_eq!(controls.target(), Vec3::ZERO);
    }

    #[test]
    fn test_no_input_leaves_camera() {
        let (mut camera, mut controls) = setup();
        let before = camera.position;
        assert!(!controls.update(&mut camera, &PointerState::new(), 720));
        assert_eq!(camera.position, before);
    }

    #[test]
    fn test_full_height_drag_is_full_turn() {
        let (mut camera, mut controls) = setup();
        let before = camera.position;
        assert!(controls.update(&mut camera, &drag(MouseButton::Left, 720.0, 0.0), 720));
        assert!((camera.position - before).length() < 1e-4);
    }

    #[test]
    fn test_quarter_drag_rotates_quarter_turn() {
        let (mut camera, mut controls) = setup();
        controls.update(&mut camera, &drag(MouseButton::Left, 180.0, 0.0), 720);
        // Dragging right swings the camera toward -X.
        assert!((camera.position - Vec3::new(-3.0, 0.0, 0.0)).length() < 1e-4);
        assert!((camera.position.length() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_polar_angle_stays_inside_open_interval() {
        let (mut camera, mut controls) = setup();
        for dy in [10_000.0, -10_000.0, 5_000.0, -50_000.0] {
            controls.update(&mut camera, &drag(MouseButton::Left, 0.0, dy), 720);
            let polar = controls.polar_angle();
            assert!(polar > 0.0 && polar < PI, "polar {polar}");
            assert!(camera.position.is_finite());
        }
    }

    #[test]
    fn test_wheel_dollies_by_zoom_base() {
        let (mut camera, mut controls) = setup();
        controls.update(&mut camera, &wheel(1.0), 720);
        assert!((controls.distance() - 3.0 * 0.95).abs() < 1e-5);
        controls.update(&mut camera, &wheel(-1.0), 720);
        assert!((controls.distance() - 3.0).abs() < 1e-5);
        assert!((camera.position.length() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_distance_clamped_to_bounds() {
        let (mut camera, mut controls) = setup();
        let config = CameraConfig::default();
        controls.update(&mut camera, &wheel(500.0), 720);
        assert!((controls.distance() - config.min_distance).abs() < 1e-6);
        controls.update(&mut camera, &wheel(-500.0), 720);
        assert!((controls.distance() - config.max_distance).abs() < 1e-4);
        assert!((camera.position.length() - config.max_distance).abs() < 1e-3);
    }

    #[test]
    fn test_right_drag_pans_target() {
        let (mut camera, mut controls) = setup();
        controls.update(&mut camera, &drag(MouseButton::Right, 100.0, 0.0), 720);
        // Dragging right slides the view left: the target moves toward -X.
        assert!(controls.target().x < 0.0);
        assert!(controls.target().y.abs() < 1e-6);
        assert_eq!(camera.target, controls.target());
        assert!((controls.distance() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_speed_scales_turn() {
        let mut config = CameraConfig::default();
        config.rotate_speed = 0.5;
        let mut camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 1000.0, 3.0);
        let mut controls = OrbitControls::new(&camera, &config);
        controls.update(&mut camera, &drag(MouseButton::Left, 720.0, 0.0), 720);
        // Half a turn.
        assert!((camera.position - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-4);
    }
}
