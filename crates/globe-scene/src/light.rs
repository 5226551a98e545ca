//! The sun: a single directional light.

use glam::Vec3;
use globe_config::SunConfig;
use globe_render::hex_to_linear;

/// Light arriving from infinitely far away along the line through `position`
/// and the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    /// Linear RGB.
    pub color: [f32; 3],
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn from_config(config: &SunConfig) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            color: hex_to_linear(config.color),
            intensity: config.intensity,
        }
    }

    /// Unit vector from the surface toward the light.
    pub fn direction(&self) -> Vec3 {
        self.position.try_normalize().unwrap_or(Vec3::Y)
    }

    /// Color scaled by intensity.
    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }

    /// Diffuse factor for a surface with the given normal.
    pub fn lambert(&self, normal: Vec3) -> f32 {
        normal.normalize().dot(self.direction()).max(0.0)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::from_config(&SunConfig::default())
    }
}
