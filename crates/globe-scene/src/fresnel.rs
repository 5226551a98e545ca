//! Fresnel rim glow: a view-angle dependent opacity that fakes an atmosphere.
//!
//! The shader evaluates
//! `factor = bias + scale * (1 + dot(I, N))^power`
//! per vertex, where `I` is the unit vector from the eye to the surface point
//! and `N` the world-space normal. The fragment color is
//! `mix(facing_color, rim_color, f)` with alpha `f = clamp(factor, 0, 1)`.

use glam::Vec3;
use globe_config::FresnelConfig;
use globe_render::hex_to_linear;

/// Parameters of the glow material. Colors are linear RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FresnelParams {
    pub rim_color: [f32; 3],
    pub facing_color: [f32; 3],
    pub bias: f32,
    pub scale: f32,
    pub power: f32,
}

impl Default for FresnelParams {
    fn default() -> Self {
        Self::from_config(&FresnelConfig::default())
    }
}

impl FresnelParams {
    pub fn from_config(config: &FresnelConfig) -> Self {
        Self {
            rim_color: hex_to_linear(config.rim_color),
            facing_color: hex_to_linear(config.facing_color),
            bias: config.bias,
            scale: config.scale,
            power: config.power,
        }
    }

    /// Unclamped reflection factor for view direction `incident` and `normal`.
    pub fn reflection_factor(&self, incident: Vec3, normal: Vec3) -> f32 {
        let facing = (1.0 + incident.normalize().dot(normal.normalize())).max(0.0);
        self.bias + self.scale * facing.powf(self.power)
    }

    /// Blend weight and alpha at a surface point, in `[0, 1]`.
    pub fn opacity(&self, incident: Vec3, normal: Vec3) -> f32 {
        self.reflection_factor(incident, normal).clamp(0.0, 1.0)
    }

    /// Opacity where the normal leans `angle` radians away from the direction
    /// back toward the eye. Zero is a surface seen head-on, π/2 the limb.
    pub fn opacity_at_angle(&self, angle: f32) -> f32 {
        let normal = Vec3::Z;
        let to_eye = Vec3::new(angle.sin(), 0.0, angle.cos());
        self.opacity(-to_eye, normal)
    }

    /// Final color and alpha at a surface point.
    pub fn shade(&self, incident: Vec3, normal: Vec3) -> [f32; 4] {
        let f = self.opacity(incident, normal);
        let facing = Vec3::from_array(self.facing_color);
        let rim = Vec3::from_array(self.rim_color);
        facing.lerp(rim, f).extend(f).to_array()
    }
}
