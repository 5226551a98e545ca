//! Scene assembly: the tilted globe group, the starfield and the sun.
//!
//! The globe group owns four layers that share one [`Geometry`]. The group
//! carries the axial tilt; each layer carries its own scale and spin. A
//! layer's world matrix is `tilt * spin_y * scale`.

use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};
use globe_config::Config;
use globe_space::{StarPoint, StarfieldGenerator};

use crate::fresnel::FresnelParams;
use crate::geometry::Geometry;
use crate::light::DirectionalLight;
use crate::material::{Blending, Material, TextureSlot};
use crate::spin::Spin;

/// Number of layers in the globe group.
pub const LAYER_COUNT: usize = 4;

/// Which shell of the globe a layer is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Surface,
    NightLights,
    Clouds,
    Glow,
}

impl LayerKind {
    pub const ALL: [LayerKind; LAYER_COUNT] = [
        LayerKind::Surface,
        LayerKind::NightLights,
        LayerKind::Clouds,
        LayerKind::Glow,
    ];

    /// Position in the group's layer array.
    pub fn index(self) -> usize {
        match self {
            LayerKind::Surface => 0,
            LayerKind::NightLights => 1,
            LayerKind::Clouds => 2,
            LayerKind::Glow => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LayerKind::Surface => "surface",
            LayerKind::NightLights => "night-lights",
            LayerKind::Clouds => "clouds",
            LayerKind::Glow => "glow",
        }
    }
}

/// One mesh of the globe group.
#[derive(Clone, Debug)]
pub struct Layer {
    pub kind: LayerKind,
    pub geometry: Arc<Geometry>,
    pub material: Material,
    pub scale: f32,
    pub spin: Spin,
}

impl Layer {
    /// Transform relative to the globe group.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.spin.angle()) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// The tilted parent of the four globe layers.
#[derive(Clone, Debug)]
pub struct GlobeGroup {
    tilt: Quat,
    tilt_radians: f32,
    geometry: Arc<Geometry>,
    layers: [Layer; LAYER_COUNT],
}

impl GlobeGroup {
    /// Build the group from configuration. The tilt is fixed here and never
    /// changes afterwards.
    pub fn from_config(config: &Config) -> Self {
        let globe = &config.globe;
        let textures = &config.textures;
        let geometry = Arc::new(Geometry::icosahedron(1.0, globe.detail));
        let tilt_radians = globe.tilt_degrees.to_radians();

        let layer = |kind, material, scale, per_frame| Layer {
            kind,
            geometry: Arc::clone(&geometry),
            material,
            scale,
            spin: Spin::new(per_frame),
        };

        let layers = [
            layer(
                LayerKind::Surface,
                Material::standard(TextureSlot::color(textures.day_map.clone())),
                1.0,
                globe.spin_per_frame,
            ),
            layer(
                LayerKind::NightLights,
                Material::basic(TextureSlot::color(textures.night_lights.clone()))
                    .with_opacity(globe.lights_opacity)
                    .with_blending(Blending::Additive),
                1.0,
                globe.spin_per_frame,
            ),
            layer(
                LayerKind::Clouds,
                Material::standard(TextureSlot::color(textures.cloud_map.clone()))
                    .with_alpha_map(TextureSlot::data(textures.cloud_alpha.clone()))
                    .with_opacity(globe.cloud_opacity)
                    .with_blending(Blending::Additive)
                    .transparent(true),
                globe.cloud_scale,
                globe.cloud_spin_per_frame,
            ),
            layer(
                LayerKind::Glow,
                Material::fresnel(FresnelParams::from_config(&config.fresnel)),
                globe.glow_scale,
                globe.spin_per_frame,
            ),
        ];

        Self {
            tilt: Quat::from_euler(EulerRot::XYZ, 0.0, 0.0, tilt_radians),
            tilt_radians,
            geometry,
            layers,
        }
    }

    /// Advance every layer's spin by one frame.
    pub fn advance_frame(&mut self) {
        for layer in &mut self.layers {
            layer.spin.advance();
        }
    }

    /// Group transform: the axial tilt about Z.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_quat(self.tilt)
    }

    pub fn tilt_radians(&self) -> f32 {
        self.tilt_radians
    }

    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    pub fn layers(&self) -> &[Layer; LAYER_COUNT] {
        &self.layers
    }

    pub fn layer(&self, kind: LayerKind) -> &Layer {
        &self.layers[kind.index()]
    }

    /// Model matrix of a layer in world space.
    pub fn world_matrix(&self, kind: LayerKind) -> Mat4 {
        self.matrix() * self.layer(kind).local_matrix()
    }
}

/// The immutable point cloud behind the globe.
#[derive(Clone, Debug)]
pub struct StarField {
    pub points: Vec<StarPoint>,
    pub material: Material,
}

impl StarField {
    pub fn from_config(config: &Config) -> Self {
        let starfield = &config.starfield;
        let points = StarfieldGenerator::from_config(starfield).generate(starfield.seed);
        tracing::debug!(
            stars = points.len(),
            seeded = starfield.seed.is_some(),
            "generated starfield"
        );
        Self {
            points,
            material: Material::points(
                starfield.point_size,
                TextureSlot::color(config.textures.star_sprite.clone()),
            ),
        }
    }
}

/// Everything that gets drawn, plus the light it is drawn under.
#[derive(Clone, Debug)]
pub struct Scene {
    pub globe: GlobeGroup,
    pub stars: StarField,
    pub sun: DirectionalLight,
}

impl Scene {
    /// Build the whole scene once at startup.
    pub fn compose(config: &Config) -> Self {
        let globe = GlobeGroup::from_config(config);
        tracing::info!(
            detail = globe.geometry().detail(),
            triangles = globe.geometry().triangle_count(),
            tilt_degrees = config.globe.tilt_degrees,
            "composed globe"
        );
        Self {
            globe,
            stars: StarField::from_config(config),
            sun: DirectionalLight::from_config(&config.sun),
        }
    }

    /// Per-frame update: spin the globe layers.
    pub fn advance_frame(&mut self) {
        self.globe.advance_frame();
    }
}
