//! Surface appearance of each scene object.

use std::path::PathBuf;

use globe_render::{BlendMode, ColorSpace};

use crate::fresnel::FresnelParams;

/// How fragments combine with the color target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blending {
    Normal,
    Additive,
}

/// An image bound to a material slot.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureSlot {
    pub path: PathBuf,
    pub color_space: ColorSpace,
}

impl TextureSlot {
    /// A color image, decoded from sRGB when sampled.
    pub fn color(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            color_space: ColorSpace::Srgb,
        }
    }

    /// A data image such as an alpha mask, sampled as stored.
    pub fn data(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            color_space: ColorSpace::Linear,
        }
    }
}

/// Shading model of a material.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialKind {
    /// Lit by the sun with Lambert diffuse.
    Standard,
    /// Unlit; the map is shown as is.
    Basic,
    /// View-angle rim glow.
    Fresnel(FresnelParams),
    /// Round sprites with per-point colors.
    Points { size: f32, size_attenuation: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub map: Option<TextureSlot>,
    /// Opacity mask read from the green channel.
    pub alpha_map: Option<TextureSlot>,
    pub opacity: f32,
    /// Transparent materials draw after every opaque object.
    pub transparent: bool,
    pub blending: Blending,
}

impl Material {
    fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            map: None,
            alpha_map: None,
            opacity: 1.0,
            transparent: false,
            blending: Blending::Normal,
        }
    }

    pub fn standard(map: TextureSlot) -> Self {
        Self {
            map: Some(map),
            ..Self::new(MaterialKind::Standard)
        }
    }

    pub fn basic(map: TextureSlot) -> Self {
        Self {
            map: Some(map),
            ..Self::new(MaterialKind::Basic)
        }
    }

    /// Fresnel glow, always transparent and additive.
    pub fn fresnel(params: FresnelParams) -> Self {
        Self {
            transparent: true,
            blending: Blending::Additive,
            ..Self::new(MaterialKind::Fresnel(params))
        }
    }

    pub fn points(size: f32, sprite: TextureSlot) -> Self {
        Self {
            map: Some(sprite),
            ..Self::new(MaterialKind::Points {
                size,
                size_attenuation: true,
            })
        }
    }

    pub fn with_alpha_map(mut self, alpha_map: TextureSlot) -> Self {
        self.alpha_map = Some(alpha_map);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_blending(mut self, blending: Blending) -> Self {
        self.blending = blending;
        self
    }

    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// GPU blend mode. Additive applies even to opaque-pass materials; normal
    /// blending only blends when the material is transparent.
    pub fn blend_mode(&self) -> BlendMode {
        match (self.blending, self.transparent) {
            (Blending::Additive, _) => BlendMode::Additive,
            (Blending::Normal, true) => BlendMode::Alpha,
            (Blending::Normal, false) => BlendMode::Opaque,
        }
    }

    /// Vertex and fragment entry points in the globe shader.
    pub fn shader_entry_points(&self) -> (&'static str, &'static str) {
        match (&self.kind, &self.alpha_map) {
            (MaterialKind::Standard, Some(_)) => ("vs_main", "fs_masked"),
            (MaterialKind::Standard, None) => ("vs_main", "fs_standard"),
            (MaterialKind::Basic, _) => ("vs_main", "fs_basic"),
            (MaterialKind::Fresnel(_), _) => ("vs_fresnel", "fs_fresnel"),
            (MaterialKind::Points { .. }, _) => ("vs_star", "fs_star"),
        }
    }

    pub fn fresnel_params(&self) -> Option<&FresnelParams> {
        match &self.kind {
            MaterialKind::Fresnel(params) => Some(params),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_modes() {
        let day = Material::standard(TextureSlot::color("day.jpg"));
        assert_eq!(day.blend_mode(), BlendMode::Opaque);

        let lights = Material::basic(TextureSlot::color("night.jpg"))
            .with_opacity(0.8)
            .with_blending(Blending::Additive);
        assert!(!lights.transparent);
        assert_eq!(lights.blend_mode(), BlendMode::Additive);

        let faded = Material::basic(TextureSlot::color("x.png")).transparent(true);
        assert_eq!(faded.blend_mode(), BlendMode::Alpha);

        assert_eq!(
            Material::fresnel(FresnelParams::default()).blend_mode(),
            BlendMode::Additive
        );
    }

    #[test]
    fn test_entry_points_by_kind() {
        let clouds = Material::standard(TextureSlot::color("clouds.jpg"))
            .with_alpha_map(TextureSlot::data("clouds_alpha.jpg"));
        assert_eq!(clouds.shader_entry_points(), ("vs_main", "fs_masked"));
        assert_eq!(
            Material::standard(TextureSlot::color("day.jpg")).shader_entry_points(),
            ("vs_main", "fs_standard")
        );
        assert_eq!(
            Material::fresnel(FresnelParams::default()).shader_entry_points(),
            ("vs_fresnel", "fs_fresnel")
        );
    }

    #[test]
    fn test_texture_slot_color_spaces() {
        assert_eq!(TextureSlot::color("a.jpg").color_space, ColorSpace::Srgb);
        assert_eq!(TextureSlot::data("a.jpg").color_space, ColorSpace::Linear);
    }

    #[test]
    fn test_fresnel_params_only_on_fresnel() {
        let glow = Material::fresnel(FresnelParams::default());
        assert!(glow.fresnel_params().is_some());
        assert!(glow.map.is_none());
        assert!(
            Material::basic(TextureSlot::color("a.jpg"))
                .fresnel_params()
                .is_none()
        );
    }
}
