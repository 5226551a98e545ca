//! Configuration structs with the viewer's defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
const CONFIG_FILE: &str = "config.ron";

/// Largest accepted `globe.detail`; keeps the unindexed vertex count well inside `u32`.
pub const MAX_DETAIL: u32 = 128;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Camera and orbit-control settings.
    pub camera: CameraConfig,
    /// Globe geometry, tilt, layer and spin settings.
    pub globe: GlobeConfig,
    /// Atmosphere rim-glow settings.
    pub fresnel: FresnelConfig,
    /// Background star cloud settings.
    pub starfield: StarfieldConfig,
    /// Directional sun light.
    pub sun: SunConfig,
    /// Image files bound to the globe layers and star sprites.
    pub textures: TextureConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// MSAA sample count (1 or 4).
    pub msaa_samples: u32,
    /// Linear RGB clear color behind the star field.
    pub clear_color: [f64; 3],
}

/// Perspective camera and orbit-control configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Initial distance from the globe center along +Z.
    pub distance: f32,
    /// Closest the orbit controls may dolly in.
    pub min_distance: f32,
    /// Farthest the orbit controls may dolly out.
    pub max_distance: f32,
    /// Multiplier on drag-to-rotate speed.
    pub rotate_speed: f32,
    /// Multiplier on wheel zoom speed.
    pub zoom_speed: f32,
}

/// Globe layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    /// Icosahedron subdivision detail (each face splits into `(detail + 1)^2` triangles).
    pub detail: u32,
    /// Axial tilt about Z in degrees (negative tilts the north pole right).
    pub tilt_degrees: f32,
    /// Y rotation added to surface, night lights and glow each frame, in radians.
    pub spin_per_frame: f64,
    /// Y rotation added to the cloud layer each frame, in radians.
    pub cloud_spin_per_frame: f64,
    /// Uniform scale of the cloud shell relative to the surface.
    pub cloud_scale: f32,
    /// Uniform scale of the glow shell relative to the surface.
    pub glow_scale: f32,
    /// Opacity of the additive night-lights layer.
    pub lights_opacity: f32,
    /// Opacity of the additive cloud layer.
    pub cloud_opacity: f32,
}

/// Fresnel rim-glow configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FresnelConfig {
    /// Rim color as `0xRRGGBB` (sRGB).
    pub rim_color: u32,
    /// Color facing the viewer as `0xRRGGBB` (sRGB).
    pub facing_color: u32,
    /// Constant added to the reflection factor.
    pub bias: f32,
    /// Multiplier on the angular term.
    pub scale: f32,
    /// Exponent on the angular term.
    pub power: f32,
}

/// Procedural starfield configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of stars to generate.
    pub count: u32,
    /// Inner radius of the star shell.
    pub min_radius: f32,
    /// Outer radius of the star shell (exclusive).
    pub max_radius: f32,
    /// Sprite size in world units (attenuated by distance).
    pub point_size: f32,
    /// HSL hue shared by all stars, in `[0, 1]`.
    pub hue: f32,
    /// HSL saturation shared by all stars, in `[0, 1]`.
    pub saturation: f32,
    /// Fixed RNG seed. `None` draws a fresh field every run.
    pub seed: Option<u64>,
}

/// Directional sun light configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunConfig {
    /// Light position; the light shines from here toward the origin.
    pub position: [f32; 3],
    /// Light color as `0xRRGGBB` (sRGB).
    pub color: u32,
    /// Scalar intensity.
    pub intensity: f32,
}

/// Texture file locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Daytime surface color map.
    pub day_map: PathBuf,
    /// City lights map blended on the night side.
    pub night_lights: PathBuf,
    /// Cloud color map.
    pub cloud_map: PathBuf,
    /// Cloud transparency mask (luminance drives alpha).
    pub cloud_alpha: PathBuf,
    /// Round sprite used for each star.
    pub star_sprite: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log frames-per-second once a second.
    pub show_fps: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Globe".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            msaa_samples: 4,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
            min_distance: 1.2,
            max_distance: 50.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            detail: 12,
            tilt_degrees: -23.4,
            spin_per_frame: 0.002,
            cloud_spin_per_frame: 0.00211,
            cloud_scale: 1.003,
            glow_scale: 1.01,
            lights_opacity: 0.8,
            cloud_opacity: 0.2,
        }
    }
}

impl Default for FresnelConfig {
    fn default() -> Self {
        Self {
            rim_color: 0x0088ff,
            facing_color: 0x000000,
            bias: 0.1,
            scale: 1.0,
            power: 4.0,
        }
    }
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            min_radius: 25.0,
            max_radius: 50.0,
            point_size: 0.2,
            hue: 0.6,
            saturation: 0.2,
            seed: None,
        }
    }
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            position: [-2.0, -0.5, 1.5],
            color: 0xffffff,
            intensity: 1.0,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            day_map: PathBuf::from("textures/8k_earth_daymap.jpg"),
            night_lights: PathBuf::from("textures/03_earthlights1k.jpg"),
            cloud_map: PathBuf::from("textures/04_earthcloudmap.jpg"),
            cloud_alpha: PathBuf::from("textures/05_earthcloudmaptrans.jpg"),
            star_sprite: PathBuf::from("textures/stars/circle.png"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read the file; returns `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values that would produce a degenerate scene or camera.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window",
                reason: format!(
                    "size must be non-zero, got {}x{}",
                    self.window.width, self.window.height
                ),
            });
        }
        if !matches!(self.render.msaa_samples, 1 | 4) {
            return Err(ConfigError::InvalidValue {
                field: "render.msaa_samples",
                reason: format!("must be 1 or 4, got {}", self.render.msaa_samples),
            });
        }
        if self.globe.detail > MAX_DETAIL {
            return Err(ConfigError::InvalidValue {
                field: "globe.detail",
                reason: format!("must be at most {MAX_DETAIL}, got {}", self.globe.detail),
            });
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(ConfigError::InvalidValue {
                field: "camera.far",
                reason: format!(
                    "need 0 < near < far, got near={} far={}",
                    self.camera.near, self.camera.far
                ),
            });
        }
        if self.camera.min_distance > self.camera.max_distance {
            return Err(ConfigError::InvalidValue {
                field: "camera.min_distance",
                reason: "must not exceed camera.max_distance".to_string(),
            });
        }
        let stars = &self.starfield;
        if !(stars.min_radius >= 0.0 && stars.max_radius > stars.min_radius) {
            return Err(ConfigError::InvalidValue {
                field: "starfield.max_radius",
                reason: format!(
                    "need 0 <= min_radius < max_radius, got {}..{}",
                    stars.min_radius, stars.max_radius
                ),
            });
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("detail: 12"));
        assert!(ron_str.contains("count: 1000"));
    }

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = Config::default();
        assert_eq!(config.camera.fov_y_degrees, 50.0);
        assert_eq!(config.camera.distance, 5.0);
        assert_eq!(config.globe.tilt_degrees, -23.4);
        assert_eq!(config.globe.spin_per_frame, 0.002);
        assert_eq!(config.globe.cloud_spin_per_frame, 0.00211);
        assert_eq!(config.fresnel.rim_color, 0x0088ff);
        assert_eq!(config.sun.position, [-2.0, -0.5, 1.5]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.starfield.seed = Some(7);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), camera: (), globe: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.starfield, StarfieldConfig::default());
        assert_eq!(config.fresnel, FresnelConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_fields() {
        let ron_str = "(globe: (detail: 4))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.globe.detail, 4);
        assert_eq!(config.globe.cloud_scale, 1.003);
    }

    #[test]
    fn test_hex_color_literal_parses() {
        let ron_str = "(fresnel: (rim_color: 0xff0000))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.fresnel.rim_color, 0xff0000);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.window.height = 1080;
        config.starfield.count = 250;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.globe.detail = 6;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.globe.detail), Some(6));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_inverted_star_shell_rejected() {
        let mut config = Config::default();
        config.starfield.min_radius = 60.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "starfield.max_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_unsupported_msaa_rejected() {
        let mut config = Config::default();
        config.render.msaa_samples = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_detail_upper_bound() {
        let mut config = Config::default();
        config.globe.detail = MAX_DETAIL;
        assert!(config.validate().is_ok());
        config.globe.detail = MAX_DETAIL + 1;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "globe.detail"),
            other => panic!("expected globe.detail rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// globe viewer\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
