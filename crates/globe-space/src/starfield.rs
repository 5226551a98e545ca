//! Procedural starfield: points scattered through a spherical shell around
//! the globe, tinted with a shared hue and random lightness.

use glam::Vec3;
use globe_config::StarfieldConfig;
use globe_render::{hsl_to_srgb, srgb_to_linear};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A single star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarPoint {
    /// World-space position inside the star shell.
    pub position: Vec3,
    /// Linear RGB color.
    pub color: [f32; 3],
}

/// Generates a point cloud of stars in the shell `[min_radius, max_radius)`.
#[derive(Clone, Debug, PartialEq)]
pub struct StarfieldGenerator {
    star_count: u32,
    min_radius: f32,
    max_radius: f32,
    hue: f32,
    saturation: f32,
}

impl StarfieldGenerator {
    /// `num_stars` stars in the default 25..50 shell, hue 0.6, saturation 0.2.
    pub fn new(num_stars: u32) -> Self {
        Self::from_config(&StarfieldConfig {
            count: num_stars,
            ..StarfieldConfig::default()
        })
    }

    pub fn from_config(config: &StarfieldConfig) -> Self {
        Self {
            star_count: config.count,
            min_radius: config.min_radius,
            max_radius: config.max_radius,
            hue: config.hue,
            saturation: config.saturation,
        }
    }

    pub fn star_count(&self) -> u32 {
        self.star_count
    }

    /// Radius bounds of the shell, inner inclusive and outer exclusive.
    pub fn shell(&self) -> (f32, f32) {
        (self.min_radius, self.max_radius)
    }

    /// Generate the stars. A seed makes the field reproducible; `None` draws
    /// from the thread RNG and yields a new field each run.
    pub fn generate(&self, seed: Option<u64>) -> Vec<StarPoint> {
        match seed {
            Some(seed) => self.generate_with(&mut ChaCha8Rng::seed_from_u64(seed)),
            None => self.generate_with(&mut rand::rng()),
        }
    }

    /// Generate the stars from the given RNG.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<StarPoint> {
        let span = self.max_radius - self.min_radius;
        (0..self.star_count)
            .map(|_| {
                let radius = self.min_radius + rng.random::<f32>() * span;
                let theta = std::f32::consts::TAU * rng.random::<f32>();
                let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
                let position = Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                );

                let lightness = rng.random::<f32>();
                let color = hsl_to_srgb(self.hue, self.saturation, lightness).map(srgb_to_linear);

                StarPoint { position, color }
            })
            .collect()
    }
}
