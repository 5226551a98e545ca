//! The globe scene: icosahedral geometry, layered materials, the Fresnel glow,
//! the sun, per-frame spin and the GPU renderer that draws them.

pub mod fresnel;
pub mod geometry;
pub mod graph;
pub mod light;
pub mod material;
pub mod renderer;
pub mod spin;

pub use fresnel::FresnelParams;
pub use geometry::Geometry;
pub use graph::{GlobeGroup, LAYER_COUNT, Layer, LayerKind, Scene, StarField};
pub use light::DirectionalLight;
pub use material::{Blending, Material, MaterialKind, TextureSlot};
pub use renderer::{GLOBE_SHADER_NAME, GLOBE_SHADER_SOURCE, GlobeRenderer, LayerUniform};
pub use spin::{Spin, wrap_angle};
