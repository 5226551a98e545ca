//! Space backdrop: the procedural starfield and its point-sprite renderer.

pub mod renderer;
pub mod starfield;

pub use renderer::{
    FALLBACK_SPRITE_SIZE, STAR_SHADER_NAME, STAR_SHADER_SOURCE, StarInstance, StarfieldRenderer,
    circle_sprite,
};
pub use starfield::{StarPoint, StarfieldGenerator};
