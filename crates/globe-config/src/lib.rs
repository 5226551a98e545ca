//! Configuration system for the globe viewer.
//!
//! Settings persist to disk as RON files and can be overridden from the
//! command line. Every section falls back to its defaults when missing, so
//! old config files keep loading after new settings are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, FresnelConfig, GlobeConfig, MAX_DETAIL, RenderConfig,
    StarfieldConfig, SunConfig, TextureConfig, WindowConfig,
};
pub use error::ConfigError;
