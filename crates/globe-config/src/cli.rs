//! Command-line argument parsing for the globe viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, ConfigError};

/// Globe viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "globe", about = "Rotating textured Earth globe")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Number of background stars.
    #[arg(long)]
    pub stars: Option<u32>,

    /// Seed for a reproducible starfield.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Icosahedron subdivision detail for the globe.
    #[arg(long)]
    pub detail: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(count) = args.stars {
            self.starfield.count = count;
        }
        if args.seed.is_some() {
            self.starfield.seed = args.seed;
        }
        if let Some(detail) = args.detail {
            self.globe.detail = detail;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }

    /// Copy of `self` with CLI overrides applied, or the validation error if
    /// the overrides leave it unusable.
    pub fn with_cli_overrides(&self, args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        config.apply_cli_overrides(args);
        config.validate()?;
        Ok(config)
    }
}
