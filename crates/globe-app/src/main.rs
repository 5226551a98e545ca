//! Opens a window with a rotating textured Earth in front of a starfield.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p globe-app -- --width 1920 --height 1080 --stars 5000`.

use std::process::ExitCode;

use clap::Parser;
use globe_app::{PlatformDirs, run_with_config};
use globe_config::{CliArgs, Config};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::prepare(args.config.clone()) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };

    let loaded = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let config = loaded.with_cli_overrides(&args).unwrap_or_else(|e| {
        eprintln!("Ignoring command-line overrides: {e}");
        loaded.clone()
    });

    let log_file =
        globe_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_dir = %dirs.config_dir.display(),
        "Starting globe viewer"
    );
    if let Some(path) = log_file {
        info!("JSON log at {}", path.display());
    }

    match run_with_config(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
