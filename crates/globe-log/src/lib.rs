//! Tracing setup for the globe viewer.
//!
//! Console output is always on. Debug builds additionally write JSON lines to
//! `globe.log` so a session can be inspected after the window closes. The
//! level comes from `RUST_LOG` when set, otherwise from `debug.log_level` in
//! the loaded config.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use globe_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "globe.log";

/// Directives used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_DIRECTIVES: &str = "info,wgpu=warn,naga=warn";

/// Turn a configured level into a full filter directive string.
///
/// A bare level such as `"debug"` still keeps wgpu and naga at `warn`, since
/// their per-frame chatter drowns everything else. Strings that already
/// mention those targets are passed through untouched.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return DEFAULT_DIRECTIVES.to_string();
    }
    if level.contains("wgpu") || level.contains("naga") {
        return level.to_string();
    }
    format!("{level},wgpu=warn,naga=warn")
}

/// Create `log_dir` if needed and truncate a fresh log file inside it.
pub fn open_log_file(log_dir: &Path) -> io::Result<(File, PathBuf)> {
    std::fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE_NAME);
    let file = File::create(&path)?;
    Ok((file, path))
}

/// Install the global tracing subscriber.
///
/// Returns the path of the JSON log file when one was opened. A log file that
/// cannot be created is not fatal; the viewer keeps console logging only.
///
/// ```no_run
/// use globe_config::Config;
/// use globe_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), cfg!(debug_assertions), Some(&config));
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Option<PathBuf> {
    let directives = filter_directives(config.map_or("", |c| c.debug.log_level.as_str()));
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build && let Some(log_dir) = log_dir {
        match open_log_file(log_dir) {
            Ok((file, path)) => {
                let file_layer = fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(fmt::time::uptime())
                    .json();
                subscriber.with(file_layer).init();
                tracing::info!(path = %path.display(), "JSON log file opened");
                return Some(path);
            }
            Err(e) => {
                subscriber.init();
                tracing::warn!(dir = %log_dir.display(), "Cannot open log file: {e}");
                return None;
            }
        }
    }

    subscriber.init();
    None
}
