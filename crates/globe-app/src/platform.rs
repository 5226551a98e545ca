//! Platform directory resolution.
//!
//! The configuration file and, in debug builds, the JSON log live under the
//! OS configuration directory (XDG on Linux, Known Folders on Windows,
//! Library on macOS).

use std::path::{Path, PathBuf};

/// Errors that can occur while preparing platform directories.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    /// Directory creation failed.
    #[error("platform I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const APP_NAME: &str = "globe";

/// OS-specific directories used by the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Holds the JSON log in debug builds.
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve the default directories without touching the disk.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::resolve_with_root(&config_base))
    }

    /// Directories rooted at `root/globe`.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            log_dir: app_dir.join("logs"),
            config_dir: app_dir,
        }
    }

    /// Use `config_dir` as given (from `--config`), with logs beneath it.
    pub fn from_config_dir(config_dir: PathBuf) -> Self {
        Self {
            log_dir: config_dir.join("logs"),
            config_dir,
        }
    }

    /// Create every directory on disk.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }

    /// Resolve from an optional override and create the directories.
    pub fn prepare(config_override: Option<PathBuf>) -> Result<Self, PlatformError> {
        let dirs = match config_override {
            Some(dir) => Self::from_config_dir(dir),
            None => Self::resolve()?,
        };
        dirs.create_dirs()?;
        Ok(dirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root_layout() {
        let dirs = PlatformDirs::resolve_with_root(Path::new("/tmp/root"));
        assert_eq!(dirs.config_dir, Path::new("/tmp/root/globe"));
        assert_eq!(dirs.log_dir, Path::new("/tmp/root/globe/logs"));
    }

    #[test]
    fn test_override_keeps_dir_verbatim() {
        let dirs = PlatformDirs::from_config_dir(PathBuf::from("custom"));
        assert_eq!(dirs.config_dir, Path::new("custom"));
        assert_eq!(dirs.log_dir, Path::new("custom/logs"));
    }

    #[test]
    fn test_prepare_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("config");
        let dirs = PlatformDirs::prepare(Some(dir.clone())).unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
        assert_eq!(dirs.config_dir, dir);
    }

    #[test]
    fn test_create_dirs_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        dirs.create_dirs().unwrap();
        assert!(dirs.log_dir.is_dir());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            PlatformError::NoConfigDir.to_string(),
            "could not determine OS configuration directory"
        );
    }
}
