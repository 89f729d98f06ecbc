//! Directory resolution for the config and log files.

use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while resolving or creating directories.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// OS-specific directory paths for the lotus pond.
///
/// Follows OS conventions (XDG on Linux, Known Folders on Windows, Library
/// on macOS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// `config.ron` lives here.
    pub config_dir: PathBuf,
    /// `lotus.log` lives here.
    pub log_dir: PathBuf,
}

pub const APP_NAME: &str = "lotus-pond";

impl PlatformDirs {
    /// Resolve platform-specific directories without creating them on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let app_config = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);
        Ok(Self::under(&app_config))
    }

    /// `config/` and `logs/` below `app_dir`.
    fn under(app_dir: &Path) -> Self {
        Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Replace the config directory, keeping logs next to it.
    pub fn with_config_dir(mut self, config_dir: PathBuf) -> Self {
        self.log_dir = config_dir.join("logs");
        self.config_dir = config_dir;
        self
    }

    /// Create all directories on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] if any directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_dirs_resolve() {
        // Headless CI images may lack a home directory; nothing to check then.
        let Ok(dirs) = PlatformDirs::resolve() else {
            return;
        };
        assert!(dirs.config_dir.is_absolute());
        assert!(dirs.config_dir.ends_with(Path::new(APP_NAME).join("config")));
        assert!(dirs.log_dir.ends_with(Path::new(APP_NAME).join("logs")));
    }

    #[test]
    fn test_with_config_dir_moves_logs() {
        let dirs = PlatformDirs::under(Path::new("/tmp/a"))
            .with_config_dir(PathBuf::from("/tmp/custom"));
        assert_eq!(dirs.config_dir, PathBuf::from("/tmp/custom"));
        assert_eq!(dirs.log_dir, PathBuf::from("/tmp/custom/logs"));
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::under(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
        // Second call is a no-op.
        dirs.create_dirs().unwrap();
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            PlatformError::NoConfigDir.to_string(),
            "could not determine OS configuration directory"
        );
        let io = PlatformError::from(io::Error::other("disk full"));
        assert!(io.to_string().contains("disk full"));
    }
}
