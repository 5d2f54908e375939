//! Path management for jobchat files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/jobchat/           # Config directory (platform default)
//! ├── config.toml              # Widget configuration
//! └── widget_state.json        # Persisted session id and message log
//! ```

use std::path::PathBuf;

use jobchat_core::WidgetConfig;

use crate::storage::FileKeyValueStore;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for jobchat_core::ChatError {
    fn from(e: PathError) -> Self {
        jobchat_core::ChatError::config(e.to_string())
    }
}

pub struct JobchatPaths;

impl JobchatPaths {
    const APP_DIR: &'static str = "jobchat";
    const CONFIG_FILENAME: &'static str = "config.toml";

    /// Returns the jobchat configuration directory (e.g. `~/.config/jobchat/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(Self::CONFIG_FILENAME))
    }

    /// Returns the directory holding persisted widget state.
    ///
    /// `storage_dir` from the configuration wins over the platform default.
    pub fn storage_dir(config: &WidgetConfig) -> Result<PathBuf, PathError> {
        match &config.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::config_dir(),
        }
    }

    /// Returns the path of the persisted widget state file.
    pub fn state_file(config: &WidgetConfig) -> Result<PathBuf, PathError> {
        Ok(Self::storage_dir(config)?.join(FileKeyValueStore::STATE_FILENAME))
    }
}
