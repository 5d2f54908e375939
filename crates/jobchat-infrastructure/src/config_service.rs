//! Configuration service implementation.
//!
//! Loads the widget configuration from `~/.config/jobchat/config.toml` (or an
//! explicit path) and applies environment overrides.

use std::path::{Path, PathBuf};

use jobchat_core::WidgetConfig;
use jobchat_core::error::{ChatError, Result};

use crate::paths::JobchatPaths;

/// Environment variable overriding `api_base_url`.
pub const ENV_API_BASE_URL: &str = "JOBCHAT_API_BASE_URL";
/// Environment variable overriding `storage_dir`.
pub const ENV_STORAGE_DIR: &str = "JOBCHAT_STORAGE_DIR";

/// Loads [`WidgetConfig`] from TOML.
#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    /// Explicit config file; the platform default is used when unset.
    path: Option<PathBuf>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service reading from a specific file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loads, overrides from the process environment, and validates.
    ///
    /// A missing file yields the default configuration.
    pub fn load(&self) -> Result<WidgetConfig> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Same as [`ConfigService::load`] with an explicit environment lookup.
    pub fn load_with_env<F>(&self, env: F) -> Result<WidgetConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => JobchatPaths::config_file()?,
        };

        let mut config = Self::read_file(&path)?;
        apply_env_overrides(&mut config, env);
        config.validate()?;

        tracing::debug!(path = %path.display(), api_base_url = %config.api_base_url, "Loaded widget config");
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<WidgetConfig> {
        if !path.exists() {
            return Ok(WidgetConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ChatError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        if content.trim().is_empty() {
            return Ok(WidgetConfig::default());
        }

        toml::from_str(&content)
            .map_err(|e| ChatError::config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

fn apply_env_overrides<F>(config: &mut WidgetConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url;
    }
    if let Some(dir) = env(ENV_STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
        config.storage_dir = Some(PathBuf::from(dir));
    }
}
