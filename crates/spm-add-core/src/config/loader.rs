//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use super::SpmAddConfig;
use crate::error::SpmAddError;
use crate::result::{Result, ResultExt};

/// Config file names, in priority order
pub const CONFIG_FILE_NAMES: [&str; 2] = [".spm-add.toml", "spm-add.toml"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by walking upward from `start_path`
    ///
    /// Stops at the first directory holding one of [`CONFIG_FILE_NAMES`], or
    /// at the filesystem root.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| SpmAddError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    pub fn load_from_file(path: &Path) -> Result<SpmAddConfig> {
        let content = fs::read_to_string(path).map_err(|e| SpmAddError::io_error(path, e))?;
        let config: SpmAddConfig = toml::from_str(&content).map_err(|e| {
            SpmAddError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `custom_path`, or discover from `start_dir`
    ///
    /// Without an explicit path and with nothing discovered, the default
    /// configuration is used. A failed discovery is logged, not fatal.
    pub fn load(custom_path: Option<&Path>, start_dir: &Path) -> Result<SpmAddConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(SpmAddError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        match Self::auto_discover(start_dir).log_and_continue().flatten() {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(SpmAddConfig::default())
            }
        }
    }
}
