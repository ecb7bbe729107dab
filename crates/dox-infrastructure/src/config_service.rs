//! Loading of `~/.config/dox/config.toml`.

use crate::paths::DoxPaths;
use dox_core::config::DoxConfig;
use dox_core::error::{DoxError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the dox configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Service for the platform default location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(DoxPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration. A missing file yields the defaults.
    pub fn load(&self) -> Result<DoxConfig> {
        if !self.path.exists() {
            tracing::debug!("No config at {}, using defaults", self.path.display());
            return Ok(DoxConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: DoxConfig = toml::from_str(&content).map_err(|e| {
            DoxError::config(format!("{}: {}", self.path.display(), e))
        })?;
        tracing::debug!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    /// Like [`load`](Self::load), but logs failures and falls back to defaults.
    pub fn load_or_default(&self) -> DoxConfig {
        self.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            DoxConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dox_core::theme::ThemeId;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), DoxConfig::default());
    }

    #[test]
    fn test_reads_sections() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[assistant]\nendpoint = \"http://example.test/api\"\n\n[terminal]\ndefault_theme = \"blue\"\ncancel_notice = false\n",
        )
        .unwrap();

        let config = ConfigService::new(path).load().unwrap();

        assert_eq!(config.assistant.endpoint, "http://example.test/api");
        assert_eq!(config.terminal.default_theme, ThemeId::Blue);
        assert!(!config.terminal.cancel_notice);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[assistant\nendpoint = 1").unwrap();
        let service = ConfigService::new(path);

        let err = service.load().unwrap_err();

        assert!(err.is_config());
        assert_eq!(service.load_or_default(), DoxConfig::default());
    }
}
