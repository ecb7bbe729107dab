//! Path management for dox configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/dox/
//! ├── config.toml    # User configuration
//! └── state.toml     # Saved terminal state (active theme)
//! ```

use dox_core::error::{DoxError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "dox";

pub struct DoxPaths;

impl DoxPaths {
    /// Returns the dox configuration directory (e.g. `~/.config/dox/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| DoxError::config("Cannot find configuration directory"))
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to `state.toml`.
    pub fn state_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("state.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_in_config_dir() {
        // Headless CI machines may have no config dir at all.
        let Ok(dir) = DoxPaths::config_dir() else {
            return;
        };
        assert!(dir.ends_with("dox"));
        assert_eq!(DoxPaths::config_file().unwrap(), dir.join("config.toml"));
        assert_eq!(DoxPaths::state_file().unwrap(), dir.join("state.toml"));
    }
}
