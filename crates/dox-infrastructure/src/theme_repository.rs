//! TOML-backed storage of the active palette.

use crate::paths::DoxPaths;
use crate::state_file::StateFile;
use dox_core::error::Result;
use dox_core::theme::{ThemeId, ThemeRepository};
use std::path::PathBuf;

/// Saves the theme id as `theme = "<id>"` in the state file.
pub struct TomlThemeRepository {
    file: StateFile,
}

impl TomlThemeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: StateFile::new(path),
        }
    }

    /// Repository at the platform default location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(DoxPaths::state_file()?))
    }
}

impl ThemeRepository for TomlThemeRepository {
    fn load(&self) -> Result<Option<ThemeId>> {
        let Some(saved) = self.file.read()?.theme else {
            return Ok(None);
        };

        match saved.parse::<ThemeId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                tracing::warn!(
                    "Ignoring unknown saved theme '{}' in {}",
                    saved,
                    self.file.path().display()
                );
                Ok(None)
            }
        }
    }

    fn save(&self, theme: ThemeId) -> Result<()> {
        self.file
            .modify(|state| state.theme = Some(theme.as_str().to_string()))
    }
}
