//! `state.toml`, the small file dox writes between runs.

use dox_core::error::{DoxError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Contents of `state.toml`.
///
/// Keys dox does not know are carried through a rewrite untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(flatten)]
    pub other: toml::Table,
}

/// Reads and replaces `state.toml`.
///
/// A write goes to `.state.toml.tmp` next to the target, is synced, then
/// renamed over it, so a reader sees either the old or the new state.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing and blank files read as the empty state.
    pub fn read(&self) -> Result<SavedState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SavedState::default()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(SavedState::default());
        }
        Ok(toml::from_str(&content)?)
    }

    pub fn write(&self, state: &SavedState) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| DoxError::io(format!("{} has no parent directory", self.path.display())))?;
        fs::create_dir_all(parent)?;

        let tmp_path = self.tmp_path();
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(toml::to_string(state)?.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        tracing::debug!("Wrote {}", self.path.display());
        Ok(())
    }

    /// Reads the state, lets `change` edit it, and writes it back.
    pub fn modify(&self, change: impl FnOnce(&mut SavedState)) -> Result<()> {
        let mut state = self.read()?;
        change(&mut state);
        self.write(&state)
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state.toml".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_and_blank_files_read_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        let file = StateFile::new(path.clone());
        assert_eq!(file.read().unwrap(), SavedState::default());

        fs::write(&path, "  \n").unwrap();
        assert_eq!(file.read().unwrap(), SavedState::default());
    }

    #[test]
    fn test_write_creates_directory_and_leaves_no_tmp() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("dox");
        let file = StateFile::new(dir.join("state.toml"));

        file.modify(|state| state.theme = Some("amber".to_string())).unwrap();

        assert_eq!(file.read().unwrap().theme.as_deref(), Some("amber"));
        assert!(!dir.join(".state.toml.tmp").exists());
    }

    #[test]
    fn test_unknown_keys_survive_a_theme_change() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        fs::write(&path, "theme = \"green\"\nlast_session = \"abc\"\n").unwrap();
        let file = StateFile::new(path.clone());

        file.modify(|state| state.theme = Some("blue".to_string())).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"theme = "blue""#));
        assert!(written.contains(r#"last_session = "abc""#));
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        fs::write(&path, "theme = [").unwrap();

        let err = StateFile::new(path).read().unwrap_err();

        assert!(matches!(err, DoxError::Serialization { .. }));
    }
}
