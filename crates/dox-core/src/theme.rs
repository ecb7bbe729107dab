//! Colour palettes and the theme store.
//!
//! Each terminal owns one [`ThemeStore`]. The store is the only place the
//! active palette id changes, and every change is handed to the injected
//! [`ThemeRepository`] for persistence.

use crate::error::{DoxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Identifier of a built-in colour palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    /// Classic terminal theme with vibrant green text.
    #[default]
    Green,
    /// Modern theme with calming blue accents.
    Blue,
    /// Retro-inspired theme with warm amber glow.
    Amber,
}

impl ThemeId {
    /// All palette ids in display order.
    pub const ALL: [ThemeId; 3] = [ThemeId::Green, ThemeId::Blue, ThemeId::Amber];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Green => "green",
            ThemeId::Blue => "blue",
            ThemeId::Amber => "amber",
        }
    }

    /// Short human description used by the `theme` listing.
    pub fn description(&self) -> &'static str {
        match self {
            ThemeId::Green => "Classic terminal theme with vibrant green text",
            ThemeId::Blue => "Modern theme with calming blue accents",
            ThemeId::Amber => "Retro-inspired theme with warm amber glow",
        }
    }

    /// Comma separated list of every id ("green, blue, amber").
    pub fn known_ids() -> String {
        Self::ALL
            .iter()
            .map(ThemeId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn palette(&self) -> ThemePalette {
        match self {
            ThemeId::Green => ThemePalette {
                text: Rgba::rgb(74, 222, 128),
                bg: Rgba::rgb(17, 24, 39),
                prompt: Rgba::rgb(74, 222, 128),
                response: Rgba::rgb(74, 222, 128),
                highlight: Rgba::new(22, 101, 52, 0.3),
                link: Rgba::rgb(134, 239, 172),
                scrollbar_thumb: Rgba::new(74, 222, 128, 0.5),
                command_bg: Rgba::new(22, 101, 52, 0.15),
            },
            ThemeId::Blue => ThemePalette {
                text: Rgba::rgb(96, 165, 250),
                bg: Rgba::rgb(17, 24, 39),
                prompt: Rgba::rgb(96, 165, 250),
                response: Rgba::rgb(147, 197, 253),
                highlight: Rgba::new(30, 58, 138, 0.3),
                link: Rgba::rgb(147, 197, 253),
                scrollbar_thumb: Rgba::new(96, 165, 250, 0.5),
                command_bg: Rgba::new(30, 58, 138, 0.15),
            },
            ThemeId::Amber => ThemePalette {
                text: Rgba::rgb(251, 191, 36),
                bg: Rgba::rgb(17, 24, 39),
                prompt: Rgba::rgb(251, 191, 36),
                response: Rgba::rgb(252, 211, 77),
                highlight: Rgba::new(146, 64, 14, 0.3),
                link: Rgba::rgb(252, 211, 77),
                scrollbar_thumb: Rgba::new(251, 191, 36, 0.5),
                command_bg: Rgba::new(146, 64, 14, 0.15),
            },
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = DoxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "green" => Ok(ThemeId::Green),
            "blue" => Ok(ThemeId::Blue),
            "amber" => Ok(ThemeId::Amber),
            other => Err(DoxError::invalid_argument("theme", other)),
        }
    }
}

/// An RGB colour with an alpha channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

/// Colour role table of one palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub text: Rgba,
    pub bg: Rgba,
    pub prompt: Rgba,
    pub response: Rgba,
    pub highlight: Rgba,
    pub link: Rgba,
    pub scrollbar_thumb: Rgba,
    pub command_bg: Rgba,
}

/// Persistence for the chosen palette id.
///
/// Implementations are synchronous: the store is mutated from the
/// interpreter, which never suspends.
pub trait ThemeRepository: Send + Sync {
    /// Returns the stored palette id, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<ThemeId>>;

    /// Persists the palette id.
    fn save(&self, theme: ThemeId) -> Result<()>;
}

/// Holds the active palette id of one terminal.
#[derive(Clone, Default)]
pub struct ThemeStore {
    active: ThemeId,
    repository: Option<Arc<dyn ThemeRepository>>,
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("active", &self.active)
            .field("persistent", &self.repository.is_some())
            .finish()
    }
}

impl ThemeStore {
    /// Creates an in-memory store starting at `initial`.
    pub fn new(initial: ThemeId) -> Self {
        Self {
            active: initial,
            repository: None,
        }
    }

    /// Creates a store backed by `repository`.
    ///
    /// The stored id wins over `fallback`; a failing load is logged and the
    /// fallback is used.
    pub fn with_repository(fallback: ThemeId, repository: Arc<dyn ThemeRepository>) -> Self {
        let active = match repository.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => fallback,
            Err(e) => {
                tracing::warn!("Failed to load saved theme, using {}: {}", fallback, e);
                fallback
            }
        };

        Self {
            active,
            repository: Some(repository),
        }
    }

    pub fn get(&self) -> ThemeId {
        self.active
    }

    pub fn palette(&self) -> ThemePalette {
        self.active.palette()
    }

    /// Sets the active palette and persists it.
    ///
    /// The in-memory value always changes; a persistence failure is logged
    /// and returned so callers may report it.
    pub fn set(&mut self, theme: ThemeId) -> Result<()> {
        self.active = theme;
        tracing::debug!("Theme set to {}", theme);

        if let Some(repository) = &self.repository {
            if let Err(e) = repository.save(theme) {
                tracing::warn!("Failed to persist theme {}: {}", theme, e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Sets the active palette for this store only, leaving the saved id alone.
    pub fn override_with(&mut self, theme: ThemeId) {
        tracing::debug!("Theme overridden with {}", theme);
        self.active = theme;
    }
}
