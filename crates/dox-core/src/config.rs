//! Configuration shared by the terminal front-ends.
//!
//! Mirrors `~/.config/dox/config.toml`. Every field has a default so a
//! missing or partial file still yields a usable configuration.

use crate::markup::MarkupOptions;
use crate::theme::ThemeId;
use serde::{Deserialize, Serialize};

/// Default assistant endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/langchain";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoxConfig {
    pub assistant: AssistantSettings,
    pub terminal: TerminalConfig,
}

/// How to reach the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Use the streaming variant of the service.
    pub stream: bool,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            stream: false,
        }
    }
}

/// Behaviour of the terminal engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    #[serde(flatten)]
    pub markup: MarkupOptions,
    /// Append a notice to the transcript when a request is cancelled.
    pub cancel_notice: bool,
    /// Palette used when none has been saved.
    pub default_theme: ThemeId,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            markup: MarkupOptions::default(),
            cancel_notice: true,
            default_theme: ThemeId::Green,
        }
    }
}
