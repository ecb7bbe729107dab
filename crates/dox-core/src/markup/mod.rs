//! Lightweight markup for assistant responses.
//!
//! Supports a fixed subset: headings, horizontal rules, bullet and numbered
//! lists with indentation, blockquotes, fenced code blocks with a language
//! tag, and inline bold, italic, code, strikethrough, links and bare URLs.
//!
//! # Module Structure
//!
//! - `block`: line classification and the [`Block`] tree
//! - `inline`: the inline [`Span`] formatter
//! - `fence`: splitting text on fenced code delimiters
//! - `language`: fence tag normalization

mod block;
mod fence;
mod inline;
mod language;

pub use block::{BULLET_GLYPH, Block, Document, ListMarker, MarkupParser, ParseAnomaly, parse};
pub use inline::{Span, format_inline};
pub use language::{DEFAULT_LANGUAGE, normalize_language};

use serde::{Deserialize, Serialize};

/// Default fenced-code delimiter.
pub const DEFAULT_FENCE: &str = "```";

/// Default number of columns a tab counts for when measuring indentation.
pub const DEFAULT_TAB_WIDTH: usize = 2;

/// Tunables of the markup parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupOptions {
    /// Opening and closing code fence marker.
    pub fence: String,
    /// Language assigned to fences without a tag.
    pub default_language: String,
    /// Columns a tab character counts for (two columns make one indent level).
    pub tab_width: usize,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            fence: DEFAULT_FENCE.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}
