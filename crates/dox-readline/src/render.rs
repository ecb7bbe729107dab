//! Terminal rendering of transcript entries.
//!
//! Colours come from the active palette as 24-bit escapes.

use colored::{ColoredString, Colorize};
use dox_core::history::{EntryKind, HistoryEntry};
use dox_core::markup::{Block, Document, Span};
use dox_core::theme::{Rgba, ThemePalette};

/// Deepest indentation level shown; deeper items are drawn at this level.
pub const MAX_INDENT: usize = 3;

/// Code blocks longer than this get line numbers.
const NUMBERED_CODE_LINES: usize = 3;

const INDENT: &str = "  ";
const RULE_WIDTH: usize = 40;

pub struct Renderer {
    palette: ThemePalette,
}

impl Renderer {
    pub fn new(palette: ThemePalette) -> Self {
        Self { palette }
    }

    /// Renders one entry; `document` is the parsed content of a response.
    pub fn entry(&self, entry: &HistoryEntry, document: &Document) -> String {
        match entry.kind {
            EntryKind::Command => paint(&format!("> {}", entry.content), self.palette.prompt)
                .bold()
                .to_string(),
            EntryKind::Error => entry
                .content
                .lines()
                .map(|line| line.red().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            EntryKind::Response => self.blocks(&document.blocks),
        }
    }

    pub fn blocks(&self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|block| self.block(block))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn block(&self, block: &Block) -> String {
        match block {
            Block::Heading { level, spans } => {
                let text = paint(&plain(spans), self.palette.highlight).bold();
                match level {
                    1 => text.underline().to_string(),
                    2 => text.to_string(),
                    _ => text.dimmed().to_string(),
                }
            }
            Block::Rule => paint(&"─".repeat(RULE_WIDTH), self.palette.highlight).to_string(),
            Block::ListItem {
                indent,
                marker,
                spans,
            } => format!(
                "{}{} {}",
                indentation(*indent),
                paint(marker.display(), self.palette.highlight),
                self.spans(spans)
            ),
            Block::Quote { indent, spans } => format!(
                "{}{} {}",
                indentation(*indent),
                paint("│", self.palette.highlight),
                self.spans(spans).as_str().italic()
            ),
            Block::CodeBlock { language, code } => self.code_block(language, code),
            Block::Blank => String::new(),
            Block::Paragraph { spans } => self.spans(spans),
        }
    }

    fn code_block(&self, language: &str, code: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();
        let numbered = lines.len() > NUMBERED_CODE_LINES;
        let width = lines.len().to_string().len();

        let mut out = vec![paint(&format!("[{language}]"), self.palette.highlight)
            .bold()
            .to_string()];
        for (index, line) in lines.iter().enumerate() {
            let gutter = if numbered {
                format!("{:>width$} ", index + 1).as_str().dimmed().to_string()
            } else {
                String::new()
            };
            out.push(format!("{INDENT}{gutter}{}", paint(line, self.palette.text)));
        }
        out.join("\n")
    }

    fn spans(&self, spans: &[Span]) -> String {
        spans.iter().map(|span| self.span(span)).collect()
    }

    fn span(&self, span: &Span) -> String {
        match span {
            Span::Text { value } => paint(value, self.palette.response).to_string(),
            Span::Bold { value } => paint(value, self.palette.response).bold().to_string(),
            Span::Italic { value } => paint(value, self.palette.response).italic().to_string(),
            Span::InlineCode { value } => paint(value, self.palette.highlight).to_string(),
            Span::Strikethrough { value } => paint(value, self.palette.response)
                .strikethrough()
                .to_string(),
            Span::Link { label, url } if label == url => {
                paint(url, self.palette.link).underline().to_string()
            }
            Span::Link { label, url } => format!(
                "{} ({})",
                paint(label, self.palette.link).underline(),
                paint(url, self.palette.link)
            ),
        }
    }
}

fn paint(text: &str, color: Rgba) -> ColoredString {
    text.truecolor(color.r, color.g, color.b)
}

fn indentation(level: usize) -> String {
    INDENT.repeat(level.min(MAX_INDENT))
}

fn plain(spans: &[Span]) -> String {
    spans.iter().map(Span::literal).collect()
}
