//! Block-level parsing of assistant responses.

use super::fence::{Segment, split_fences};
use super::inline::{Span, format_inline};
use super::language::normalize_language;
use super::MarkupOptions;
use serde::{Deserialize, Serialize};

/// Glyph every bullet marker renders as.
pub const BULLET_GLYPH: &str = "•";

/// Columns of leading whitespace per indent level.
const INDENT_UNIT: usize = 2;

const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];
const RULE_CHARS: [char; 3] = ['-', '*', '_'];

/// Marker of a list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ListMarker {
    /// Any bullet character; renders as [`BULLET_GLYPH`].
    Bullet,
    /// A numeric marker, kept literally (e.g. `"3."`).
    Ordinal(String),
}

impl ListMarker {
    /// What the renderer shows in front of the item.
    pub fn display(&self) -> &str {
        match self {
            ListMarker::Bullet => BULLET_GLYPH,
            ListMarker::Ordinal(ordinal) => ordinal,
        }
    }
}

/// One structural unit of rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: usize,
        spans: Vec<Span>,
    },
    Rule,
    ListItem {
        indent: usize,
        marker: ListMarker,
        spans: Vec<Span>,
    },
    Quote {
        indent: usize,
        spans: Vec<Span>,
    },
    CodeBlock {
        language: String,
        code: String,
    },
    Blank,
    Paragraph {
        spans: Vec<Span>,
    },
}

impl Block {
    /// Inline spans of the block; empty for rules, blanks and code.
    pub fn spans(&self) -> &[Span] {
        match self {
            Block::Heading { spans, .. }
            | Block::ListItem { spans, .. }
            | Block::Quote { spans, .. }
            | Block::Paragraph { spans } => spans,
            Block::Rule | Block::Blank | Block::CodeBlock { .. } => &[],
        }
    }
}

/// Something the parser had to repair while degrading gracefully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParseAnomaly {
    /// A fence was opened and never closed; its code ran to end of input.
    UnterminatedFence { language: String },
}

/// Parser output together with the anomalies met on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub anomalies: Vec<ParseAnomaly>,
}

/// Turns response text into an ordered sequence of [`Block`]s.
#[derive(Debug, Clone, Default)]
pub struct MarkupParser {
    options: MarkupOptions,
}

impl MarkupParser {
    pub fn new(options: MarkupOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MarkupOptions {
        &self.options
    }

    /// Parses `text` into blocks in source order.
    pub fn parse(&self, text: &str) -> Vec<Block> {
        self.parse_document(text).blocks
    }

    /// Parses `text`, also reporting anomalies such as an unterminated fence.
    pub fn parse_document(&self, text: &str) -> Document {
        let segments = split_fences(text, &self.options.fence);
        let mut document = Document::default();
        for (index, segment) in segments.iter().enumerate() {
            match *segment {
                Segment::Text(body) => {
                    // The break ending a closing fence line belongs to the fence.
                    let follows_code =
                        index > 0 && matches!(segments[index - 1], Segment::Code { .. });
                    let body = if follows_code {
                        strip_line_break(body)
                    } else {
                        body
                    };
                    if body.is_empty() {
                        continue;
                    }
                    document
                        .blocks
                        .extend(body.lines().map(|line| self.classify_line(line)));
                }
                Segment::Code {
                    tag,
                    body,
                    terminated,
                } => {
                    let language = normalize_language(tag, &self.options.default_language);
                    if !terminated {
                        tracing::debug!("Unterminated {} fence, running to end of input", language);
                        document.anomalies.push(ParseAnomaly::UnterminatedFence {
                            language: language.clone(),
                        });
                    }
                    document.blocks.push(Block::CodeBlock {
                        language,
                        code: body.trim_start_matches(['\r', '\n']).trim_end().to_string(),
                    });
                }
            }
        }
        document
    }

    /// Classifies one line: heading, rule, list item, quote, blank, paragraph.
    fn classify_line(&self, line: &str) -> Block {
        if let Some(block) = parse_heading(line) {
            return block;
        }
        if is_rule(line) {
            return Block::Rule;
        }

        let (width, rest) = self.leading_width(line);
        let indent = width / INDENT_UNIT;

        if let Some((marker, content)) = parse_list_marker(rest) {
            return Block::ListItem {
                indent,
                marker,
                spans: format_inline(content),
            };
        }
        if let Some(content) = rest.strip_prefix('>') {
            return Block::Quote {
                indent,
                spans: format_inline(content.trim_start()),
            };
        }
        if line.trim().is_empty() {
            return Block::Blank;
        }
        Block::Paragraph {
            spans: format_inline(line),
        }
    }

    /// Width of the leading whitespace (tabs count as `tab_width` columns)
    /// and the text after it.
    fn leading_width<'a>(&self, line: &'a str) -> (usize, &'a str) {
        let mut width = 0;
        for (idx, c) in line.char_indices() {
            match c {
                '\t' => width += self.options.tab_width,
                c if c.is_whitespace() => width += 1,
                _ => return (width, &line[idx..]),
            }
        }
        (width, "")
    }
}

/// Parses `text` with default options.
pub fn parse(text: &str) -> Vec<Block> {
    MarkupParser::default().parse(text)
}

fn parse_heading(line: &str) -> Option<Block> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(Block::Heading {
        level,
        spans: format_inline(rest.trim()),
    })
}

/// Three or more of the same rule character, blanks allowed in between.
fn is_rule(line: &str) -> bool {
    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    if !RULE_CHARS.contains(&first) {
        return false;
    }
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

/// A bullet or `<number>.` marker followed by whitespace or end of line.
fn parse_list_marker(rest: &str) -> Option<(ListMarker, &str)> {
    let first = rest.chars().next()?;

    let (marker, after) = if BULLET_MARKERS.contains(&first) {
        (ListMarker::Bullet, &rest[first.len_utf8()..])
    } else {
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 || !rest[digits..].starts_with('.') {
            return None;
        }
        (
            ListMarker::Ordinal(rest[..=digits].to_string()),
            &rest[digits + 1..],
        )
    };

    if !after.is_empty() && !after.starts_with(char::is_whitespace) {
        return None;
    }
    Some((marker, after.trim_start()))
}

fn strip_line_break(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}
