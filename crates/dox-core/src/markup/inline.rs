//! Inline formatter: one line of text into an ordered sequence of spans.
//!
//! Rules run one after another over the still-unformatted text. Each rule
//! scans left to right and takes non-overlapping matches; whatever a rule
//! captures becomes a finished span and is never looked at again by the rules
//! that follow. Inline code runs first so its interior stays literal.

use serde::{Deserialize, Serialize};

/// One inline-formatted run of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Span {
    Text { value: String },
    Bold { value: String },
    Italic { value: String },
    InlineCode { value: String },
    Strikethrough { value: String },
    Link { label: String, url: String },
}

impl Span {
    pub fn text(value: impl Into<String>) -> Self {
        Span::Text {
            value: value.into(),
        }
    }

    pub fn bold(value: impl Into<String>) -> Self {
        Span::Bold {
            value: value.into(),
        }
    }

    pub fn italic(value: impl Into<String>) -> Self {
        Span::Italic {
            value: value.into(),
        }
    }

    pub fn code(value: impl Into<String>) -> Self {
        Span::InlineCode {
            value: value.into(),
        }
    }

    pub fn strikethrough(value: impl Into<String>) -> Self {
        Span::Strikethrough {
            value: value.into(),
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Span::Link {
            label: label.into(),
            url: url.into(),
        }
    }

    /// The visible literal of the span (the label for links).
    pub fn literal(&self) -> &str {
        match self {
            Span::Text { value }
            | Span::Bold { value }
            | Span::Italic { value }
            | Span::InlineCode { value }
            | Span::Strikethrough { value } => value,
            Span::Link { label, .. } => label,
        }
    }
}

/// Formatting rules in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    InlineCode,
    Bold,
    Italic,
    Strikethrough,
    Link,
    BareUrl,
}

const RULES: [Rule; 6] = [
    Rule::InlineCode,
    Rule::Bold,
    Rule::Italic,
    Rule::Strikethrough,
    Rule::Link,
    Rule::BareUrl,
];

const URL_PREFIXES: [&str; 2] = ["https://", "http://"];

/// Punctuation that ends a sentence rather than a bare URL.
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

enum Piece {
    Raw(String),
    Done(Span),
}

struct Match {
    start: usize,
    end: usize,
    span: Span,
}

/// Formats one line of text into spans.
///
/// Concatenating the literals of the returned spans yields `text` with the
/// formatting delimiters removed; explicit links keep their URL only as the
/// navigation target.
pub fn format_inline(text: &str) -> Vec<Span> {
    let mut pieces = vec![Piece::Raw(text.to_string())];

    for rule in RULES {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| match piece {
                Piece::Raw(raw) => apply_rule(rule, &raw),
                done => vec![done],
            })
            .collect();
    }

    pieces
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Raw(raw) if raw.is_empty() => None,
            Piece::Raw(raw) => Some(Span::text(raw)),
            Piece::Done(span) => Some(span),
        })
        .collect()
}

fn apply_rule(rule: Rule, raw: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut cursor = 0;

    while let Some(found) = find_match(rule, raw, cursor) {
        if found.start > cursor {
            pieces.push(Piece::Raw(raw[cursor..found.start].to_string()));
        }
        pieces.push(Piece::Done(found.span));
        cursor = found.end;
    }

    if cursor < raw.len() {
        pieces.push(Piece::Raw(raw[cursor..].to_string()));
    }
    pieces
}

fn find_match(rule: Rule, s: &str, from: usize) -> Option<Match> {
    match rule {
        Rule::InlineCode => find_delimited(s, from, "`", |value| Span::InlineCode { value }),
        Rule::Bold => find_delimited(s, from, "**", |value| Span::Bold { value }),
        Rule::Strikethrough => {
            find_delimited(s, from, "~~", |value| Span::Strikethrough { value })
        }
        Rule::Italic => find_italic(s, from),
        Rule::Link => find_link(s, from),
        Rule::BareUrl => find_bare_url(s, from),
    }
}

fn find_from(s: &str, pattern: &str, from: usize) -> Option<usize> {
    s.get(from..)?.find(pattern).map(|offset| offset + from)
}

/// `<d>content<d>` with non-empty content, closed by the nearest delimiter.
fn find_delimited(
    s: &str,
    from: usize,
    delimiter: &str,
    make: fn(String) -> Span,
) -> Option<Match> {
    let mut search = from;
    while let Some(open) = find_from(s, delimiter, search) {
        let content_start = open + delimiter.len();
        let close = find_from(s, delimiter, content_start)?;
        if close > content_start {
            return Some(Match {
                start: open,
                end: close + delimiter.len(),
                span: make(s[content_start..close].to_string()),
            });
        }
        search = open + 1;
    }
    None
}

/// `*content*` where neither asterisk touches another asterisk.
fn find_italic(s: &str, from: usize) -> Option<Match> {
    let bytes = s.as_bytes();
    let mut search = from;
    while let Some(open) = find_from(s, "*", search) {
        search = open + 1;
        if open > 0 && bytes[open - 1] == b'*' {
            continue;
        }
        let Some(close) = find_from(s, "*", open + 1) else {
            return None;
        };
        if close == open + 1 || bytes.get(close + 1) == Some(&b'*') {
            continue;
        }
        return Some(Match {
            start: open,
            end: close + 1,
            span: Span::italic(&s[open + 1..close]),
        });
    }
    None
}

/// `[label](url)` with non-empty label and url.
fn find_link(s: &str, from: usize) -> Option<Match> {
    let mut search = from;
    while let Some(open) = find_from(s, "[", search) {
        search = open + 1;
        let Some(label_end) = find_from(s, "]", open + 1) else {
            return None;
        };
        if label_end == open + 1 || !s[label_end + 1..].starts_with('(') {
            continue;
        }
        let url_start = label_end + 2;
        let Some(url_end) = find_from(s, ")", url_start) else {
            continue;
        };
        if url_end == url_start {
            continue;
        }
        return Some(Match {
            start: open,
            end: url_end + 1,
            span: Span::link(&s[open + 1..label_end], &s[url_start..url_end]),
        });
    }
    None
}

/// `http://...` or `https://...` up to the next whitespace.
fn find_bare_url(s: &str, mut from: usize) -> Option<Match> {
    loop {
        let start = find_from(s, "http", from)?;
        let tail = &s[start..];
        let Some(prefix) = URL_PREFIXES.iter().find(|prefix| tail.starts_with(**prefix)) else {
            from = start + 1;
            continue;
        };
        let raw_end = tail
            .char_indices()
            .find(|(_, c)| c.is_whitespace())
            .map(|(idx, _)| idx)
            .unwrap_or(tail.len());
        let url = tail[..raw_end].trim_end_matches(URL_TRAILING_PUNCTUATION);

        if url.len() > prefix.len() {
            return Some(Match {
                start,
                end: start + url.len(),
                span: Span::link(url, url),
            });
        }
        // A bare prefix is not a link; keep scanning after it.
        from = start + prefix.len();
    }
}
