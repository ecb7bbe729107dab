//! Splitting response text on fenced code delimiters.

/// A run of source text between (or inside) fences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Code {
        tag: &'a str,
        body: &'a str,
        terminated: bool,
    },
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '+' | '#' | '-')
}

/// Splits `text` into alternating text and code segments in source order.
///
/// The opening fence may carry a language tag directly after the marker.
/// A fence without a closing partner runs to the end of the input.
pub(crate) fn split_fences<'a>(text: &'a str, fence: &str) -> Vec<Segment<'a>> {
    if fence.is_empty() {
        return vec![Segment::Text(text)];
    }

    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(fence) {
        let open = cursor + offset;
        if open > cursor {
            segments.push(Segment::Text(&text[cursor..open]));
        }

        let tag_start = open + fence.len();
        let tag_len = text[tag_start..]
            .find(|c: char| !is_tag_char(c))
            .unwrap_or(text.len() - tag_start);
        let tag = &text[tag_start..tag_start + tag_len];

        let body_start = skip_opening_line_end(text, tag_start + tag_len);

        match text[body_start..].find(fence) {
            Some(close_offset) => {
                let close = body_start + close_offset;
                segments.push(Segment::Code {
                    tag,
                    body: &text[body_start..close],
                    terminated: true,
                });
                cursor = close + fence.len();
            }
            None => {
                segments.push(Segment::Code {
                    tag,
                    body: &text[body_start..],
                    terminated: false,
                });
                cursor = text.len();
            }
        }
    }

    if cursor < text.len() {
        segments.push(Segment::Text(&text[cursor..]));
    }
    segments
}

/// Skips blanks after the tag and the single line break ending the opening line.
fn skip_opening_line_end(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    let blanks = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let after_blanks = &rest[blanks..];

    if after_blanks.starts_with("\r\n") {
        from + blanks + 2
    } else if after_blanks.starts_with('\n') {
        from + blanks + 1
    } else {
        from + blanks
    }
}
