//! Incremental decoder for `text/event-stream` bodies.

/// Payload some servers send to mark the end of the stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Splits a byte stream into event payloads.
///
/// Feed decoded text with [`push`](Self::push); each completed event yields
/// the joined contents of its `data:` lines. Comments and other fields are
/// skipped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence.
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw body bytes, which may split a character.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => self.pending.len(),
        };
        let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
        self.pending.drain(..valid);
        self.push(&text)
    }

    /// Appends `text` and returns the payloads of every event it completed.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.buffer.push_str(&text.replace('\r', ""));

        let mut payloads = Vec::new();
        while let Some(end) = self.buffer.find("\n\n") {
            let raw: String = self.buffer.drain(..end + 2).collect();
            if let Some(payload) = event_payload(&raw) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Flushes an event left unterminated at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        let tail = std::mem::take(&mut self.pending);
        self.buffer.push_str(&String::from_utf8_lossy(&tail));
        let rest = std::mem::take(&mut self.buffer);
        event_payload(&rest)
    }
}

fn event_payload(raw_event: &str) -> Option<String> {
    let data_lines: Vec<&str> = raw_event
        .lines()
        .filter(|line| !line.starts_with(':'))
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .collect();

    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.push("data: {\"chunk\":\"Hi\"}\n\n"), vec![r#"{"chunk":"Hi"}"#]);
    }

    #[test]
    fn test_event_split_across_reads() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push("data: {\"chu").is_empty());
        assert!(decoder.push("nk\":\"a\"}\n").is_empty());
        assert_eq!(decoder.push("\ndata: {\"chunk\":\"b\"}\n\n"), vec![
            r#"{"chunk":"a"}"#,
            r#"{"chunk":"b"}"#
        ]);
    }

    #[test]
    fn test_crlf_comments_and_multiline_data() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(": keep-alive\r\n\r\nevent: message\r\ndata: one\r\ndata: two\r\n\r\n");
        assert_eq!(payloads, vec!["one\ntwo"]);
    }

    #[test]
    fn test_character_split_across_reads() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: caf\u{e9}\n\n".as_bytes();
        let split = bytes.len() - 3;

        assert!(decoder.push_bytes(&bytes[..split]).is_empty());
        assert_eq!(decoder.push_bytes(&bytes[split..]), vec!["caf\u{e9}"]);
    }

    #[test]
    fn test_finish_flushes_tail() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push("data: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
        assert_eq!(decoder.finish(), None);
    }
}
