//! Server-Sent Events (SSE) parser.
//!
//! Works on raw bytes so that a multi-byte UTF-8 character split across two
//! network reads is decoded only once its event block is complete.

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event_type: Option<String>,
    pub data: String,
}

/// Incremental SSE parser that turns byte chunks into events.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    /// The last byte fed was `\r`, so a leading `\n` in the next feed
    /// belongs to the same line ending.
    after_cr: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes and return any complete events.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        // CRLF, lone CR and LF all end a line. CR never appears inside a
        // multi-byte sequence, so this leaves payload characters intact.
        for &b in chunk {
            match b {
                b'\r' => {
                    self.buffer.push(b'\n');
                    self.after_cr = true;
                }
                b'\n' if self.after_cr => self.after_cr = false,
                _ => {
                    self.buffer.push(b);
                    self.after_cr = false;
                }
            }
        }

        let mut events = Vec::new();
        while let Some(pos) = find_blank_line(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..pos + 2).collect();
            let text = String::from_utf8_lossy(&block[..pos]);
            if let Some(event) = parse_block(&text) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing block that was not terminated by a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if self.buffer.is_empty() {
            return None;
        }
        let block = std::mem::take(&mut self.buffer);
        parse_block(&String::from_utf8_lossy(&block))
    }
}

fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}

/// Parse one SSE block (the lines between blank lines) into an event.
fn parse_block(block: &str) -> Option<SseEvent> {
    let mut event_type = None;
    let mut data_lines = Vec::new();

    for line in block.lines() {
        if line.starts_with(':') {
            continue;
        }

        if let Some((field, value)) = line.split_once(':') {
            let value = value.strip_prefix(' ').unwrap_or(value);
            match field {
                "event" => event_type = Some(value.to_string()),
                "data" => data_lines.push(value.to_string()),
                _ => {}
            }
        } else if line == "data" {
            data_lines.push(String::new());
        }
    }

    if data_lines.is_empty() {
        return None;
    }

    Some(SseEvent {
        event_type,
        data: data_lines.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_data_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: {\"choices\":[]}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, None);
        assert_eq!(events[0].data, "{\"choices\":[]}");
    }

    #[test]
    fn crlf_framing() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: a\r\n\r\ndata: b\r\n\r\n");
        let data: Vec<_> = events.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(data, ["a", "b"]);
    }

    #[test]
    fn bare_cr_line_endings() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: message\rdata: a\r\rdata: b\r\r");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type.as_deref(), Some("message"));
        assert_eq!(events[0].data, "a");
        assert_eq!(events[1].data, "b");
    }

    #[test]
    fn crlf_split_between_feeds() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: a\r").is_empty());
        let events = parser.feed(b"\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "a");
        // The LF half of the last CRLF must not start an empty line.
        let events = parser.feed(b"data: b\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "b");
    }

    #[test]
    fn event_split_across_feeds() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: {\"a\"").is_empty());
        assert!(parser.feed(b":1}\n").is_empty());
        let events = parser.feed(b"\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"a\":1}");
    }

    #[test]
    fn multibyte_char_split_across_feeds() {
        let bytes = "data: 翻译\n\n".as_bytes();
        // Split in the middle of the first CJK character.
        let (head, tail) = bytes.split_at(7);
        let mut parser = SseParser::new();
        assert!(parser.feed(head).is_empty());
        let events = parser.feed(tail);
        assert_eq!(events[0].data, "翻译");
    }

    #[test]
    fn comments_and_unknown_fields_ignored() {
        let mut parser = SseParser::new();
        let events = parser.feed(b": keep-alive\nid: 7\nevent: error\ndata: x\n\n: ping\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type.as_deref(), Some("error"));
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn multiline_data_joined() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: line1\ndata: line2\n\n");
        assert_eq!(events[0].data, "line1\nline2");
    }

    #[test]
    fn finish_flushes_unterminated_block() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: [DONE]\n").is_empty());
        let event = parser.finish().unwrap();
        assert_eq!(event.data, "[DONE]");
        assert!(parser.finish().is_none());
    }
}
