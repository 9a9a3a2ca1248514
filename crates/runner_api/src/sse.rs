/// Fixed line substituted when an event payload cannot be decoded.
pub const MALFORMED_PAYLOAD_LINE: &str = "line could not be processed";

/// Incremental parser for the runner's SSE text stream.
///
/// Each complete event carries one JSON-encoded string as its data payload,
/// representing one output line from the remote execution.
#[derive(Debug, Default)]
pub struct SseStreamParser {
    buffer: String,
}

impl SseStreamParser {
    /// Feed arbitrary bytes into the parser and drain complete output lines.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));
        let mut lines = Vec::new();

        while let Some(split) = self.buffer.find("\n\n") {
            let frame = self.buffer[..split].to_string();
            self.buffer.drain(0..split + 2);

            if let Some(payload) = extract_data_payload(&frame) {
                lines.push(decode_payload_line(&payload));
            }
        }

        lines
    }

    /// Parse a complete SSE payload string in one shot.
    pub fn parse_frames(input: &str) -> Vec<String> {
        let mut parser = Self::default();
        parser.feed(input.as_bytes())
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.trim().is_empty()
    }
}

fn extract_data_payload(frame: &str) -> Option<String> {
    let data_lines: Vec<&str> = frame
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect();

    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

/// Decode one event payload into an output line.
///
/// A payload that is not a single JSON string resolves to
/// [`MALFORMED_PAYLOAD_LINE`]; the channel itself is never torn down for
/// one bad event.
pub fn decode_payload_line(payload: &str) -> String {
    match serde_json::from_str::<String>(payload) {
        Ok(line) => line,
        Err(_) => MALFORMED_PAYLOAD_LINE.to_string(),
    }
}
