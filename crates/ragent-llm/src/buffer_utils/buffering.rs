use anyhow::Result;
use std::collections::VecDeque;

/// Line buffer for incremental SSE parsing
///
/// Bytes arrive in arbitrary chunk boundaries (a UTF-8 sequence or a line
/// may be split across chunks); lines are only decoded once complete.
pub struct CircularLineBuffer {
    buffer: VecDeque<u8>,
}

impl CircularLineBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract next line (up to \n), trimmed of surrounding whitespace and `\r`
    ///
    /// Returns None if no complete line is available
    pub fn next_line(&mut self) -> Option<Result<String>> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
        Some(Self::decode(line_bytes))
    }

    /// Take whatever is left after the final newline (stream ended without one)
    pub fn take_remainder(&mut self) -> Option<Result<String>> {
        if self.buffer.is_empty() {
            return None;
        }
        let line_bytes: Vec<u8> = self.buffer.drain(..).collect();
        Some(Self::decode(line_bytes))
    }

    fn decode(line_bytes: Vec<u8>) -> Result<String> {
        String::from_utf8(line_bytes)
            .map(|line| line.trim().to_string())
            .map_err(|e| anyhow::anyhow!("Invalid UTF-8: {}", e))
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
