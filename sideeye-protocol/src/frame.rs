//! Line framing for the host serial link.
//!
//! Frame format:
//! - BODY (1-512 bytes): UTF-8 JSON text
//! - TERMINATOR (1 byte): `\n` or `\r`
//!
//! Empty lines (for example the `\n` of a `\r\n` pair) are ignored. Bytes
//! past the cap are dropped rather than buffered and the resulting line is
//! marked truncated, so one runaway line never corrupts the framing of the
//! lines after it.

use heapless::Vec;

/// Maximum number of body bytes buffered for one line
pub const MAX_LINE_LEN: usize = 512;

/// A complete line received from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8, MAX_LINE_LEN>,
    truncated: bool,
}

impl Line {
    /// Line body without its terminator
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True if bytes were dropped because the line exceeded the cap
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Accumulates bytes until a line terminator arrives
#[derive(Debug, Clone, Default)]
pub struct LineFramer {
    buffer: Vec<u8, MAX_LINE_LEN>,
    truncated: bool,
    dropped_bytes: u32,
}

impl LineFramer {
    /// Create an empty framer
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard any partially received line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.truncated = false;
    }

    /// Total bytes dropped over the cap since creation
    pub fn dropped_bytes(&self) -> u32 {
        self.dropped_bytes
    }

    /// Feed a single byte
    ///
    /// Returns `Some(line)` when a terminator completes a non-empty line.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\n' | b'\r' => {
                if self.buffer.is_empty() {
                    self.truncated = false;
                    return None;
                }
                let line = Line {
                    bytes: core::mem::take(&mut self.buffer),
                    truncated: self.truncated,
                };
                self.truncated = false;
                Some(line)
            }
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.truncated = true;
                    self.dropped_bytes = self.dropped_bytes.saturating_add(1);
                }
                None
            }
        }
    }

    /// Feed multiple bytes, calling `on_line` for every completed line
    pub fn feed_bytes<F>(&mut self, bytes: &[u8], mut on_line: F)
    where
        F: FnMut(Line),
    {
        for &byte in bytes {
            if let Some(line) = self.feed(byte) {
                on_line(line);
            }
        }
    }
}
