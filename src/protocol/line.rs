//! Line Assembly
//!
//! The transport hands us bytes in whatever chunks it likes: half a command,
//! three commands at once, or a line split across a dozen reads. The
//! `LineBuffer` accumulates those chunks and cuts them into complete lines
//! at the terminator byte.
//!
//! ## Overflow
//!
//! Memory is bounded by the configured capacity. When a line grows past it
//! before its terminator shows up, the bytes gathered so far are thrown away
//! and the line is marked as truncated. The line is still emitted when its
//! terminator finally arrives, so the caller can answer it with a
//! `LineTooLong` syntax error and carry on with the next one.

use crate::config::{ShellConfig, DEFAULT_MAX_LINE_LEN, DEFAULT_TERMINATOR};
use bytes::{Bytes, BytesMut};

/// One complete input line with its terminator stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    bytes: Bytes,
    truncated: bool,
}

impl RawLine {
    /// Creates a complete (non-truncated) line.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            truncated: false,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True when part of the line was dropped because it exceeded capacity.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&'static str> for RawLine {
    fn from(s: &'static str) -> Self {
        RawLine::new(Bytes::from_static(s.as_bytes()))
    }
}

/// Accumulates incoming bytes into terminator-delimited lines.
#[derive(Debug)]
pub struct LineBuffer {
    buffer: BytesMut,
    capacity: usize,
    terminator: u8,
    /// Set once the current line has overflowed
    truncated: bool,
    /// Bytes dropped from the current line
    discarded: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LEN)
    }
}

impl LineBuffer {
    /// Creates a buffer holding at most `capacity` bytes per line.
    pub fn new(capacity: usize) -> Self {
        Self::with_terminator(capacity, DEFAULT_TERMINATOR)
    }

    pub fn with_terminator(capacity: usize, terminator: u8) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            capacity,
            terminator,
            truncated: false,
            discarded: 0,
        }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::with_terminator(config.max_line_len, config.terminator)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes dropped so far from the line being assembled.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Appends a chunk and returns every line it completes, in order.
    pub fn feed(&mut self, mut chunk: &[u8]) -> Vec<RawLine> {
        let mut lines = Vec::new();

        while !chunk.is_empty() {
            match chunk.iter().position(|&b| b == self.terminator) {
                Some(pos) => {
                    self.append(&chunk[..pos]);
                    lines.push(self.take_line());
                    chunk = &chunk[pos + 1..];
                }
                None => {
                    self.append(chunk);
                    break;
                }
            }
        }

        lines
    }

    /// Drops any partially assembled line.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.truncated = false;
        self.discarded = 0;
    }

    /// Bytes the buffer may hold before overflowing. With a `\n` terminator
    /// one extra byte is allowed for the `\r` of a CRLF ending.
    fn limit(&self) -> usize {
        if self.terminator == b'\n' {
            self.capacity + 1
        } else {
            self.capacity
        }
    }

    fn append(&mut self, bytes: &[u8]) {
        if self.buffer.len() + bytes.len() <= self.limit() {
            self.buffer.extend_from_slice(bytes);
            return;
        }

        // Keep only the tail that fits; the line is rejected either way.
        let keep = bytes.len().min(self.capacity);
        self.discarded += self.buffer.len() + bytes.len() - keep;
        self.truncated = true;
        self.buffer.clear();
        self.buffer.extend_from_slice(&bytes[bytes.len() - keep..]);
    }

    fn take_line(&mut self) -> RawLine {
        if self.terminator == b'\n' && self.buffer.last() == Some(&b'\r') {
            self.buffer.truncate(self.buffer.len() - 1);
        }
        if self.buffer.len() > self.capacity {
            self.truncated = true;
        }

        let line = RawLine {
            bytes: self.buffer.split().freeze(),
            truncated: self.truncated,
        };
        self.truncated = false;
        self.discarded = 0;
        line
    }
}
