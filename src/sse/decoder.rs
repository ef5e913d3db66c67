//! Byte chunks to text lines.
//!
//! Bytes are buffered raw and each line is decoded only once it is complete.
//! `\n` never occurs inside a multi-byte UTF-8 sequence, so splitting on it
//! before decoding keeps the output identical however the transport chunks
//! the stream.

use bytes::BytesMut;

/// Incremental line splitter for a streamed response body.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes received but not yet returned as a line
    buffer: BytesMut,
    /// Prefix of `buffer` already known to contain no newline
    scanned: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk as received from the transport.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Pop the next complete line, without its terminator.
    ///
    /// Returns `None` when the buffer holds no complete line; the remainder
    /// stays buffered until more bytes arrive.
    pub fn next_line(&mut self) -> Option<String> {
        let offset = self.buffer[self.scanned..]
            .iter()
            .position(|b| *b == b'\n');

        let Some(offset) = offset else {
            self.scanned = self.buffer.len();
            return None;
        };

        let end = self.scanned + offset;
        let mut line = self.buffer.split_to(end + 1);
        self.scanned = 0;

        line.truncate(end);
        if line.last() == Some(&b'\r') {
            line.truncate(end - 1);
        }

        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Iterate over the complete lines currently buffered.
    pub fn lines(&mut self) -> impl Iterator<Item = String> + '_ {
        std::iter::from_fn(move || self.next_line())
    }

    /// End of stream. An unterminated trailing line is an incomplete frame
    /// and is discarded; returns how many bytes were dropped.
    pub fn finish(mut self) -> usize {
        let dropped = self.buffer.len();
        if dropped > 0 {
            tracing::debug!(bytes = dropped, "Discarding unterminated trailing frame");
        }
        self.buffer.clear();
        dropped
    }
}
