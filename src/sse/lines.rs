//! Incremental Line Buffering
//!
//! Splits a byte stream into newline-delimited records without assuming
//! anything about chunk boundaries. Network reads can cut a multi-byte
//! UTF-8 character in half, so decoding must not happen per chunk.
//!
//! The trick: splitting happens in *byte* space. `0x0A` never occurs inside
//! a multi-byte UTF-8 sequence, so a complete line is always a complete
//! sequence of characters and can be decoded safely. Bytes after the last
//! newline stay buffered until more data arrives or the stream ends.

/// Accumulates raw response bytes and yields complete lines.
///
/// Owned exclusively by the stream pump; discarded once the stream ends.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every line completed by it.
    ///
    /// Lines are returned without their trailing `\n` (and without a
    /// trailing `\r` for CRLF framing). Any bytes after the final newline
    /// remain buffered for the next call.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop(); // the newline itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Number of bytes currently buffered.
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }

    /// Flush the final unterminated line at end of stream, if any.
    ///
    /// A character truncated by the stream ending mid-sequence decodes to
    /// U+FFFD here; this path only feeds the best-effort final flush.
    #[must_use]
    pub fn finish(mut self) -> Option<String> {
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        if self.buf.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.buf).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_complete_line() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"hello\n"), vec!["hello"]);
        assert_eq!(buf.pending_bytes(), 0);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut buf = LineBuffer::new();
        assert!(buf.push(b"hel").is_empty());
        assert_eq!(buf.push(b"lo\nwor"), vec!["hello"]);
        assert_eq!(buf.push(b"ld\n"), vec!["world"]);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"a\nb\nc\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let mut buf = LineBuffer::new();
        let bytes = "héllo\n".as_bytes();
        // "é" is two bytes; cut between them.
        assert!(buf.push(&bytes[..2]).is_empty());
        assert_eq!(buf.push(&bytes[2..]), vec!["héllo"]);
    }

    #[test]
    fn test_emoji_split_across_three_chunks() {
        let mut buf = LineBuffer::new();
        let bytes = "ok 🎓\n".as_bytes();
        assert!(buf.push(&bytes[..4]).is_empty());
        assert!(buf.push(&bytes[4..5]).is_empty());
        assert_eq!(buf.push(&bytes[5..]), vec!["ok 🎓"]);
    }

    #[test]
    fn test_crlf_stripped() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"data: x\r\n"), vec!["data: x"]);
    }

    #[test]
    fn test_finish_flushes_partial_line() {
        let mut buf = LineBuffer::new();
        assert!(buf.push(b"no newline").is_empty());
        assert_eq!(buf.finish(), Some("no newline".to_string()));
    }

    #[test]
    fn test_finish_empty_is_none() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"done\n"), vec!["done"]);
        assert_eq!(buf.finish(), None);
    }

    #[test]
    fn test_empty_lines_preserved() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push(b"\n\n"), vec!["", ""]);
    }
}
