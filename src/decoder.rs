//! Incremental line decoding for chunked response bodies.
//!
//! The transport hands out byte chunks whose boundaries carry no meaning:
//! a chunk may end in the middle of a line or in the middle of a multibyte
//! character. [`LineDecoder`] buffers whatever is unresolved and only ever
//! returns whole lines.
//!
//! ```
//! use jarvis_chat::decoder::LineDecoder;
//!
//! let mut decoder = LineDecoder::new();
//! assert_eq!(decoder.feed(b"data: a\nda"), vec!["data: a".to_string()]);
//! assert_eq!(decoder.feed(b"ta: b\n"), vec!["data: b".to_string()]);
//! assert_eq!(decoder.flush(), None);
//! ```

use std::mem;

/// Splits a byte stream into newline-delimited text lines.
///
/// One decoder belongs to one stream session and is dropped with it.
#[derive(Debug, Default)]
pub struct LineDecoder {
    /// Decoded text not yet terminated by a newline.
    buffer: String,
    /// Trailing bytes of a UTF-8 sequence that has not fully arrived.
    pending: Vec<u8>,
    exhausted: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` and return every line it completes, newline stripped.
    ///
    /// The last, possibly incomplete segment stays buffered for the next call.
    /// Invalid UTF-8 is replaced with U+FFFD.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if chunk.is_empty() || self.exhausted {
            return Vec::new();
        }

        self.decode(chunk);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.buffer.split_off(last_newline + 1);
        let complete = mem::replace(&mut self.buffer, rest);

        complete[..last_newline]
            .split('\n')
            .map(str::to_owned)
            .collect()
    }

    /// Return the residual text once the transport has no more data.
    ///
    /// The decoder is exhausted afterwards.
    pub fn flush(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        self.exhausted = true;

        if !self.pending.is_empty() {
            self.pending.clear();
            self.buffer.push(char::REPLACEMENT_CHARACTER);
        }

        let residual = mem::take(&mut self.buffer);
        (!residual.is_empty()).then_some(residual)
    }

    /// True once [`flush`](Self::flush) has been called.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn decode(&mut self, chunk: &[u8]) {
        let mut bytes = mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    self.buffer.push_str(&String::from_utf8_lossy(valid));

                    match err.error_len() {
                        Some(invalid_len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[invalid_len..];
                        }
                        // Sequence cut off by the chunk boundary.
                        None => {
                            self.pending = tail.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = "data: {\"type\":\"token\",\"content\":\"héllo 👋\"}\n\
                          \n\
                          : keep-alive\n\
                          data: {\"type\":\"complete\",\"content\":\"\"}\n\
                          trailing";

    fn decode_all(chunks: &[&[u8]]) -> Vec<String> {
        let mut decoder = LineDecoder::new();
        let mut lines = Vec::new();
        for chunk in chunks {
            lines.extend(decoder.feed(chunk));
        }
        lines.extend(decoder.flush());
        lines
    }

    #[test]
    fn test_single_chunk() {
        let lines = decode_all(&[STREAM.as_bytes()]);
        assert_eq!(
            lines,
            vec![
                "data: {\"type\":\"token\",\"content\":\"héllo 👋\"}",
                "",
                ": keep-alive",
                "data: {\"type\":\"complete\",\"content\":\"\"}",
                "trailing",
            ]
        );
    }

    #[test]
    fn test_every_two_way_split_is_equivalent() {
        let bytes = STREAM.as_bytes();
        let expected = decode_all(&[bytes]);

        for split in 0..=bytes.len() {
            let (head, tail) = bytes.split_at(split);
            assert_eq!(decode_all(&[head, tail]), expected, "split at {}", split);
        }
    }

    #[test]
    fn test_byte_by_byte_is_equivalent() {
        let bytes = STREAM.as_bytes();
        let chunks: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(decode_all(&chunks), decode_all(&[bytes]));
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let wave = "👋".as_bytes();
        let mut decoder = LineDecoder::new();

        assert!(decoder.feed(&wave[..1]).is_empty());
        assert!(decoder.feed(&wave[1..3]).is_empty());
        assert_eq!(decoder.feed(&[wave[3], b'\n']), vec!["👋".to_string()]);
    }

    #[test]
    fn test_empty_chunk_is_noop() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.feed(b"").is_empty());
        assert!(decoder.feed(b"partial").is_empty());
        assert!(decoder.feed(b"").is_empty());
        assert_eq!(decoder.flush(), Some("partial".to_string()));
    }

    #[test]
    fn test_consecutive_newlines_produce_empty_lines() {
        let mut decoder = LineDecoder::new();
        assert_eq!(decoder.feed(b"a\n\n\nb\n"), vec!["a", "", "", "b"]);
        assert_eq!(decoder.flush(), None);
    }

    #[test]
    fn test_line_never_split_across_feeds() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.feed(b"data: {\"type\":").is_empty());
        assert_eq!(
            decoder.feed(b"\"token\"}\nnext"),
            vec!["data: {\"type\":\"token\"}".to_string()]
        );
        assert_eq!(decoder.flush(), Some("next".to_string()));
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let mut decoder = LineDecoder::new();
        assert_eq!(decoder.feed(b"a\xffb\n"), vec!["a\u{fffd}b".to_string()]);
    }

    #[test]
    fn test_flush_with_truncated_character() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.feed(&"é".as_bytes()[..1]).is_empty());
        assert_eq!(decoder.flush(), Some("\u{fffd}".to_string()));
    }

    #[test]
    fn test_exhausted_after_flush() {
        let mut decoder = LineDecoder::new();
        decoder.feed(b"tail");
        assert_eq!(decoder.flush(), Some("tail".to_string()));
        assert!(decoder.is_exhausted());
        assert!(decoder.feed(b"more\n").is_empty());
        assert_eq!(decoder.flush(), None);
    }
}
