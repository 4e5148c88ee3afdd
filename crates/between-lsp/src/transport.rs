//! LSP message framing.
//!
//! ```text
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes of JSON>
//! ```
//!
//! [`split_frame`] never consumes a frame until the whole body is buffered.
//! A malformed header is logged and the buffer is resynchronised on the next
//! `Content-Length` occurrence; it does not end the stream.

use std::io::{self, Read, Write};
use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

const HEADER_END: &[u8] = b"\r\n\r\n";
const LENGTH_MARKER: &[u8] = b"Content-Length";

/// Most bytes a header section may take, terminator included.
pub const MAX_HEADER_LEN: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("malformed frame header: {0}")]
    MalformedHeader(String),

    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode message: {0}")]
    Json(#[from] serde_json::Error),
}

/// A complete frame found at the start of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Bytes to drop from the buffer, header included.
    pub consumed: usize,
    /// Body position within the buffer.
    pub body: Range<usize>,
}

/// Find the first frame in `buf`.
///
/// `Ok(None)` means more data is needed. An error is returned when the
/// header section is complete but unusable, or when [`MAX_HEADER_LEN`] bytes
/// have arrived without a header terminator.
pub fn split_frame(buf: &[u8]) -> Result<Option<Frame>, TransportError> {
    let window = &buf[..buf.len().min(MAX_HEADER_LEN)];
    let Some(header_len) = find(window, HEADER_END) else {
        if buf.len() >= MAX_HEADER_LEN {
            return Err(TransportError::MalformedHeader(format!(
                "no header terminator within {MAX_HEADER_LEN} bytes"
            )));
        }
        return Ok(None);
    };

    let header = std::str::from_utf8(&buf[..header_len])
        .map_err(|_| TransportError::MalformedHeader("header is not valid UTF-8".to_string()))?;
    let length = content_length(header)?;

    let body_start = header_len + HEADER_END.len();
    let body_end = body_start.checked_add(length).ok_or_else(|| {
        TransportError::MalformedHeader(format!("Content-Length {length} is out of range"))
    })?;
    if buf.len() < body_end {
        return Ok(None);
    }

    Ok(Some(Frame {
        consumed: body_end,
        body: body_start..body_end,
    }))
}

fn content_length(header: &str) -> Result<usize, TransportError> {
    for line in header.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            return value.trim().parse().map_err(|_| {
                TransportError::MalformedHeader(format!("invalid Content-Length '{}'", value.trim()))
            });
        }
    }
    Err(TransportError::MalformedHeader(format!(
        "missing Content-Length in '{}'",
        header.escape_debug()
    )))
}

/// Drop bytes from the front of `buf` up to the next plausible header start.
///
/// At least one byte is always dropped. With no marker in sight, only a tail
/// shorter than the marker is kept, in case the marker is split across reads.
pub fn resync(buf: &mut Vec<u8>) {
    if buf.is_empty() {
        return;
    }
    let skip = match find(&buf[1..], LENGTH_MARKER) {
        Some(i) => i + 1,
        None => buf.len().saturating_sub(LENGTH_MARKER.len() - 1).max(1),
    };
    buf.drain(..skip);
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// =============================================================================
// READER
// =============================================================================

/// Pulls complete frame bodies out of a byte stream.
pub struct FrameReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Next frame body, or `None` at end of input.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut chunk = [0u8; 8192];
        loop {
            match split_frame(&self.buf) {
                Ok(Some(frame)) => {
                    let body = self.buf[frame.body].to_vec();
                    self.buf.drain(..frame.consumed);
                    return Ok(Some(body));
                }
                Ok(None) => {}
                Err(TransportError::MalformedHeader(reason)) => {
                    tracing::warn!(%reason, "Dropping malformed frame header");
                    resync(&mut self.buf);
                    continue;
                }
                Err(e) => return Err(e),
            }

            let read = match self.reader.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if read == 0 {
                if !self.buf.is_empty() {
                    tracing::warn!(bytes = self.buf.len(), "Discarding incomplete frame at end of input");
                }
                return Ok(None);
            }
            self.buf.extend_from_slice(&chunk[..read]);
        }
    }
}

/// Serialize `message` and write it as one frame.
pub fn write_message<W: Write>(writer: &mut W, message: &impl Serialize) -> Result<(), TransportError> {
    let body = serde_json::to_vec(message)?;
    write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn framed(body: &str) -> Vec<u8> {
        format!("Content-Length: {}\r\n\r\n{}", body.len(), body).into_bytes()
    }

    #[test]
    fn test_split_complete_frame() {
        let buf = framed(r#"{"a":1}"#);
        let frame = split_frame(&buf).unwrap().unwrap();
        assert_eq!(frame.consumed, buf.len());
        assert_eq!(&buf[frame.body], br#"{"a":1}"#);
    }

    #[test]
    fn test_split_needs_more_data() {
        let buf = framed(r#"{"a":1}"#);
        for cut in 0..buf.len() {
            assert_eq!(split_frame(&buf[..cut]).unwrap(), None, "cut at {cut}");
        }
    }

    #[test]
    fn test_split_ignores_other_headers() {
        let buf = b"Content-Type: application/vscode-jsonrpc\r\ncontent-length: 2\r\n\r\n{}";
        let frame = split_frame(buf).unwrap().unwrap();
        assert_eq!(&buf[frame.body], b"{}");
    }

    #[test]
    fn test_split_rejects_bad_header() {
        assert!(matches!(
            split_frame(b"Content-Length: x\r\n\r\n{}"),
            Err(TransportError::MalformedHeader(_))
        ));
        assert!(matches!(
            split_frame(b"garbage\r\n\r\n{}"),
            Err(TransportError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_split_rejects_unterminated_header() {
        let buf = vec![b'x'; MAX_HEADER_LEN];
        assert!(matches!(
            split_frame(&buf),
            Err(TransportError::MalformedHeader(_))
        ));
        assert_eq!(split_frame(&buf[..MAX_HEADER_LEN - 1]).unwrap(), None);
    }

    #[test]
    fn test_resync_jumps_to_next_marker() {
        let mut buf = b"junk Content-Length: 2\r\n\r\n{}".to_vec();
        resync(&mut buf);
        assert!(buf.starts_with(b"Content-Length"));

        // Already at a marker: still makes progress.
        let mut buf = b"Content-Length: x\r\n\r\nContent-Length: 2".to_vec();
        resync(&mut buf);
        assert_eq!(buf, b"Content-Length: 2");
    }

    #[test]
    fn test_resync_keeps_possible_partial_marker() {
        let mut buf = b"xxxxxxxxxxxxxxxxxxxxContent-Len".to_vec();
        resync(&mut buf);
        assert_eq!(buf, b"xxContent-Len");

        let mut buf = b"x".to_vec();
        resync(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_reader_recovers_after_malformed_header() {
        let mut input = b"Content-Length: nope\r\n\r\n".to_vec();
        input.extend(framed("[1]"));
        input.extend(framed("[2]"));
        let mut reader = FrameReader::new(Cursor::new(input));
        assert_eq!(reader.next_frame().unwrap(), Some(b"[1]".to_vec()));
        assert_eq!(reader.next_frame().unwrap(), Some(b"[2]".to_vec()));
        assert_eq!(reader.next_frame().unwrap(), None);
    }

    #[test]
    fn test_reader_bounds_header_without_terminator() {
        let mut input = vec![b'x'; 10 * MAX_HEADER_LEN];
        input.extend(framed("[1]"));
        let mut reader = FrameReader::new(Cursor::new(input));
        assert_eq!(reader.next_frame().unwrap(), Some(b"[1]".to_vec()));
        assert!(reader.buf.len() < MAX_HEADER_LEN);
        assert_eq!(reader.next_frame().unwrap(), None);
    }

    #[test]
    fn test_reader_discards_truncated_tail() {
        let mut input = framed("[1]");
        input.extend(b"Content-Length: 10\r\n\r\n{");
        let mut reader = FrameReader::new(Cursor::new(input));
        assert_eq!(reader.next_frame().unwrap(), Some(b"[1]".to_vec()));
        assert_eq!(reader.next_frame().unwrap(), None);
    }

    #[test]
    fn test_write_message() {
        let mut out = Vec::new();
        write_message(&mut out, &serde_json::json!({"x": true})).unwrap();
        assert_eq!(out, framed(r#"{"x":true}"#));
    }
}
