//! STOMP 1.2 wire codec.
//!
//! Frame layout on the wire:
//!
//! ```text
//! COMMAND\n
//! name:value\n        (zero or more, escaped except on CONNECT/CONNECTED)
//! \n
//! body                (content-length bytes, or up to the first NUL)
//! \0
//! ```
//!
//! Bare EOLs between frames are heart-beats and are skipped by the decoder.

use crate::error::StompError;
use crate::frame::{Command, Frame};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Upper bound on a single inbound frame (headers + body).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Codec turning a byte stream into [`Frame`]s and back.
#[derive(Debug, Clone)]
pub struct StompCodec {
    max_frame_size: usize,
}

impl Default for StompCodec {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl StompCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    fn too_large(&self) -> StompError {
        StompError::Protocol(format!(
            "frame exceeds maximum size of {} bytes",
            self.max_frame_size
        ))
    }
}

impl Decoder for StompCodec {
    type Item = Frame;
    type Error = StompError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, StompError> {
        let heartbeats = src
            .iter()
            .take_while(|b| **b == b'\n' || **b == b'\r')
            .count();
        src.advance(heartbeats);

        let Some((header_len, body_start)) = find_header_end(src) else {
            if src.len() > self.max_frame_size {
                return Err(self.too_large());
            }
            return Ok(None);
        };

        let head = std::str::from_utf8(&src[..header_len])
            .map_err(|_| StompError::Protocol("frame headers are not valid UTF-8".to_string()))?;
        let mut lines = head.lines();
        let command_line = lines.next().unwrap_or_default();
        let command = Command::parse(command_line)
            .ok_or_else(|| StompError::Protocol(format!("unknown command '{command_line}'")))?;

        let mut headers = Vec::new();
        for line in lines {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| StompError::Protocol(format!("malformed header line '{line}'")))?;
            if command.escapes_headers() {
                headers.push((unescape(name)?, unescape(value)?));
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }

        let content_length = match headers.iter().find(|(k, _)| k == "content-length") {
            Some((_, v)) => Some(v.trim().parse::<usize>().map_err(|_| {
                StompError::Protocol(format!("invalid content-length '{v}'"))
            })?),
            None => None,
        };

        let body_end = match content_length {
            Some(len) => {
                let end = match body_start.checked_add(len) {
                    Some(end) if end < self.max_frame_size => end,
                    _ => return Err(self.too_large()),
                };
                if src.len() < end + 1 {
                    src.reserve(end + 1 - src.len());
                    return Ok(None);
                }
                if src[end] != 0 {
                    return Err(StompError::Protocol(
                        "frame body is not NUL terminated".to_string(),
                    ));
                }
                end
            }
            None => match src[body_start..].iter().position(|b| *b == 0) {
                Some(offset) => body_start + offset,
                None => {
                    if src.len() > self.max_frame_size {
                        return Err(self.too_large());
                    }
                    return Ok(None);
                }
            },
        };

        let raw = src.split_to(body_end + 1).freeze();
        Ok(Some(Frame {
            command,
            headers,
            body: raw.slice(body_start..body_end),
        }))
    }
}

impl Encoder<Frame> for StompCodec {
    type Error = StompError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), StompError> {
        let escape = frame.command.escapes_headers();
        if !escape {
            // Unescaped headers cannot carry the characters that delimit them.
            for (name, value) in &frame.headers {
                if name.contains([':', '\n', '\r']) || value.contains(['\n', '\r']) {
                    return Err(StompError::Protocol(format!(
                        "header '{name}' cannot be sent unescaped on a {} frame",
                        frame.command
                    )));
                }
            }
        }

        dst.reserve(frame.body.len() + 64);
        dst.put_slice(frame.command.as_str().as_bytes());
        dst.put_u8(b'\n');

        for (name, value) in &frame.headers {
            if escape {
                escape_into(dst, name);
                dst.put_u8(b':');
                escape_into(dst, value);
            } else {
                dst.put_slice(name.as_bytes());
                dst.put_u8(b':');
                dst.put_slice(value.as_bytes());
            }
            dst.put_u8(b'\n');
        }

        if !frame.body.is_empty() && frame.get_header("content-length").is_none() {
            dst.put_slice(format!("content-length:{}\n", frame.body.len()).as_bytes());
        }

        dst.put_u8(b'\n');
        dst.put_slice(&frame.body);
        dst.put_u8(0);
        Ok(())
    }
}

/// Locate the blank line ending the header block.
///
/// Returns the length of the command + header lines and the offset where
/// the body starts.
fn find_header_end(buf: &[u8]) -> Option<(usize, usize)> {
    let mut line_start = 0;
    while let Some(offset) = buf[line_start..].iter().position(|b| *b == b'\n') {
        let line_end = line_start + offset;
        let line = &buf[line_start..line_end];
        if line_start > 0 && (line.is_empty() || line == b"\r") {
            return Some((line_start, line_end + 1));
        }
        line_start = line_end + 1;
    }
    None
}

fn escape_into(dst: &mut BytesMut, value: &str) {
    for c in value.chars() {
        match c {
            '\\' => dst.put_slice(b"\\\\"),
            '\n' => dst.put_slice(b"\\n"),
            '\r' => dst.put_slice(b"\\r"),
            ':' => dst.put_slice(b"\\c"),
            _ => {
                let mut buf = [0u8; 4];
                dst.put_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
}

fn unescape(raw: &str) -> Result<String, StompError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                return Err(StompError::Protocol(format!(
                    "invalid header escape '\\{other}'"
                )))
            }
            None => {
                return Err(StompError::Protocol(
                    "header ends with a dangling escape".to_string(),
                ))
            }
        }
    }
    Ok(out)
}
