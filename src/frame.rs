// https://redis.io/docs/reference/protocol-spec

use std::fmt;
use std::io::Cursor;

use bytes::{Buf, Bytes};
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    #[error("invalid reply type tag: {0}")]
    InvalidTag(u8),
    /// Invalid frame encoding.
    #[error("{0}")]
    Malformed(String),
}

/// One complete wire-format unit: a full command request or a full reply.
///
/// The first byte in a RESP-serialized payload always identifies its type.
/// Replies use five tags: `+` simple string, `-` error, `:` integer, `$`
/// bulk string and `*` array. Both the null bulk string (`$-1`) and the null
/// array (`*-1`) parse to [`Frame::Null`], an explicit "no value" distinct
/// from an empty string or array.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

impl Frame {
    /// Parse a single frame out of `src`, advancing the cursor past it.
    ///
    /// Returns [`Error::Incomplete`] when `src` does not yet hold the whole
    /// frame; the cursor position is unspecified in that case and callers are
    /// expected to retry from the start once more data arrived.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        match get_byte(src)? {
            b'+' => Ok(Frame::Simple(get_line_utf8(src)?)),
            b'-' => Ok(Frame::Error(get_line_utf8(src)?)),
            b':' => Ok(Frame::Integer(get_integer_line(src)?)),
            // $<length>\r\n<data>\r\n
            b'$' => {
                let length = get_integer_line(src)?;
                if length < 0 {
                    return Ok(Frame::Null);
                }
                let data = get_payload(src, length as usize)?;
                Ok(Frame::Bulk(data))
            }
            // *<number-of-elements>\r\n<element-1>...<element-n>
            b'*' => {
                let count = get_integer_line(src)?;
                if count < 0 {
                    return Ok(Frame::Null);
                }
                // Elements are self-describing; each one is parsed from its
                // own tag byte, nested arrays included.
                let mut frames = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    frames.push(Self::parse(src)?);
                }
                Ok(Frame::Array(frames))
            }
            byte => Err(Error::InvalidTag(byte)),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Frame::Simple(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(b'+');
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Error(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(b'-');
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Integer(i) => {
                let repr = i.to_string();
                let mut bytes = Vec::with_capacity(1 + repr.len() + CRLF.len());
                bytes.push(b':');
                bytes.extend_from_slice(repr.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Bulk(data) => {
                let length = data.len().to_string();
                let mut bytes =
                    Vec::with_capacity(1 + length.len() + CRLF.len() + data.len() + CRLF.len());
                bytes.push(b'$');
                bytes.extend_from_slice(length.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes.extend_from_slice(data);
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Null => b"$-1\r\n".to_vec(),
            Frame::Array(items) => {
                let count = items.len().to_string();
                let mut bytes = Vec::with_capacity(1 + count.len() + CRLF.len());
                bytes.push(b'*');
                bytes.extend_from_slice(count.as_bytes());
                bytes.extend_from_slice(CRLF);
                for item in items {
                    bytes.extend(item.serialize());
                }
                bytes
            }
        }
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(data) => write!(f, "${}", String::from_utf8_lossy(data)),
            Frame::Null => write!(f, "$-1"),
            Frame::Array(items) => {
                write!(f, "*{}", items.len())?;
                for item in items {
                    write!(f, " {}", item)?;
                }
                Ok(())
            }
        }
    }
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}

/// The bytes up to (not including) the next CRLF; the cursor is left past the
/// terminator.
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf = *src.get_ref();

    let end = buf[start..]
        .windows(CRLF.len())
        .position(|window| window == CRLF)
        .map(|index| start + index)
        .ok_or(Error::Incomplete)?;

    src.set_position((end + CRLF.len()) as u64);

    Ok(&buf[start..end])
}

fn get_line_utf8(src: &mut Cursor<&[u8]>) -> Result<String, Error> {
    let line = get_line(src)?;
    String::from_utf8(line.to_vec())
        .map_err(|_| Error::Malformed("invalid UTF-8 line".to_string()))
}

fn get_integer_line(src: &mut Cursor<&[u8]>) -> Result<i64, Error> {
    let line = get_line(src)?;
    let text = std::str::from_utf8(line)
        .map_err(|_| Error::Malformed("invalid UTF-8 line".to_string()))?;

    text.parse::<i64>()
        .map_err(|_| Error::Malformed(format!("invalid integer: {text:?}")))
}

/// Exactly `length` payload bytes followed by the mandatory terminator. The
/// payload may itself contain CRLF sequences, so the length prefix is
/// authoritative and no scanning happens here.
fn get_payload(src: &mut Cursor<&[u8]>, length: usize) -> Result<Bytes, Error> {
    if src.remaining() < length + CRLF.len() {
        return Err(Error::Incomplete);
    }

    let start = src.position() as usize;
    let buf = src.get_ref();

    if &buf[start + length..start + length + CRLF.len()] != CRLF {
        return Err(Error::Malformed(
            "bulk payload is missing its terminator".to_string(),
        ));
    }

    let data = Bytes::copy_from_slice(&buf[start..start + length]);
    src.set_position((start + length + CRLF.len()) as u64);

    Ok(data)
}
