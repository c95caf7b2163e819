use std::fmt;

use bytes::Bytes;
use strum_macros::{Display, EnumString};

use crate::error::Error;
use crate::frame::Frame;

/// The caller's declared expectation for an upcoming reply.
///
/// The on-wire tag byte alone is not enough to know whether a bulk reply
/// should be surfaced as text, raw bytes, a boolean or a float, so every
/// command declares how its reply is to be decoded. `Anything` defers
/// entirely to the wire tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReplyKind {
    /// A `+` status line.
    Status,
    /// A `:` integer line.
    Integer,
    /// A `$` bulk string decoded as UTF-8 text.
    Bulk,
    /// A `$` bulk string returned as raw bytes, unmodified.
    Bytes,
    /// A `*` multi-bulk; elements decode by their own tags.
    Multi,
    /// A single-character bulk, `"0"` or `"1"`.
    Boolean,
    /// A bulk string parsed into a float.
    Float,
    /// One raw line, returned verbatim with no parsing.
    Inline,
    /// A multi-bulk whose elements are decoded with full auto-detection;
    /// used for the batched results of an executed transaction.
    Queued,
    /// A drained batch of subscription push records.
    PubSub,
    /// A bulk string split on spaces into a list.
    List,
    /// No reply is read at all; used for commands after which the
    /// connection is expected to close.
    End,
    /// Auto-detect from the wire tag byte.
    Anything,
}

/// A decoded reply value.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Status(String),
    Integer(i64),
    Bulk(String),
    Bytes(Bytes),
    Array(Vec<Reply>),
    Boolean(bool),
    Float(f64),
    /// Explicit "no value" (`$-1` or `*-1` on the wire), distinct from an
    /// empty string or an empty sequence.
    Nil,
    /// Commands with no reply decode to this.
    Nothing,
    /// Placeholder returned while pipelining; the decoded value is delivered
    /// when the pipeline is drained.
    Pending,
}

/// Decode a parsed frame according to the declared kind.
///
/// Two rules apply before the kind is consulted: the transaction-queuing
/// acknowledgement `+QUEUED` short-circuits to a literal status whatever the
/// caller declared, and an error reply always surfaces as [`Error::Reply`].
pub(crate) fn from_frame(frame: Frame, kind: ReplyKind) -> Result<Reply, Error> {
    let frame = match frame {
        Frame::Simple(s) if s == "QUEUED" => return Ok(Reply::Status(s)),
        Frame::Error(message) => return Err(Error::Reply(message)),
        frame => frame,
    };

    match kind {
        ReplyKind::Status => match frame {
            Frame::Simple(s) => Ok(Reply::Status(s)),
            frame => Err(unexpected(&frame, "status")),
        },
        ReplyKind::Integer => match frame {
            Frame::Integer(n) => Ok(Reply::Integer(n)),
            frame => Err(unexpected(&frame, "integer")),
        },
        ReplyKind::Bulk => match frame {
            Frame::Null => Ok(Reply::Nil),
            Frame::Bulk(data) => bulk_text(data),
            frame => Err(unexpected(&frame, "bulk")),
        },
        ReplyKind::Bytes => match frame {
            Frame::Null => Ok(Reply::Nil),
            Frame::Bulk(data) => Ok(Reply::Bytes(data)),
            frame => Err(unexpected(&frame, "bulk")),
        },
        ReplyKind::Float => match frame {
            Frame::Null => Ok(Reply::Nil),
            Frame::Bulk(data) => {
                let text = utf8(data)?;
                if text == "nil" {
                    return Ok(Reply::Nil);
                }
                text.parse::<f64>()
                    .map(Reply::Float)
                    .map_err(|_| Error::Protocol(format!("invalid float reply: {text:?}")))
            }
            frame => Err(unexpected(&frame, "bulk")),
        },
        ReplyKind::Boolean => match frame {
            Frame::Null => Ok(Reply::Nil),
            Frame::Bulk(data) => match &data[..] {
                b"0" => Ok(Reply::Boolean(false)),
                b"1" => Ok(Reply::Boolean(true)),
                other => Err(Error::Protocol(format!(
                    "invalid boolean reply: {:?}",
                    String::from_utf8_lossy(other)
                ))),
            },
            frame => Err(unexpected(&frame, "bulk")),
        },
        ReplyKind::Multi => match frame {
            Frame::Null => Ok(Reply::Nil),
            Frame::Array(items) => items
                .into_iter()
                .map(multi_element)
                .collect::<Result<Vec<_>, _>>()
                .map(Reply::Array),
            frame => Err(unexpected(&frame, "multi-bulk")),
        },
        ReplyKind::Queued => match frame {
            Frame::Null => Ok(Reply::Nil),
            Frame::Array(items) => items
                .into_iter()
                .map(any_reply)
                .collect::<Result<Vec<_>, _>>()
                .map(Reply::Array),
            frame => Err(unexpected(&frame, "multi-bulk")),
        },
        ReplyKind::List => match frame {
            Frame::Null => Ok(Reply::Nil),
            Frame::Bulk(data) => {
                let text = utf8(data)?;
                if text.is_empty() {
                    Ok(Reply::Array(Vec::new()))
                } else {
                    Ok(Reply::Array(
                        text.split(' ')
                            .map(|item| Reply::Bulk(item.to_string()))
                            .collect(),
                    ))
                }
            }
            frame => Err(unexpected(&frame, "bulk")),
        },
        ReplyKind::Anything => any_reply(frame),
        // These kinds are decoded straight off the stream by the connection,
        // before any frame exists.
        ReplyKind::Inline | ReplyKind::End | ReplyKind::PubSub => Err(Error::Protocol(format!(
            "reply kind {kind} is not decoded from a frame"
        ))),
    }
}

/// Structural decode by wire tag alone: status, error, integer, bulk and
/// nested arrays are all accepted, and an error element raises.
fn any_reply(frame: Frame) -> Result<Reply, Error> {
    match frame {
        Frame::Simple(s) => Ok(Reply::Status(s)),
        Frame::Error(message) => Err(Error::Reply(message)),
        Frame::Integer(n) => Ok(Reply::Integer(n)),
        Frame::Bulk(data) => bulk_text(data),
        Frame::Null => Ok(Reply::Nil),
        Frame::Array(items) => items
            .into_iter()
            .map(any_reply)
            .collect::<Result<Vec<_>, _>>()
            .map(Reply::Array),
    }
}

/// Multi-bulk elements are self-describing but restricted to the integer,
/// bulk and nested multi-bulk tags.
fn multi_element(frame: Frame) -> Result<Reply, Error> {
    match frame {
        Frame::Integer(n) => Ok(Reply::Integer(n)),
        Frame::Bulk(data) => bulk_text(data),
        Frame::Null => Ok(Reply::Nil),
        Frame::Array(items) => items
            .into_iter()
            .map(multi_element)
            .collect::<Result<Vec<_>, _>>()
            .map(Reply::Array),
        Frame::Simple(_) => Err(Error::Protocol(
            "unexpected status reply ('+') inside a multi-bulk".to_string(),
        )),
        Frame::Error(_) => Err(Error::Protocol(
            "unexpected error reply ('-') inside a multi-bulk".to_string(),
        )),
    }
}

/// Bulk payload as text. The literal `"nil"` decodes to [`Reply::Nil`], a
/// compatibility special case kept from older servers.
fn bulk_text(data: Bytes) -> Result<Reply, Error> {
    let text = utf8(data)?;
    if text == "nil" {
        Ok(Reply::Nil)
    } else {
        Ok(Reply::Bulk(text))
    }
}

fn utf8(data: Bytes) -> Result<String, Error> {
    String::from_utf8(data.to_vec())
        .map_err(|_| Error::Protocol("invalid UTF-8 in bulk reply".to_string()))
}

fn unexpected(frame: &Frame, expected: &str) -> Error {
    Error::Protocol(format!("expected {expected} reply, got {frame}"))
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(s) => write!(f, "{}", s),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Bulk(s) => write!(f, "\"{}\"", s),
            Reply::Bytes(data) => write!(f, "{:?}", data),
            Reply::Boolean(b) => write!(f, "(boolean) {}", b),
            Reply::Float(x) => write!(f, "(float) {}", x),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Nothing => Ok(()),
            Reply::Pending => write!(f, "(pending)"),
            Reply::Array(items) => {
                if items.is_empty() {
                    return write!(f, "(empty array)");
                }
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", index + 1, item)?;
                }
                Ok(())
            }
        }
    }
}
