use std::fmt;

use bytes::Bytes;
use itertools::Itertools;

use crate::frame::Frame;

/// An outbound command: the ordered token sequence that becomes one request
/// frame on the wire.
///
/// The command name may contain spaces (`"CONFIG GET"`); it is split into one
/// token per word, and arguments are appended after the name tokens. A
/// command is immutable once handed to the dispatcher.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    tokens: Vec<Bytes>,
}

impl Command {
    pub fn new(name: &str) -> Command {
        let tokens = name
            .split(' ')
            .filter(|part| !part.is_empty())
            .map(|part| Bytes::copy_from_slice(part.as_bytes()))
            .collect();

        Command { tokens }
    }

    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Command {
        self.tokens.push(Bytes::copy_from_slice(arg.as_ref()));
        self
    }

    pub fn args<I, T>(mut self, args: I) -> Command
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for arg in args {
            self.tokens.push(Bytes::copy_from_slice(arg.as_ref()));
        }
        self
    }

    /// The request framing: a `*<count>` header followed by one
    /// length-prefixed bulk string per token.
    pub fn to_frame(&self) -> Frame {
        Frame::Array(self.tokens.iter().cloned().map(Frame::Bulk).collect())
    }

    pub fn tokens(&self) -> &[Bytes] {
        &self.tokens
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.tokens
                .iter()
                .map(|token| String::from_utf8_lossy(token))
                .join(" ")
        )
    }
}
