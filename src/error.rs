use thiserror::Error as ThisError;

use crate::frame;

pub type Result<T> = std::result::Result<T, Error>;

/// The three failure kinds a command invocation can surface.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Malformed or unexpected bytes on the wire. Indicates a codec or server
    /// incompatibility; never retried.
    #[error("protocol error; {0}")]
    Protocol(String),

    /// An explicit error reply from the server. A normal application-level
    /// failure; never retried.
    #[error("{0}")]
    Reply(String),

    /// The underlying stream failed. The reconnect scope retries the wrapped
    /// operation once on a fresh stream; a second failure propagates.
    #[error("connection error; {0}")]
    Connection(#[from] std::io::Error),
}

impl From<frame::Error> for Error {
    fn from(err: frame::Error) -> Error {
        Error::Protocol(err.to_string())
    }
}
