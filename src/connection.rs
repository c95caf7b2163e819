use std::io;
use std::net::SocketAddr;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream, ToSocketAddrs};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;
use uuid::Uuid;

use crate::codec::FrameCodec;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::reply::{self, Reply, ReplyKind};

static CRLF: &[u8; 2] = b"\r\n";

/// One logical connection to the server.
///
/// Owns the byte stream and the read buffer. Data is read from the socket
/// into the buffer; when a frame is parsed, the corresponding bytes are
/// removed. The remote address is remembered so a broken stream can be
/// re-established in place.
pub struct Connection {
    stream: TcpStream,
    // Data is read from the socket into the read buffer. When a frame is
    // parsed, the corresponding data is removed from the buffer.
    buffer: BytesMut,
    codec: FrameCodec,
    addr: SocketAddr,
    pub id: Uuid,
}

impl Connection {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Connection> {
        let addr = resolve(addr).await?;
        let stream = TcpStream::connect(addr).await?;

        Ok(Connection::new(stream, addr))
    }

    pub fn new(stream: TcpStream, addr: SocketAddr) -> Connection {
        Connection {
            stream,
            // Allocate the buffer with 4kb of capacity.
            buffer: BytesMut::with_capacity(4096),
            codec: FrameCodec,
            addr,
            id: Uuid::new_v4(),
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Replace the broken stream with a fresh one to the same address. Any
    /// buffered bytes belong to the dead stream and are dropped.
    pub async fn reconnect(&mut self) -> Result<()> {
        debug!(connection_id = %self.id, addr = %self.addr, "re-establishing connection");

        self.stream = TcpStream::connect(self.addr).await?;
        self.buffer.clear();

        Ok(())
    }

    /// Encode and send one command, flushing immediately so the server
    /// observes the full frame before the read side blocks on the reply.
    pub async fn write_command(&mut self, command: &Command) -> Result<()> {
        let mut out = BytesMut::new();
        self.codec.encode(command, &mut out)?;

        debug!(connection_id = %self.id, command = %command, "sending command");

        self.stream.write_all(&out).await?;
        self.stream.flush().await?;

        Ok(())
    }

    /// Like [`write_command`](Connection::write_command), but driven by
    /// write-readiness: waits for the socket to become writable and sends via
    /// `try_write`, as the multiplexed dispatcher requires.
    pub async fn send_when_writable(&mut self, command: &Command) -> Result<()> {
        let mut out = BytesMut::new();
        self.codec.encode(command, &mut out)?;

        debug!(connection_id = %self.id, command = %command, "sending command (readiness-driven)");

        let mut written = 0;
        while written < out.len() {
            self.stream.writable().await?;
            match self.stream.try_write(&out[written..]) {
                Ok(n) => written += n,
                // Readiness was spurious; wait for the next event.
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    /// Read one complete, self-describing frame, refilling the buffer until
    /// the codec can parse it. EOF mid-frame (or before one) is a connection
    /// error: the stream closed underneath us.
    pub async fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = self.codec.decode(&mut self.buffer)? {
                debug!(connection_id = %self.id, frame = %frame, "received reply frame");
                return Ok(frame);
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                return Err(closed());
            }
        }
    }

    /// Read one raw line (terminator stripped), verbatim.
    pub async fn read_line(&mut self) -> Result<String> {
        loop {
            if let Some(end) = self
                .buffer
                .windows(CRLF.len())
                .position(|window| window == CRLF)
            {
                let line = self.buffer.split_to(end);
                self.buffer.advance(CRLF.len());

                return String::from_utf8(line.to_vec())
                    .map_err(|_| Error::Protocol("invalid UTF-8 line".to_string()));
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                return Err(closed());
            }
        }
    }

    /// Decode the next reply according to the declared kind.
    pub async fn read_reply(&mut self, kind: ReplyKind) -> Result<Reply> {
        match kind {
            ReplyKind::End => Ok(Reply::Nothing),
            ReplyKind::Inline => {
                let line = self.read_line().await?;
                if line == "+QUEUED" {
                    Ok(Reply::Status("QUEUED".to_string()))
                } else {
                    Ok(Reply::Status(line))
                }
            }
            ReplyKind::PubSub => self.read_push_batch().await,
            kind => {
                let frame = self.read_frame().await?;
                reply::from_frame(frame, kind)
            }
        }
    }

    /// Wait for read-readiness, then decode one reply. The multiplexed
    /// dispatcher arms this per registered command.
    pub async fn reply_when_readable(&mut self, kind: ReplyKind) -> Result<Reply> {
        self.stream.readable().await?;
        self.read_reply(kind).await
    }

    /// Drain subscription push records that are ready right now.
    ///
    /// Each record is three fields read in sequence: channel class (bulk),
    /// channel name (bulk) and payload (inline). The first record may block;
    /// after that the batch keeps growing only while more input is already
    /// buffered or immediately readable, and stops (without error) once the
    /// stream has nothing ready.
    async fn read_push_batch(&mut self) -> Result<Reply> {
        let mut records = Vec::new();

        loop {
            let class = reply::from_frame(self.read_frame().await?, ReplyKind::Bulk)?;
            let channel = reply::from_frame(self.read_frame().await?, ReplyKind::Bulk)?;
            let payload = Reply::Status(self.read_line().await?);

            records.push(Reply::Array(vec![class, channel, payload]));

            if !self.input_ready()? {
                break;
            }
        }

        Ok(Reply::Array(records))
    }

    /// Whether at least one more byte can be consumed without blocking.
    fn input_ready(&mut self) -> Result<bool> {
        if !self.buffer.is_empty() {
            return Ok(true);
        }

        match self.stream.try_read_buf(&mut self.buffer) {
            // Peer closed; there is nothing more to drain.
            Ok(0) => Ok(false),
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Drop whatever is still buffered, returning how many bytes were
    /// discarded. Used by the dispatcher to resynchronize after a complete
    /// decode.
    pub fn discard_buffered(&mut self) -> usize {
        let discarded = self.buffer.len();
        self.buffer.clear();
        discarded
    }
}

async fn resolve(addr: impl ToSocketAddrs) -> Result<SocketAddr> {
    lookup_host(addr)
        .await?
        .next()
        .ok_or_else(|| {
            Error::Connection(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "address resolved to nothing",
            ))
        })
}

fn closed() -> Error {
    Error::Connection(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "connection closed by peer",
    ))
}
