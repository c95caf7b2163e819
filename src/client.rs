use tokio::net::ToSocketAddrs;
use tracing::{info, instrument, warn};

use crate::command::Command;
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::reply::{Reply, ReplyKind};

/// A synchronous (blocking-per-round-trip) client session.
///
/// One `Client` owns one logical connection; sessions never share ambient
/// state, so concurrent sessions each construct their own client. Every
/// command invocation runs inside a reconnect scope: a connection fault is
/// retried exactly once on a fresh stream, and a second consecutive fault
/// propagates.
pub struct Client {
    conn: Connection,
    pipeline: Pipeline,
}

/// Pending decode obligations while pipelining: one declared kind per
/// command sent, drained strictly in send order.
#[derive(Default)]
struct Pipeline {
    depth: u32,
    pending: Vec<ReplyKind>,
}

impl Pipeline {
    fn active(&self) -> bool {
        self.depth > 0
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.pending.clear();
    }
}

impl Client {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Client> {
        let conn = Connection::connect(addr).await?;

        info!(connection_id = %conn.id, addr = %conn.peer_addr(), "connected");

        Ok(Client {
            conn,
            pipeline: Pipeline::default(),
        })
    }

    pub fn is_pipelined(&self) -> bool {
        self.pipeline.active()
    }

    /// Send `command` and decode its reply according to `kind`.
    ///
    /// While pipelining, the frame is still sent immediately but the decode
    /// is deferred: the declared kind joins the pending queue and
    /// [`Reply::Pending`] is returned.
    #[instrument(
        name = "execute",
        skip_all,
        fields(connection_id = %self.conn.id, command = %command, kind = %kind)
    )]
    pub async fn execute(&mut self, command: Command, kind: ReplyKind) -> Result<Reply> {
        match self.try_execute(&command, kind).await {
            Err(Error::Connection(cause)) => {
                warn!(error = %cause, "connection failure; reconnecting and retrying once");

                // A second failure propagates out of either of these.
                self.conn.reconnect().await?;
                if self.pipeline.active() {
                    // The pending queue refers to replies owed by the dead
                    // stream; they are gone.
                    warn!("open pipeline lost with the connection; clearing pending queue");
                    self.pipeline.reset();
                }
                self.try_execute(&command, kind).await
            }
            outcome => outcome,
        }
    }

    async fn try_execute(&mut self, command: &Command, kind: ReplyKind) -> Result<Reply> {
        self.conn.write_command(command).await?;

        if self.pipeline.active() {
            self.pipeline.pending.push(kind);
            return Ok(Reply::Pending);
        }

        let reply = self.conn.read_reply(kind).await?;
        self.resync();

        Ok(reply)
    }

    /// Any bytes still buffered after a complete, correctly-typed decode are
    /// a bug signal; they are reported and then discarded so the stream stays
    /// usable.
    fn resync(&mut self) {
        let leftover = self.conn.discard_buffered();
        if leftover > 0 {
            warn!(
                connection_id = %self.conn.id,
                bytes = leftover,
                "unread bytes left after a complete reply; discarding to resync"
            );
        }
    }

    /// Enter pipelined mode: replies are no longer decoded per command but
    /// queued up until [`pipeline_end`](Client::pipeline_end).
    ///
    /// Entering again while already pipelined is not an error, but it does
    /// not start a second independent pipeline; the inner scope is a no-op
    /// wrapper around the outer one.
    pub fn pipeline_begin(&mut self) {
        self.pipeline.depth += 1;
        if self.pipeline.depth > 1 {
            warn!("nested pipeline; inner scope is a no-op around the outer pipeline");
        }
    }

    /// Leave pipelined mode, draining every queued decode in send order.
    ///
    /// The queue is always fully drained, even when an individual decode
    /// fails: later entries are still decoded while the stream remains
    /// interpretable, and the first error encountered is returned once the
    /// queue is exhausted. A connection fault aborts the drain, since no
    /// further reply can exist on a dead stream.
    pub async fn pipeline_end(&mut self) -> Result<Vec<Reply>> {
        match self.pipeline.depth {
            0 => {
                warn!("pipeline_end without an active pipeline");
                return Ok(Vec::new());
            }
            1 => self.pipeline.depth = 0,
            // Closing a nested no-op scope; the outer scope keeps the queue.
            _ => {
                self.pipeline.depth -= 1;
                return Ok(Vec::new());
            }
        }

        let pending = std::mem::take(&mut self.pipeline.pending);
        let mut replies = Vec::with_capacity(pending.len());
        let mut first_error: Option<Error> = None;

        for kind in pending {
            match self.conn.read_reply(kind).await {
                Ok(reply) => replies.push(reply),
                Err(err @ Error::Connection(_)) => {
                    return Err(first_error.unwrap_or(err));
                }
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        self.resync();

        Ok(replies)
    }
}
