use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::net::ToSocketAddrs;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::command::Command;
use crate::connection::Connection;
use crate::error::Result;
use crate::reply::{Reply, ReplyKind};

/// A session handle for multiplexed, readiness-driven dispatch.
///
/// Instead of blocking the caller for the round trip, [`execute_async`]
/// registers the work with the runtime: a write-readiness stage sends the
/// frame, a read-readiness stage decodes the reply and hands it to the
/// caller-supplied continuation. Many independent sessions can be multiplexed
/// by one runtime; each holds its own connection and captures everything it
/// needs at registration time, never from ambient context.
///
/// [`execute_async`]: AsyncClient::execute_async
#[derive(Clone)]
pub struct AsyncClient {
    conn: Arc<Mutex<Connection>>,
    pipelined: Arc<AtomicBool>,
}

impl AsyncClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<AsyncClient> {
        let conn = Connection::connect(addr).await?;

        info!(connection_id = %conn.id, addr = %conn.peer_addr(), "connected (multiplexed)");

        Ok(AsyncClient {
            conn: Arc::new(Mutex::new(conn)),
            pipelined: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Mark the session as pipelined; a pipelined session skips the trailing
    /// resync after each decode.
    pub fn set_pipelined(&self, pipelined: bool) {
        self.pipelined.store(pipelined, Ordering::Relaxed);
    }

    /// Dispatch `command` without blocking the caller.
    ///
    /// The continuation is invoked with the decoded reply. Commands that
    /// open a continuous subscription (`kind == ReplyKind::PubSub`) re-arm
    /// the read stage after every delivery and keep invoking the
    /// continuation with each drained batch of pushed messages until the
    /// connection fails or closes. All other kinds complete after one reply.
    ///
    /// Errors raised inside the dispatched work surface through the returned
    /// [`JoinHandle`].
    pub fn execute_async<F>(
        &self,
        command: Command,
        kind: ReplyKind,
        mut continuation: F,
    ) -> JoinHandle<Result<()>>
    where
        F: FnMut(Reply) + Send + 'static,
    {
        // Everything the readiness stages need is bound here, at
        // registration time: which connection, which pipelining flag, which
        // continuation. Nothing is looked up when the socket fires.
        let conn = Arc::clone(&self.conn);
        let pipelined = self.pipelined.load(Ordering::Relaxed);

        tokio::spawn(async move {
            let mut conn = conn.lock().await;

            // Write-readiness stage: send the frame.
            conn.send_when_writable(&command).await?;

            // Read-readiness stage: decode and deliver. One-shot for every
            // kind except subscriptions, which re-arm themselves.
            loop {
                let reply = conn.reply_when_readable(kind).await?;
                continuation(reply);

                if kind != ReplyKind::PubSub {
                    break;
                }
            }

            if !pipelined {
                let leftover = conn.discard_buffered();
                if leftover > 0 {
                    warn!(
                        connection_id = %conn.id,
                        bytes = leftover,
                        "unread bytes left after a complete reply; discarding to resync"
                    );
                }
            }

            Ok(())
        })
    }
}
