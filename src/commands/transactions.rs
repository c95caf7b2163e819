use crate::client::Client;
use crate::command::Command;
use crate::reply::{Reply, ReplyKind};
use crate::Result;

impl Client {
    /// Open a transaction block. Commands issued until
    /// [`exec`](Client::exec) are queued server-side and acknowledged with
    /// `+QUEUED` instead of their usual replies.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/multi/>
    pub async fn multi(&mut self) -> Result<Reply> {
        self.execute(Command::new("MULTI"), ReplyKind::Status).await
    }

    /// Execute the queued transaction, decoding the batched results with
    /// per-element auto-detection.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/exec/>
    pub async fn exec(&mut self) -> Result<Reply> {
        self.execute(Command::new("EXEC"), ReplyKind::Queued).await
    }

    /// Ref: <https://redis.io/docs/latest/commands/discard/>
    pub async fn discard(&mut self) -> Result<Reply> {
        self.execute(Command::new("DISCARD"), ReplyKind::Status).await
    }
}
