use crate::client::Client;
use crate::command::Command;
use crate::reply::{Reply, ReplyKind};
use crate::Result;

impl Client {
    /// Ref: <https://redis.io/docs/latest/commands/ping/>
    pub async fn ping(&mut self) -> Result<Reply> {
        self.execute(Command::new("PING"), ReplyKind::Status).await
    }

    /// Ref: <https://redis.io/docs/latest/commands/echo/>
    pub async fn echo(&mut self, message: impl AsRef<[u8]>) -> Result<Reply> {
        self.execute(Command::new("ECHO").arg(message), ReplyKind::Bulk)
            .await
    }

    /// Switch to the database at `index`.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/select/>
    pub async fn select(&mut self, index: u32) -> Result<Reply> {
        self.execute(
            Command::new("SELECT").arg(index.to_string()),
            ReplyKind::Status,
        )
        .await
    }

    pub async fn flushdb(&mut self) -> Result<Reply> {
        self.execute(Command::new("FLUSHDB"), ReplyKind::Status).await
    }

    pub async fn dbsize(&mut self) -> Result<Reply> {
        self.execute(Command::new("DBSIZE"), ReplyKind::Integer).await
    }

    /// Ref: <https://redis.io/docs/latest/commands/info/>
    pub async fn info(&mut self) -> Result<Reply> {
        self.execute(Command::new("INFO"), ReplyKind::Bulk).await
    }

    /// Configuration values matching `parameter`. The command name carries
    /// an internal separator and is sent as two tokens.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/config-get/>
    pub async fn config_get(&mut self, parameter: &str) -> Result<Reply> {
        self.execute(Command::new("CONFIG GET").arg(parameter), ReplyKind::Multi)
            .await
    }

    /// Ask the server to close the connection. No reply is read.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/quit/>
    pub async fn quit(&mut self) -> Result<Reply> {
        self.execute(Command::new("QUIT"), ReplyKind::End).await
    }

    /// Ref: <https://redis.io/docs/latest/commands/shutdown/>
    pub async fn shutdown(&mut self) -> Result<Reply> {
        self.execute(Command::new("SHUTDOWN"), ReplyKind::End).await
    }
}
