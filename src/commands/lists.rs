use crate::client::Client;
use crate::command::Command;
use crate::reply::{Reply, ReplyKind};
use crate::Result;

impl Client {
    /// Prepend `value` to the list at `key`, returning the new length.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/lpush/>
    pub async fn lpush(&mut self, key: &str, value: impl AsRef<[u8]>) -> Result<Reply> {
        self.execute(Command::new("LPUSH").arg(key).arg(value), ReplyKind::Integer)
            .await
    }

    /// Ref: <https://redis.io/docs/latest/commands/rpush/>
    pub async fn rpush(&mut self, key: &str, value: impl AsRef<[u8]>) -> Result<Reply> {
        self.execute(Command::new("RPUSH").arg(key).arg(value), ReplyKind::Integer)
            .await
    }

    /// The elements of the list at `key` between `start` and `stop`,
    /// inclusive; negative indexes count from the end.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/lrange/>
    pub async fn lrange(&mut self, key: &str, start: i64, stop: i64) -> Result<Reply> {
        self.execute(
            Command::new("LRANGE")
                .arg(key)
                .arg(start.to_string())
                .arg(stop.to_string()),
            ReplyKind::Multi,
        )
        .await
    }

    pub async fn llen(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("LLEN").arg(key), ReplyKind::Integer)
            .await
    }

    pub async fn lpop(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("LPOP").arg(key), ReplyKind::Bulk)
            .await
    }

    pub async fn rpop(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("RPOP").arg(key), ReplyKind::Bulk)
            .await
    }
}
