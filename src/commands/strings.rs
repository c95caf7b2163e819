use crate::client::Client;
use crate::command::Command;
use crate::reply::{Reply, ReplyKind};
use crate::Result;

impl Client {
    /// Get the value of `key`. If the key does not exist the special value
    /// `nil` is returned.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/get/>
    pub async fn get(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("GET").arg(key), ReplyKind::Bulk)
            .await
    }

    /// Set `key` to hold `value`.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/set/>
    pub async fn set(&mut self, key: &str, value: impl AsRef<[u8]>) -> Result<Reply> {
        self.execute(Command::new("SET").arg(key).arg(value), ReplyKind::Status)
            .await
    }

    /// Set `key` only if it does not already hold a value.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/setnx/>
    pub async fn setnx(&mut self, key: &str, value: impl AsRef<[u8]>) -> Result<Reply> {
        self.execute(Command::new("SETNX").arg(key).arg(value), ReplyKind::Integer)
            .await
    }

    /// Append `value` to the string at `key`, returning the new length.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/append/>
    pub async fn append(&mut self, key: &str, value: impl AsRef<[u8]>) -> Result<Reply> {
        self.execute(Command::new("APPEND").arg(key).arg(value), ReplyKind::Integer)
            .await
    }

    pub async fn strlen(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("STRLEN").arg(key), ReplyKind::Integer)
            .await
    }

    /// Ref: <https://redis.io/docs/latest/commands/incr/>
    pub async fn incr(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("INCR").arg(key), ReplyKind::Integer)
            .await
    }

    pub async fn decr(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("DECR").arg(key), ReplyKind::Integer)
            .await
    }

    pub async fn incrby(&mut self, key: &str, increment: i64) -> Result<Reply> {
        self.execute(
            Command::new("INCRBY").arg(key).arg(increment.to_string()),
            ReplyKind::Integer,
        )
        .await
    }

    pub async fn decrby(&mut self, key: &str, decrement: i64) -> Result<Reply> {
        self.execute(
            Command::new("DECRBY").arg(key).arg(decrement.to_string()),
            ReplyKind::Integer,
        )
        .await
    }

    /// Increment the float stored at `key`, returning the new value.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/incrbyfloat/>
    pub async fn incrbyfloat(&mut self, key: &str, increment: f64) -> Result<Reply> {
        self.execute(
            Command::new("INCRBYFLOAT").arg(key).arg(increment.to_string()),
            ReplyKind::Float,
        )
        .await
    }

    /// Get the value of `key` and delete it.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/getdel/>
    pub async fn getdel(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("GETDEL").arg(key), ReplyKind::Bulk)
            .await
    }

    /// Get the values of all `keys`, `nil` for every key that is missing.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/mget/>
    pub async fn mget(&mut self, keys: &[&str]) -> Result<Reply> {
        self.execute(Command::new("MGET").args(keys), ReplyKind::Multi)
            .await
    }
}
