use crate::client::Client;
use crate::command::Command;
use crate::reply::{Reply, ReplyKind};
use crate::Result;

impl Client {
    /// Remove the given keys, returning how many existed.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/del/>
    pub async fn del(&mut self, keys: &[&str]) -> Result<Reply> {
        self.execute(Command::new("DEL").args(keys), ReplyKind::Integer)
            .await
    }

    /// Ref: <https://redis.io/docs/latest/commands/exists/>
    pub async fn exists(&mut self, keys: &[&str]) -> Result<Reply> {
        self.execute(Command::new("EXISTS").args(keys), ReplyKind::Integer)
            .await
    }

    /// All keys matching `pattern`, as a space-delimited list reply.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/keys/>
    pub async fn keys(&mut self, pattern: &str) -> Result<Reply> {
        self.execute(Command::new("KEYS").arg(pattern), ReplyKind::List)
            .await
    }

    pub async fn ttl(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("TTL").arg(key), ReplyKind::Integer)
            .await
    }

    pub async fn expire(&mut self, key: &str, seconds: i64) -> Result<Reply> {
        self.execute(
            Command::new("EXPIRE").arg(key).arg(seconds.to_string()),
            ReplyKind::Integer,
        )
        .await
    }

    /// Ref: <https://redis.io/docs/latest/commands/rename/>
    pub async fn rename(&mut self, key: &str, new_key: &str) -> Result<Reply> {
        self.execute(Command::new("RENAME").arg(key).arg(new_key), ReplyKind::Status)
            .await
    }

    /// The type of the value stored at `key`.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/type/>
    pub async fn key_type(&mut self, key: &str) -> Result<Reply> {
        self.execute(Command::new("TYPE").arg(key), ReplyKind::Status)
            .await
    }
}
