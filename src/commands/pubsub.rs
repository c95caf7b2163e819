use crate::client::Client;
use crate::command::Command;
use crate::reply::{Reply, ReplyKind};
use crate::Result;

impl Client {
    /// Subscribe to `channels`, returning the batch of push records that is
    /// ready once the subscription acknowledgements arrive. Further pushed
    /// messages can be drained with another `PubSub` decode, or delivered
    /// continuously through
    /// [`AsyncClient::execute_async`](crate::multiplex::AsyncClient::execute_async).
    ///
    /// Ref: <https://redis.io/docs/latest/commands/subscribe/>
    pub async fn subscribe(&mut self, channels: &[&str]) -> Result<Reply> {
        self.execute(Command::new("SUBSCRIBE").args(channels), ReplyKind::PubSub)
            .await
    }

    /// Ref: <https://redis.io/docs/latest/commands/unsubscribe/>
    pub async fn unsubscribe(&mut self, channels: &[&str]) -> Result<Reply> {
        self.execute(Command::new("UNSUBSCRIBE").args(channels), ReplyKind::PubSub)
            .await
    }

    /// Subscribe to every channel matching the given patterns.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/psubscribe/>
    pub async fn psubscribe(&mut self, patterns: &[&str]) -> Result<Reply> {
        self.execute(Command::new("PSUBSCRIBE").args(patterns), ReplyKind::PubSub)
            .await
    }

    /// Publish `message` to `channel`, returning the receiver count.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/publish/>
    pub async fn publish(&mut self, channel: &str, message: impl AsRef<[u8]>) -> Result<Reply> {
        self.execute(
            Command::new("PUBLISH").arg(channel).arg(message),
            ReplyKind::Integer,
        )
        .await
    }
}
