pub mod client;
pub mod codec;
pub mod command;
pub mod commands;
pub mod connection;
pub mod error;
pub mod frame;
pub mod multiplex;
pub mod reply;

pub use client::Client;
pub use command::Command;
pub use error::{Error, Result};
pub use multiplex::AsyncClient;
pub use reply::{Reply, ReplyKind};
