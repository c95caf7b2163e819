//! Thin typed wrappers over [`Client::execute`](crate::client::Client::execute),
//! grouped by command category.
//!
//! Each wrapper only supplies the command tokens and the declared reply
//! kind; every protocol behavior lives in the dispatch core, which places no
//! constraint on how many wrappers exist.

pub mod keys;
pub mod lists;
pub mod pubsub;
pub mod server;
pub mod strings;
pub mod transactions;
