//! Websocket client for a Solana-style `logsSubscribe` feed.
//!
//! The crate only speaks the wire protocol: open a socket, subscribe, and
//! yield the log lines of each transaction. Classification and reconnect
//! policy belong to the consumer.

pub mod connection;
pub mod protocol;
pub mod types;

pub use connection::LogStream;
pub use protocol::{build_logs_subscribe, parse_message, ParseError};
pub use types::{endpoint_with_key, FeedMessage, RawLogs, DEFAULT_ENDPOINT};
