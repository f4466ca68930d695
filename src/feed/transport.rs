use anyhow::Result;
use async_trait::async_trait;
use logstream::{LogStream, RawLogs};

/// Opens connections to a live event source.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn FeedConnection>>;
}

/// One open connection to a live event source.
#[async_trait]
pub trait FeedConnection: Send {
    /// Ask the source to start streaming events.
    async fn subscribe(&mut self) -> Result<()>;

    /// Next well-formed message. `Ok(None)` means the peer closed.
    async fn next_message(&mut self) -> Result<Option<RawLogs>>;
}

/// Websocket `logsSubscribe` transport.
pub struct WsTransport {
    url: String,
}

impl WsTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl FeedTransport for WsTransport {
    async fn connect(&self) -> Result<Box<dyn FeedConnection>> {
        let stream = LogStream::connect(&self.url).await?;
        Ok(Box::new(stream))
    }
}

#[async_trait]
impl FeedConnection for LogStream {
    async fn subscribe(&mut self) -> Result<()> {
        LogStream::subscribe(self).await
    }

    async fn next_message(&mut self) -> Result<Option<RawLogs>> {
        self.next_logs().await
    }
}
