use anyhow::{anyhow, Context, Result};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::protocol::{build_logs_subscribe, parse_message};
use crate::types::*;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A live websocket connection streaming transaction logs.
pub struct LogStream {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    next_request_id: u64,
    subscription: Option<u64>,
}

impl LogStream {
    /// Open the websocket. Does not subscribe yet.
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws_stream, _) = timeout(Duration::from_millis(CONNECT_TIMEOUT_MS), connect_async(url))
            .await
            .map_err(|_| anyhow!("websocket connect timed out"))?
            .with_context(|| format!("failed to connect to websocket {}", redact(url)))?;

        log::info!("[logstream] connected to {}", redact(url));
        let (sink, stream) = ws_stream.split();
        Ok(Self {
            sink,
            stream,
            next_request_id: 1,
            subscription: None,
        })
    }

    /// Send the `logsSubscribe` request.
    pub async fn subscribe(&mut self) -> Result<()> {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.sink
            .send(Message::Text(build_logs_subscribe(id)))
            .await
            .context("failed to send logsSubscribe")?;
        log::debug!("[logstream] logsSubscribe sent (id={id})");
        Ok(())
    }

    /// Subscription id assigned by the node, once acknowledged.
    pub fn subscription(&self) -> Option<u64> {
        self.subscription
    }

    /// Wait for the next well-formed logs payload.
    ///
    /// Malformed frames are skipped. Returns `Ok(None)` when the peer closes
    /// the connection and `Err` on transport failure.
    pub async fn next_logs(&mut self) -> Result<Option<RawLogs>> {
        while let Some(item) = self.stream.next().await {
            let msg = item.context("websocket receive failed")?;
            let text = match msg {
                Message::Text(text) => text,
                Message::Binary(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(_) => {
                        log::debug!("[logstream] skipping non-utf8 binary frame");
                        continue;
                    }
                },
                Message::Ping(payload) => {
                    self.sink
                        .send(Message::Pong(payload))
                        .await
                        .context("failed to answer ping")?;
                    continue;
                }
                Message::Close(frame) => {
                    log::info!("[logstream] server closed connection: {frame:?}");
                    return Ok(None);
                }
                _ => continue,
            };

            match parse_message(&text) {
                Ok(FeedMessage::Logs(raw)) => return Ok(Some(raw)),
                Ok(FeedMessage::SubscriptionAck { id, subscription }) => {
                    log::info!("[logstream] subscription {subscription} active (request {id})");
                    self.subscription = Some(subscription);
                }
                Ok(FeedMessage::Other) => {}
                Err(e) => log::debug!("[logstream] {e}"),
            }
        }
        Ok(None)
    }

    /// Close the websocket. Errors are ignored; the peer may already be gone.
    pub async fn close(mut self) {
        let _ = self.sink.send(Message::Close(None)).await;
    }
}

/// Strip the query string so credentials never reach the logs.
pub fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
