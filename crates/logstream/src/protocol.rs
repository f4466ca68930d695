use serde_json::{json, Value};
use std::fmt;

use crate::types::*;

/// Error produced when a frame cannot be decoded into a [`FeedMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed feed message: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Build a `logsSubscribe` request for every transaction.
pub fn build_logs_subscribe(id: u64) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": METHOD_LOGS_SUBSCRIBE,
        "params": [LOGS_FILTER_ALL, { "commitment": COMMITMENT }],
    })
    .to_string()
}

/// Decode one text frame.
///
/// Notification shape:
///   {"method":"logsNotification","params":{"result":{"value":{"signature","err","logs"}}}}
/// Subscription reply shape:
///   {"id":N,"result":SUB_ID}
pub fn parse_message(text: &str) -> Result<FeedMessage, ParseError> {
    let root: Value =
        serde_json::from_str(text).map_err(|e| ParseError(format!("invalid json: {e}")))?;

    if let Some(method) = root.get("method").and_then(|m| m.as_str()) {
        if method != METHOD_LOGS_NOTIFICATION {
            return Ok(FeedMessage::Other);
        }
        let value = root
            .pointer("/params/result/value")
            .ok_or_else(|| ParseError("notification without params.result.value".into()))?;
        return parse_logs_value(value).map(FeedMessage::Logs);
    }

    if let (Some(id), Some(subscription)) = (
        root.get("id").and_then(|v| v.as_u64()),
        root.get("result").and_then(|v| v.as_u64()),
    ) {
        return Ok(FeedMessage::SubscriptionAck { id, subscription });
    }

    Ok(FeedMessage::Other)
}

fn parse_logs_value(value: &Value) -> Result<RawLogs, ParseError> {
    let signature = value
        .get("signature")
        .and_then(|s| s.as_str())
        .ok_or_else(|| ParseError("missing signature".into()))?
        .to_string();

    let logs = value
        .get("logs")
        .and_then(|l| l.as_array())
        .ok_or_else(|| ParseError("missing logs".into()))?
        .iter()
        .filter_map(|line| line.as_str().map(str::to_string))
        .collect();

    let failed = value.get("err").map(|e| !e.is_null()).unwrap_or(false);

    Ok(RawLogs {
        signature,
        logs,
        failed,
    })
}
