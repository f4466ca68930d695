use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[ts(export, export_to = "feed.ts")]
pub enum FeedConnectionState {
    Disconnected,
    Connecting,
    Live,
    Simulated,
}

/// Read-only feed health, for status indicators.
#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "feed.ts")]
pub struct FeedStats {
    pub connected: bool,
    pub state: FeedConnectionState,
    pub event_count: u64,
    /// Unix ms of the last delivered event.
    pub last_event_ms: Option<i64>,
    pub ms_since_last_event: Option<i64>,
}
