/// Endpoint template used when no explicit endpoint is configured.
/// `{api_key}` is replaced with the feed credential.
pub const DEFAULT_ENDPOINT: &str = "wss://mainnet.helius-rpc.com/?api-key={api_key}";

/// Placeholder substituted with the credential in endpoint templates.
pub const API_KEY_PLACEHOLDER: &str = "{api_key}";

/// JSON-RPC method names.
pub const METHOD_LOGS_SUBSCRIBE: &str = "logsSubscribe";
pub const METHOD_LOGS_NOTIFICATION: &str = "logsNotification";

/// Subscription filter and commitment level requested from the node.
pub const LOGS_FILTER_ALL: &str = "all";
pub const COMMITMENT: &str = "confirmed";

/// Timeouts.
pub const CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Log payload for one transaction, as delivered by a `logsNotification`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLogs {
    /// Transaction signature (opaque identifier).
    pub signature: String,
    /// Program log lines, in execution order.
    pub logs: Vec<String>,
    /// Whether the transaction failed on-chain.
    pub failed: bool,
}

/// A decoded text frame from the node.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// Reply to our `logsSubscribe` request.
    SubscriptionAck { id: u64, subscription: u64 },
    /// A logs notification for one transaction.
    Logs(RawLogs),
    /// Anything else (heartbeats, replies to other requests).
    Other,
}

/// Substitute the credential into an endpoint template.
/// Templates without the placeholder are returned unchanged.
pub fn endpoint_with_key(template: &str, api_key: &str) -> String {
    template.replace(API_KEY_PLACEHOLDER, api_key)
}
