use std::collections::HashMap;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "ledgerbloom")]
#[command(version, about = "Seed-derived particle scene driven by live chain activity")]
pub struct Args {
    /// Seed string, typically a wallet address
    #[arg(env = "LEDGERBLOOM_SEED")]
    pub seed: Option<String>,

    /// Feed credential; without it the feed runs simulated-only
    #[arg(long, env = "LEDGERBLOOM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Websocket endpoint template, `{api_key}` is substituted
    #[arg(long, env = "LEDGERBLOOM_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Viewport width in pixels
    #[arg(long, env = "LEDGERBLOOM_WIDTH")]
    pub width: Option<f64>,

    /// Viewport height in pixels
    #[arg(long, env = "LEDGERBLOOM_HEIGHT")]
    pub height: Option<f64>,

    #[arg(long, env = "LEDGERBLOOM_FRAME_INTERVAL_MS")]
    pub frame_interval_ms: Option<u64>,

    /// Log a frame summary every N frames
    #[arg(long, env = "LEDGERBLOOM_SNAPSHOT_EVERY")]
    pub snapshot_every: Option<u64>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long, env = "LEDGERBLOOM_RUN_FOR_SECS")]
    pub run_for_secs: Option<u64>,
}

impl Args {
    /// Key/value pairs for [`crate::Settings::from_map`]. Unset options are
    /// left out so their defaults apply.
    pub fn to_map(&self) -> HashMap<String, String> {
        let pairs = [
            ("seed", self.seed.clone()),
            ("api_key", self.api_key.clone()),
            ("endpoint", self.endpoint.clone()),
            ("width", self.width.map(|v| v.to_string())),
            ("height", self.height.map(|v| v.to_string())),
            ("frame_interval_ms", self.frame_interval_ms.map(|v| v.to_string())),
            ("snapshot_every", self.snapshot_every.map(|v| v.to_string())),
            ("run_for_secs", self.run_for_secs.map(|v| v.to_string())),
        ];
        pairs
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
            .collect()
    }
}
