use std::collections::HashMap;

use logstream::{endpoint_with_key, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::scene_generator::DEFAULT_SEED;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub seed: String,
    pub api_key: Option<String>,
    pub endpoint: String,
    pub width: f64,
    pub height: f64,
    pub frame_interval_ms: u64,
    pub snapshot_every: u64,
    pub run_for_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            width: 1280.0,
            height: 720.0,
            frame_interval_ms: 16,
            snapshot_every: 60,
            run_for_secs: None,
        }
    }
}

impl Settings {
    /// Settings from parsed command-line arguments and their
    /// `LEDGERBLOOM_*` environment fallbacks.
    pub fn from_args(args: &Args) -> Self {
        Self::from_map(&args.to_map())
    }

    /// Build settings from string key/value pairs. Missing or unparsable
    /// values fall back to their defaults.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            seed: non_empty("seed").unwrap_or(defaults.seed),
            api_key: non_empty("api_key"),
            endpoint: non_empty("endpoint").unwrap_or(defaults.endpoint),
            width: map
                .get("width")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .map(|v| v.max(1.0))
                .unwrap_or(defaults.width),
            height: map
                .get("height")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .map(|v| v.max(1.0))
                .unwrap_or(defaults.height),
            frame_interval_ms: map
                .get("frame_interval_ms")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|v| v.max(1))
                .unwrap_or(defaults.frame_interval_ms),
            snapshot_every: map
                .get("snapshot_every")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|v| v.max(1))
                .unwrap_or(defaults.snapshot_every),
            run_for_secs: map
                .get("run_for_secs")
                .and_then(|v| v.trim().parse::<u64>().ok()),
        }
    }

    /// Websocket URL with the credential filled in, or `None` when there is
    /// no credential and the feed should run simulated-only.
    pub fn endpoint_url(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(|key| endpoint_with_key(&self.endpoint, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Settings::from_map(&HashMap::new()), Settings::default());
    }

    #[test]
    fn parses_known_keys() {
        let s = Settings::from_map(&map(&[
            ("seed", "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM"),
            ("api_key", "abc"),
            ("width", "1920"),
            ("height", "1080"),
            ("frame_interval_ms", "33"),
            ("run_for_secs", "10"),
        ]));
        assert_eq!(s.seed, "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");
        assert_eq!(s.api_key.as_deref(), Some("abc"));
        assert_eq!(s.width, 1920.0);
        assert_eq!(s.height, 1080.0);
        assert_eq!(s.frame_interval_ms, 33);
        assert_eq!(s.run_for_secs, Some(10));
    }

    #[test]
    fn bad_values_fall_back() {
        let s = Settings::from_map(&map(&[
            ("width", "wide"),
            ("height", "-5"),
            ("frame_interval_ms", "0"),
            ("api_key", "   "),
        ]));
        assert_eq!(s.width, 1280.0);
        assert_eq!(s.height, 1.0);
        assert_eq!(s.frame_interval_ms, 1);
        assert_eq!(s.api_key, None);
    }

    #[test]
    fn endpoint_needs_credential() {
        let mut s = Settings::default();
        assert_eq!(s.endpoint_url(), None);
        s.api_key = Some("k".into());
        s.endpoint = "wss://node/?api-key={api_key}".into();
        assert_eq!(s.endpoint_url().as_deref(), Some("wss://node/?api-key=k"));
    }
}
