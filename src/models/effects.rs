use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Event taxonomy shared by the classifier, the simulator and the scene.
#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "effects.ts")]
pub enum EventKind {
    Tx,
    Whale,
    Mev,
    Mint,
    Burn,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Tx,
        EventKind::Whale,
        EventKind::Mev,
        EventKind::Mint,
        EventKind::Burn,
    ];

    /// Visual style for this kind. Built fresh on every call.
    pub fn style(self) -> EffectStyle {
        let (color, size, duration_ms) = match self {
            EventKind::Tx => ("#7dd3fc", 6.0, 800.0),
            EventKind::Whale => ("#f472b6", 28.0, 2500.0),
            EventKind::Mev => ("#facc15", 14.0, 1200.0),
            EventKind::Mint => ("#4ade80", 10.0, 1500.0),
            EventKind::Burn => ("#f87171", 18.0, 1500.0),
        };
        EffectStyle {
            color: color.to_string(),
            size,
            duration_ms,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Tx => "tx",
            EventKind::Whale => "whale",
            EventKind::Mev => "mev",
            EventKind::Mint => "mint",
            EventKind::Burn => "burn",
        }
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "effects.ts")]
pub struct EffectStyle {
    pub color: String,
    pub size: f64,
    pub duration_ms: f64,
}

/// Classifier output: what happened and how strongly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub kind: EventKind,
    pub magnitude: f64, // 0.0 - 1.0
}

#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "effects.ts")]
pub enum EventSource {
    Live,
    Simulated,
}

/// An event as delivered by the feed to its single consumer.
#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "effects.ts")]
pub struct ClassifiedEvent {
    pub kind: EventKind,
    pub magnitude: f64,
    /// Transaction signature, or a generated id for simulated events.
    pub signature: String,
    pub source: EventSource,
    /// Wall-clock delivery time, unix ms.
    pub timestamp_ms: i64,
}

/// An event once it has been applied to the scene.
#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "effects.ts")]
pub struct LiveEffect {
    pub kind: EventKind,
    pub magnitude: f64,
    pub origin_node: usize,
    /// Pixel position of the origin node at apply time.
    pub origin: [f64; 2],
    /// Simulation clock at apply time, ms.
    pub start_ms: f64,
    pub duration_ms: f64,
    pub style: EffectStyle,
}

impl LiveEffect {
    /// Visually active iff `now - start < duration`.
    pub fn is_active(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms < self.duration_ms
    }

    /// Elapsed fraction of the effect's lifetime, clamped to `[0, 1]`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_are_independent_values() {
        let mut a = EventKind::Whale.style();
        a.color.push_str("ff");
        a.size = 0.0;
        let b = EventKind::Whale.style();
        assert_eq!(b.color, "#f472b6");
        assert_eq!(b.size, 28.0);
    }

    #[test]
    fn every_kind_has_a_positive_duration() {
        for kind in EventKind::ALL {
            assert!(kind.style().duration_ms > 0.0, "{}", kind.as_str());
        }
    }

    #[test]
    fn effect_expires_at_duration() {
        let effect = LiveEffect {
            kind: EventKind::Tx,
            magnitude: 0.5,
            origin_node: 0,
            origin: [0.0, 0.0],
            start_ms: 1000.0,
            duration_ms: 800.0,
            style: EventKind::Tx.style(),
        };
        assert!(effect.is_active(1000.0));
        assert!(effect.is_active(1799.0));
        assert!(!effect.is_active(1800.0));
        assert_eq!(effect.progress(1400.0), 0.5);
        assert_eq!(effect.progress(5000.0), 1.0);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&EventKind::Mev).unwrap(), "\"mev\"");
    }
}
