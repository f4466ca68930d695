use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::effects::EventKind;
use super::scene::Palette;

/// One frame's worth of scene state, detached from the simulation.
#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "snapshot.ts")]
pub struct SceneSnapshot {
    pub seed: String,
    pub palette: Palette,
    pub width: f64,
    pub height: f64,
    pub turbulence: f64,
    /// Logical time, seconds.
    pub time: f64,
    /// Simulation clock, ms.
    pub clock_ms: f64,
    pub nodes: Vec<NodeSnapshot>,
    pub particles: Vec<ParticleSnapshot>,
    pub active_effect: Option<ActiveEffectSnapshot>,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "snapshot.ts")]
pub struct NodeSnapshot {
    /// Rendered pixel position (drifted).
    pub x: f64,
    pub y: f64,
    pub mass: f64,
    pub connections: Vec<usize>,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "snapshot.ts")]
pub struct ParticleSnapshot {
    pub x: f64,
    pub y: f64,
    pub home_node: usize,
    pub color: String,
    /// `life / max_life`, 0 at spawn.
    pub age: f64,
    /// Oldest first.
    pub trail: Vec<[f64; 2]>,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "snapshot.ts")]
pub struct ActiveEffectSnapshot {
    pub kind: EventKind,
    pub magnitude: f64,
    pub origin_node: usize,
    pub origin: [f64; 2],
    pub color: String,
    pub size: f64,
    pub duration_ms: f64,
    pub start_ms: f64,
    /// Elapsed fraction, 0 - 1.
    pub progress: f64,
}
