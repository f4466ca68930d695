use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Color sets a scene can draw from. Index is seed-derived.
const PALETTES: [(&str, [&str; 3]); 4] = [
    ("ember", ["#ff6b35", "#f7c59f", "#efefd0"]),
    ("tide", ["#0b3954", "#087e8b", "#bfd7ea"]),
    ("aurora", ["#7400b8", "#5390d9", "#72efdd"]),
    ("void", ["#1b1b1e", "#a9a9b3", "#f4f4f9"]),
];

pub const PALETTE_COUNT: usize = PALETTES.len();

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "scene.ts")]
pub struct Palette {
    pub index: usize,
    pub name: String,
    pub colors: [String; 3],
}

impl Palette {
    /// Build the palette at `index` (wraps modulo the palette count).
    /// Each call returns a fresh value; nothing is shared.
    pub fn from_index(index: usize) -> Self {
        let index = index % PALETTE_COUNT;
        let (name, colors) = PALETTES[index];
        Self {
            index,
            name: name.to_string(),
            colors: colors.map(str::to_string),
        }
    }

    pub fn color(&self, i: usize) -> &str {
        &self.colors[i % 3]
    }
}

/// A fixed point in the scene graph. Positions are normalized to `[0, 1)`.
#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "scene.ts")]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub mass: f64,  // 0.3 - 1.0
    pub speed: f64, // angular drift per ms, 0.0002 - 0.001
    pub phase: f64, // 0 - 2π
    /// Nearest other nodes, closest first.
    pub connections: Vec<usize>,
}

/// Everything derived from a seed. Immutable once generated.
#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "scene.ts")]
pub struct SceneParams {
    /// The seed actually hashed (after short-seed substitution).
    pub seed: String,
    pub node_count: usize,
    pub palette: Palette,
    pub nodes: Vec<Node>,
    pub particle_count: usize,
    pub turbulence: f64,
}
