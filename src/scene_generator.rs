//! Scene Generator
//!
//! Turns a seed string into an immutable [`SceneParams`]. A pure function of
//! the seed: the same seed yields the same scene on every run and platform.
//! Each derived quantity hashes under its own salt so that any one of them
//! can be retuned without reshuffling the others.

use std::f64::consts::TAU;

use crate::models::scene::{Node, Palette, SceneParams, PALETTE_COUNT};
use crate::seeded_hash::{hash, hash_int};

/// Substituted for seeds shorter than [`MIN_SEED_LEN`].
pub const DEFAULT_SEED: &str = "11111111111111111111111111111111";
pub const MIN_SEED_LEN: usize = 8;

pub const MIN_NODES: usize = 12;
pub const NODE_SPREAD: usize = 36; // 12 - 47
pub const MIN_PARTICLES: usize = 40;
pub const PARTICLE_SPREAD: usize = 80; // 40 - 119
pub const MIN_CONNECTIONS: usize = 2;
pub const CONNECTION_SPREAD: usize = 3; // 2 - 4

const SALT_NODE_COUNT: i32 = 1;
const SALT_PALETTE: i32 = 2;
const SALT_PARTICLE_COUNT: i32 = 3;
const SALT_TURBULENCE: i32 = 4;

// Per-node salts are offset by the node index.
const SALT_NODE_X: i32 = 1000;
const SALT_NODE_Y: i32 = 2000;
const SALT_NODE_MASS: i32 = 3000;
const SALT_NODE_SPEED: i32 = 4000;
const SALT_NODE_PHASE: i32 = 5000;

/// The seed that will actually be hashed.
pub fn normalize_seed(seed: &str) -> &str {
    if seed.chars().count() < MIN_SEED_LEN {
        DEFAULT_SEED
    } else {
        seed
    }
}

pub fn generate(seed: &str) -> SceneParams {
    let seed = normalize_seed(seed);

    let node_count = MIN_NODES + hash_int(seed, SALT_NODE_COUNT, NODE_SPREAD);
    let palette = Palette::from_index(hash_int(seed, SALT_PALETTE, PALETTE_COUNT));

    let mut nodes: Vec<Node> = (0..node_count).map(|i| generate_node(seed, i)).collect();
    let connections: Vec<Vec<usize>> = (0..node_count)
        .map(|i| nearest_neighbors(&nodes, i, connection_count(seed, i)))
        .collect();
    for (node, conns) in nodes.iter_mut().zip(connections) {
        node.connections = conns;
    }

    let particle_count = MIN_PARTICLES + hash_int(seed, SALT_PARTICLE_COUNT, PARTICLE_SPREAD);
    let turbulence = 0.3 + hash(seed, SALT_TURBULENCE) * 0.7;

    SceneParams {
        seed: seed.to_string(),
        node_count,
        palette,
        nodes,
        particle_count,
        turbulence,
    }
}

fn generate_node(seed: &str, i: usize) -> Node {
    let key = format!("{seed}{i}");
    let offset = i as i32;
    Node {
        x: hash(&key, SALT_NODE_X + offset),
        y: hash(&key, SALT_NODE_Y + offset),
        mass: 0.3 + hash(&key, SALT_NODE_MASS + offset) * 0.7,
        speed: 0.0002 + hash(&key, SALT_NODE_SPEED + offset) * 0.0008,
        phase: hash(&key, SALT_NODE_PHASE + offset) * TAU,
        connections: Vec::new(),
    }
}

fn connection_count(seed: &str, i: usize) -> usize {
    MIN_CONNECTIONS + hash_int(&format!("{seed}conn{i}"), i as i32, CONNECTION_SPREAD)
}

/// The `count` nodes closest to `nodes[i]`, nearest first, ties by index.
fn nearest_neighbors(nodes: &[Node], i: usize, count: usize) -> Vec<usize> {
    let origin = &nodes[i];
    let mut by_distance: Vec<(usize, f64)> = nodes
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(j, n)| {
            let dx = n.x - origin.x;
            let dy = n.y - origin.y;
            (j, (dx * dx + dy * dy).sqrt())
        })
        .collect();
    // Stable sort keeps ascending index order among equal distances.
    by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
    by_distance.into_iter().take(count).map(|(j, _)| j).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f64, y: f64) -> Node {
        Node {
            x,
            y,
            mass: 0.5,
            speed: 0.0005,
            phase: 0.0,
            connections: Vec::new(),
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let seed = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
        assert_eq!(generate(seed), generate(seed));
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");
        let b = generate("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWN");
        assert_ne!(a.nodes, b.nodes);
    }

    #[test]
    fn short_seeds_use_default() {
        let default = generate(DEFAULT_SEED);
        for seed in ["", "a", "abc1234"] {
            assert_eq!(generate(seed), default, "seed {seed:?}");
        }
        assert_ne!(generate("abc12345"), default);
    }

    #[test]
    fn node_attributes_in_range() {
        let scene = generate("DRpbCBMxVnDK7maPM5tGv6MvB3v1sRMC86PZ8okm21hy");
        assert_eq!(scene.nodes.len(), scene.node_count);
        for node in &scene.nodes {
            assert!((0.0..1.0).contains(&node.x));
            assert!((0.0..1.0).contains(&node.y));
            assert!((0.3..=1.0).contains(&node.mass));
            assert!((0.0002..=0.001).contains(&node.speed));
            assert!((0.0..TAU).contains(&node.phase));
        }
    }

    #[test]
    fn neighbors_sorted_by_distance() {
        let nodes = vec![
            node_at(0.0, 0.0),
            node_at(0.5, 0.0),
            node_at(0.1, 0.0),
            node_at(0.3, 0.0),
        ];
        assert_eq!(nearest_neighbors(&nodes, 0, 3), vec![2, 3, 1]);
        assert_eq!(nearest_neighbors(&nodes, 0, 2), vec![2, 3]);
    }

    #[test]
    fn neighbor_ties_break_by_index() {
        let nodes = vec![
            node_at(0.5, 0.5),
            node_at(0.6, 0.5),
            node_at(0.4, 0.5),
            node_at(0.5, 0.6),
            node_at(0.5, 0.4),
        ];
        assert_eq!(nearest_neighbors(&nodes, 0, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn connections_are_nearest_nodes() {
        let scene = generate("HN7cABqLq46Es1jh92dQQisAq662SmxELLLsHHe4YWrH");
        for (i, node) in scene.nodes.iter().enumerate() {
            assert_eq!(
                node.connections,
                nearest_neighbors(&scene.nodes, i, node.connections.len())
            );
        }
    }
}
