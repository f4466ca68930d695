//! Particle Simulation
//!
//! Owns all mutable scene state: particles, rendered node positions, the
//! clock and the active effect. Every mutating call (`init`, `resize`,
//! `tick`, `apply_event`) must run on a single timeline; the render engine
//! is the only caller in the app.

pub mod particle;

use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::effects::{EventKind, LiveEffect};
use crate::models::scene::SceneParams;
use crate::models::snapshot::{
    ActiveEffectSnapshot, NodeSnapshot, ParticleSnapshot, SceneSnapshot,
};
use crate::seeded_hash::hash_int;
use particle::Particle;

/// Velocity decay applied every tick.
pub const DAMPING: f64 = 0.96;
/// Pull toward the home node, per pixel of separation, scaled by node mass.
pub const ATTRACTION: f64 = 0.0008;
/// Flow-field push at turbulence 1.0, px per tick².
pub const FLOW_STRENGTH: f64 = 0.15;
const FLOW_SCALE: f64 = 0.005;
/// Node drift radius as a fraction of the shorter viewport side.
pub const NODE_DRIFT: f64 = 0.02;
/// Life gained per second of logical time.
pub const LIFE_RATE: f64 = 0.25;
pub const SPAWN_RADIUS: f64 = 30.0;
const SPAWN_SPEED: f64 = 0.5;

pub const WHALE_RADIUS: f64 = 200.0;
pub const WHALE_PULL: f64 = 0.02;
pub const BURN_RADIUS_SQ: f64 = 80.0 * 80.0;
pub const MINT_SPEED: f64 = 1.5;

const SALT_SIM_RNG: i32 = 77;

pub struct ParticleSimulation {
    params: SceneParams,
    width: f64,
    height: f64,
    /// Logical time, seconds.
    time: f64,
    particles: Vec<Particle>,
    /// Pixel positions of nodes at the current time.
    rendered: Vec<[f64; 2]>,
    active_effect: Option<LiveEffect>,
    rng: StdRng,
}

impl ParticleSimulation {
    pub fn new(params: SceneParams, width: f64, height: f64) -> Self {
        let mut sim = Self {
            params,
            width,
            height,
            time: 0.0,
            particles: Vec::new(),
            rendered: Vec::new(),
            active_effect: None,
            rng: StdRng::seed_from_u64(0),
        };
        let params = sim.params.clone();
        sim.init(params, width, height);
        sim
    }

    /// Replace all state with a fresh population for `params`.
    pub fn init(&mut self, params: SceneParams, width: f64, height: f64) {
        let rng_seed = hash_int(&params.seed, SALT_SIM_RNG, 1_000_000) as u64;
        self.rng = StdRng::seed_from_u64(rng_seed);
        self.params = params;
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.time = 0.0;
        self.active_effect = None;
        self.update_rendered_nodes();

        let node_count = self.params.nodes.len();
        let mut particles = Vec::with_capacity(self.params.particle_count);
        for i in 0..self.params.particle_count {
            let home = i % node_count;
            particles.push(spawn_near(
                &mut self.rng,
                self.rendered[home],
                home,
                self.width,
                self.height,
            ));
        }
        self.particles = particles;
    }

    /// Rescale node positions to a new viewport. Particles keep their state.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.update_rendered_nodes();
    }

    /// Advance by one logical step of `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.time += dt;
        self.update_rendered_nodes();

        let Self {
            params,
            particles,
            rendered,
            rng,
            width,
            height,
            time,
            ..
        } = self;
        let flow = FLOW_STRENGTH * params.turbulence;

        for p in particles.iter_mut() {
            let home = rendered[p.home_node];
            let pull = ATTRACTION * params.nodes[p.home_node].mass;
            let angle = flow_angle(p.x, p.y, *time);

            let ax = (home[0] - p.x) * pull + angle.cos() * flow;
            let ay = (home[1] - p.y) * pull + angle.sin() * flow;
            p.vx = (p.vx + ax) * DAMPING;
            p.vy = (p.vy + ay) * DAMPING;
            p.x += p.vx;
            p.y += p.vy;
            p.trail.push([p.x, p.y]);
            p.life += dt * LIFE_RATE;

            if p.expired() || p.outside(*width, *height) {
                *p = spawn_near(rng, home, p.home_node, *width, *height);
            }
        }
    }

    /// Apply a classified event at a randomly chosen node.
    pub fn apply_event(&mut self, kind: EventKind, magnitude: f64) -> LiveEffect {
        let origin_node = self.rng.gen_range(0..self.rendered.len());
        self.apply_event_at(kind, magnitude, origin_node)
    }

    /// Apply a classified event at `origin_node`. The new effect takes over
    /// the visual slot; physics changes happen immediately regardless.
    pub fn apply_event_at(
        &mut self,
        kind: EventKind,
        magnitude: f64,
        origin_node: usize,
    ) -> LiveEffect {
        let origin_node = origin_node % self.rendered.len();
        let magnitude = magnitude.clamp(0.0, 1.0);
        let origin = self.rendered[origin_node];

        match kind {
            EventKind::Whale => {
                for p in self.particles.iter_mut() {
                    if p.distance_sq(origin) < WHALE_RADIUS * WHALE_RADIUS {
                        p.vx += (origin[0] - p.x) * magnitude * WHALE_PULL;
                        p.vy += (origin[1] - p.y) * magnitude * WHALE_PULL;
                    }
                }
            }
            EventKind::Mint => {
                let vx = self.rng.gen_range(-MINT_SPEED..MINT_SPEED);
                let vy = self.rng.gen_range(-MINT_SPEED..MINT_SPEED);
                let max_life = self.rng.gen_range(0.6..1.0);
                self.particles.push(Particle::new(
                    origin[0],
                    origin[1],
                    vx,
                    vy,
                    max_life,
                    origin_node,
                ));
            }
            EventKind::Burn => {
                self.particles
                    .retain(|p| p.distance_sq(origin) >= BURN_RADIUS_SQ);
            }
            EventKind::Tx | EventKind::Mev => {}
        }

        let style = kind.style();
        let effect = LiveEffect {
            kind,
            magnitude,
            origin_node,
            origin,
            start_ms: self.clock_ms(),
            duration_ms: style.duration_ms,
            style,
        };
        self.active_effect = Some(effect.clone());
        effect
    }

    /// Simulation clock in ms.
    pub fn clock_ms(&self) -> f64 {
        self.time * 1000.0
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particle_positions(&self) -> Vec<[f64; 2]> {
        self.particles.iter().map(|p| [p.x, p.y]).collect()
    }

    pub fn node_positions(&self) -> &[[f64; 2]] {
        &self.rendered
    }

    /// The current effect, if it has not yet expired.
    pub fn active_effect(&self) -> Option<&LiveEffect> {
        let now = self.clock_ms();
        self.active_effect.as_ref().filter(|e| e.is_active(now))
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let now = self.clock_ms();
        let palette = &self.params.palette;

        let nodes = self
            .params
            .nodes
            .iter()
            .zip(&self.rendered)
            .map(|(node, pos)| NodeSnapshot {
                x: pos[0],
                y: pos[1],
                mass: node.mass,
                connections: node.connections.clone(),
            })
            .collect();

        let particles = self
            .particles
            .iter()
            .map(|p| ParticleSnapshot {
                x: p.x,
                y: p.y,
                home_node: p.home_node,
                color: palette.color(p.home_node).to_string(),
                age: (p.life / p.max_life).min(1.0),
                trail: p.trail.to_vec(),
            })
            .collect();

        let active_effect = self.active_effect().map(|e| ActiveEffectSnapshot {
            kind: e.kind,
            magnitude: e.magnitude,
            origin_node: e.origin_node,
            origin: e.origin,
            color: e.style.color.clone(),
            size: e.style.size,
            duration_ms: e.duration_ms,
            start_ms: e.start_ms,
            progress: e.progress(now),
        });

        SceneSnapshot {
            seed: self.params.seed.clone(),
            palette: palette.clone(),
            width: self.width,
            height: self.height,
            turbulence: self.params.turbulence,
            time: self.time,
            clock_ms: now,
            nodes,
            particles,
            active_effect,
        }
    }

    fn update_rendered_nodes(&mut self) {
        let now = self.clock_ms();
        let drift = NODE_DRIFT * self.width.min(self.height);
        let (w, h) = (self.width, self.height);
        self.rendered = self
            .params
            .nodes
            .iter()
            .map(|node| {
                let angle = now * node.speed + node.phase;
                [node.x * w + angle.cos() * drift, node.y * h + angle.sin() * drift]
            })
            .collect();
    }
}

/// Flow-field direction at a point, radians. Deterministic in position and time.
fn flow_angle(x: f64, y: f64, time: f64) -> f64 {
    ((x * FLOW_SCALE + time).sin() + (y * FLOW_SCALE - time * 0.7).cos()) * PI
}

fn spawn_near(
    rng: &mut StdRng,
    home: [f64; 2],
    home_node: usize,
    width: f64,
    height: f64,
) -> Particle {
    let angle = rng.gen_range(0.0..TAU);
    let radius = rng.gen_range(0.0..SPAWN_RADIUS);
    let x = (home[0] + angle.cos() * radius).clamp(0.0, width);
    let y = (home[1] + angle.sin() * radius).clamp(0.0, height);
    let vx = rng.gen_range(-SPAWN_SPEED..SPAWN_SPEED);
    let vy = rng.gen_range(-SPAWN_SPEED..SPAWN_SPEED);
    let max_life = rng.gen_range(0.6..1.0);
    Particle::new(x, y, vx, vy, max_life, home_node)
}

#[cfg(test)]
mod tests {
    use super::particle::TRAIL_CAPACITY;
    use super::*;
    use crate::scene_generator::generate;

    const SEED: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

    fn sim() -> ParticleSimulation {
        ParticleSimulation::new(generate(SEED), 1280.0, 720.0)
    }

    #[test]
    fn init_populates_particle_count() {
        let sim = sim();
        assert_eq!(sim.particle_count(), sim.params().particle_count);
        assert!(sim.active_effect().is_none());
    }

    #[test]
    fn init_is_reproducible_for_a_seed() {
        let a = sim().snapshot();
        let b = sim().snapshot();
        assert_eq!(a, b);
    }

    #[test]
    fn reinit_replaces_everything() {
        let mut sim = sim();
        for _ in 0..30 {
            sim.tick(1.0 / 60.0);
        }
        sim.apply_event(EventKind::Mint, 0.5);
        let params = generate("GdnSyH3YtwcxFvQrVVJMm1JhTS4QVX7MFsX56uJLUfiZ");
        let expected = params.particle_count;
        sim.init(params, 800.0, 600.0);
        assert_eq!(sim.particle_count(), expected);
        assert_eq!(sim.clock_ms(), 0.0);
        assert!(sim.active_effect().is_none());
    }

    #[test]
    fn trails_never_exceed_capacity() {
        let mut sim = sim();
        for _ in 0..300 {
            sim.tick(1.0 / 60.0);
            for p in &sim.particles {
                assert!(p.trail.len() <= TRAIL_CAPACITY);
            }
        }
    }

    #[test]
    fn particles_stay_in_viewport_after_tick() {
        let mut sim = sim();
        for _ in 0..240 {
            sim.tick(1.0 / 60.0);
        }
        for [x, y] in sim.particle_positions() {
            assert!((0.0..=1280.0).contains(&x) && (0.0..=720.0).contains(&y));
        }
    }

    #[test]
    fn expired_particles_respawn_with_fresh_life() {
        let mut sim = sim();
        for p in sim.particles.iter_mut() {
            p.life = 5.0;
        }
        sim.tick(1.0 / 60.0);
        for p in &sim.particles {
            assert!(p.life < 1.0);
            assert!(p.trail.is_empty());
        }
    }

    #[test]
    fn nodes_drift_within_bound() {
        let mut sim = sim();
        let drift = NODE_DRIFT * 720.0;
        for _ in 0..120 {
            sim.tick(0.25);
            for (node, pos) in sim.params.nodes.iter().zip(sim.node_positions()) {
                let dx = pos[0] - node.x * 1280.0;
                let dy = pos[1] - node.y * 720.0;
                assert!((dx * dx + dy * dy).sqrt() <= drift + 1e-9);
            }
        }
    }

    #[test]
    fn resize_keeps_particle_state() {
        let mut sim = sim();
        sim.tick(1.0 / 60.0);
        let state = |sim: &ParticleSimulation| -> Vec<_> {
            sim.particles
                .iter()
                .map(|p| (p.x, p.y, p.vx, p.vy, p.life, p.trail.len()))
                .collect()
        };
        let before = state(&sim);
        sim.resize(1920.0, 1080.0);
        assert_eq!(state(&sim), before);
        let node = &sim.params.nodes[0];
        assert!((sim.node_positions()[0][0] - node.x * 1920.0).abs() <= NODE_DRIFT * 1080.0 + 1e-9);
    }

    #[test]
    fn mint_adds_exactly_one_particle() {
        let mut sim = sim();
        let before = sim.particle_count();
        let effect = sim.apply_event(EventKind::Mint, 0.5);
        assert_eq!(sim.particle_count(), before + 1);
        let minted = sim.particles.last().unwrap();
        assert_eq!(minted.home_node, effect.origin_node);
        assert_eq!([minted.x, minted.y], effect.origin);
        assert!(minted.trail.is_empty());
    }

    #[test]
    fn burn_culls_everything_near_origin() {
        let mut sim = sim();
        let node = 3;
        let origin = sim.node_positions()[node];
        // Guarantee something is in range.
        sim.particles[0].x = origin[0] + 10.0;
        sim.particles[0].y = origin[1];
        let before = sim.particle_positions();
        let far: Vec<[f64; 2]> = before
            .iter()
            .copied()
            .filter(|p| {
                let (dx, dy) = (p[0] - origin[0], p[1] - origin[1]);
                dx * dx + dy * dy >= BURN_RADIUS_SQ
            })
            .collect();
        assert!(far.len() < before.len());

        let effect = sim.apply_event_at(EventKind::Burn, 0.5, node);
        assert_eq!(effect.origin, origin);
        assert_eq!(sim.particle_positions(), far);
    }

    #[test]
    fn burn_at_random_origin_culls_within_radius() {
        let mut sim = sim();
        let before = sim.particle_positions();
        let effect = sim.apply_event(EventKind::Burn, 0.5);
        let expected = before
            .iter()
            .filter(|p| {
                let (dx, dy) = (p[0] - effect.origin[0], p[1] - effect.origin[1]);
                dx * dx + dy * dy >= BURN_RADIUS_SQ
            })
            .count();
        assert_eq!(sim.particle_count(), expected);
    }

    #[test]
    fn whale_pulls_nearby_particles_only() {
        let mut sim = sim();
        let node = 0;
        let origin = sim.node_positions()[node];
        for p in sim.particles.iter_mut() {
            p.vx = 0.0;
            p.vy = 0.0;
        }
        sim.particles[0].x = origin[0] + 100.0;
        sim.particles[0].y = origin[1];
        sim.particles[1].x = origin[0] + 300.0;
        sim.particles[1].y = origin[1];

        sim.apply_event_at(EventKind::Whale, 1.0, node);
        assert!((sim.particles[0].vx - (-100.0 * WHALE_PULL)).abs() < 1e-9);
        assert_eq!(sim.particles[0].vy, 0.0);
        assert_eq!(sim.particles[1].vx, 0.0);
    }

    #[test]
    fn tx_and_mev_leave_particles_alone() {
        let mut sim = sim();
        let before = sim.particle_positions();
        sim.apply_event(EventKind::Tx, 0.5);
        sim.apply_event(EventKind::Mev, 0.9);
        assert_eq!(sim.particle_positions(), before);
        assert_eq!(sim.active_effect().map(|e| e.kind), Some(EventKind::Mev));
    }

    #[test]
    fn effect_active_until_duration_elapses() {
        let mut sim = sim();
        sim.apply_event(EventKind::Whale, 0.9); // 2500 ms
        for _ in 0..4 {
            sim.tick(0.5);
            assert!(sim.snapshot().active_effect.is_some());
        }
        sim.tick(0.5);
        assert_eq!(sim.clock_ms(), 2500.0);
        assert!(sim.snapshot().active_effect.is_none());
    }

    #[test]
    fn new_effect_takes_visual_slot() {
        let mut sim = sim();
        sim.apply_event(EventKind::Whale, 0.9);
        sim.tick(0.5);
        let mint = sim.apply_event(EventKind::Mint, 0.5);
        let snap = sim.snapshot();
        let active = snap.active_effect.expect("mint should be active");
        assert_eq!(active.kind, EventKind::Mint);
        assert_eq!(active.start_ms, mint.start_ms);
        assert_eq!(active.progress, 0.0);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut sim = sim();
        let snap = sim.snapshot();
        sim.tick(1.0 / 60.0);
        sim.apply_event(EventKind::Mint, 0.5);
        assert_eq!(snap.particles.len(), sim.params().particle_count);
        assert_eq!(snap.clock_ms, 0.0);
        assert_eq!(snap.nodes.len(), sim.params().node_count);
    }
}
