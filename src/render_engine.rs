//! Render Engine
//!
//! Owns the particle simulation and puts every mutation on one timeline.
//! Feed callbacks, re-seeds and resizes only enqueue commands; the frame
//! loop drains the queue in arrival order, ticks the simulation and hands
//! a detached snapshot to the frame sink.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::models::effects::ClassifiedEvent;
use crate::models::snapshot::SceneSnapshot;
use crate::scene_generator::generate;
use crate::simulation::ParticleSimulation;

/// Logical step per frame, seconds.
pub const FRAME_DT: f64 = 1.0 / 60.0;

#[derive(Debug, Clone)]
pub enum RenderCommand {
    Event(ClassifiedEvent),
    Reseed(String),
    Resize(f64, f64),
}

#[derive(Clone)]
pub struct RenderEngine {
    inner: Arc<Mutex<RenderEngineInner>>,
}

struct RenderEngineInner {
    simulation: ParticleSimulation,
    pending: Vec<RenderCommand>,
    width: f64,
    height: f64,
    frame: u64,
}

impl RenderEngineInner {
    fn apply(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::Event(event) => {
                let effect = self.simulation.apply_event(event.kind, event.magnitude);
                log::debug!(
                    "[render] {} ({:.2}) at node {} [{:?}]",
                    event.kind.as_str(),
                    effect.magnitude,
                    effect.origin_node,
                    event.source
                );
            }
            RenderCommand::Reseed(seed) => {
                let params = generate(&seed);
                log::info!(
                    "[render] reseeded: {} nodes, {} particles, palette {}",
                    params.node_count,
                    params.particle_count,
                    params.palette.name
                );
                self.simulation.init(params, self.width, self.height);
            }
            RenderCommand::Resize(width, height) => {
                self.width = width.max(1.0);
                self.height = height.max(1.0);
                self.simulation.resize(self.width, self.height);
            }
        }
    }
}

impl RenderEngine {
    pub fn new(seed: &str, width: f64, height: f64) -> Self {
        let params = generate(seed);
        let (width, height) = (width.max(1.0), height.max(1.0));
        Self {
            inner: Arc::new(Mutex::new(RenderEngineInner {
                simulation: ParticleSimulation::new(params, width, height),
                pending: Vec::new(),
                width,
                height,
                frame: 0,
            })),
        }
    }

    /// Queue a classified event for the next frame.
    pub fn push_event(&self, event: ClassifiedEvent) {
        self.enqueue(RenderCommand::Event(event));
    }

    /// Regenerate the scene from `seed` on the next frame.
    pub fn reseed(&self, seed: impl Into<String>) {
        self.enqueue(RenderCommand::Reseed(seed.into()));
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.enqueue(RenderCommand::Resize(width, height));
    }

    fn enqueue(&self, command: RenderCommand) {
        let mut guard = self.inner.lock().expect("render engine poisoned");
        guard.pending.push(command);
    }

    /// Run one frame: drain queued commands, tick, snapshot.
    pub fn step(&self, dt: f64) -> (u64, SceneSnapshot) {
        let mut guard = self.inner.lock().expect("render engine poisoned");
        let pending = std::mem::take(&mut guard.pending);
        for command in pending {
            guard.apply(command);
        }
        guard.simulation.tick(dt);
        guard.frame += 1;
        (guard.frame, guard.simulation.snapshot())
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let guard = self.inner.lock().expect("render engine poisoned");
        guard.simulation.snapshot()
    }

    pub fn pending_len(&self) -> usize {
        let guard = self.inner.lock().expect("render engine poisoned");
        guard.pending.len()
    }

    /// Spawn the frame loop. The sink receives `(frame, snapshot)` outside
    /// the engine lock.
    pub fn spawn_render_loop(
        &self,
        frame_interval: Duration,
        sink: impl Fn(u64, SceneSnapshot) + Send + 'static,
    ) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            loop {
                let (frame, snapshot) = engine.step(FRAME_DT);
                sink(frame, snapshot);
                sleep(frame_interval).await;
            }
        })
    }
}
