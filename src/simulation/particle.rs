use std::collections::VecDeque;

pub const TRAIL_CAPACITY: usize = 18;

/// Fixed-capacity position history; the oldest entry is evicted first.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<[f64; 2]>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_CAPACITY),
        }
    }

    pub fn push(&mut self, point: [f64; 2]) {
        if self.points.len() == TRAIL_CAPACITY {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest first.
    pub fn to_vec(&self) -> Vec<[f64; 2]> {
        self.points.iter().copied().collect()
    }
}

/// A particle orbiting its home node. Pixel space.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: f64,
    pub max_life: f64, // 0.6 - 1.0
    pub home_node: usize,
    pub trail: Trail,
}

impl Particle {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64, max_life: f64, home_node: usize) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            life: 0.0,
            max_life,
            home_node,
            trail: Trail::new(),
        }
    }

    pub fn expired(&self) -> bool {
        self.life > self.max_life
    }

    pub fn outside(&self, width: f64, height: f64) -> bool {
        self.x < 0.0 || self.x > width || self.y < 0.0 || self.y > height
    }

    pub fn distance_sq(&self, point: [f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}
