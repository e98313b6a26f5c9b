//! Firework particle bursts

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{PARTICLE_DRAG, PARTICLE_FADE, PARTICLE_GRAVITY};

/// Burst colours (red, amber, emerald, blue)
pub const BURST_COLORS: [[f32; 3]; 4] = [
    [0.937, 0.267, 0.267],
    [0.961, 0.620, 0.043],
    [0.063, 0.725, 0.506],
    [0.231, 0.510, 0.965],
];

/// Particles per burst
pub const BURST_MIN: usize = 20;
pub const BURST_MAX: usize = 50;

/// Burst centres scatter this far from the requested origin
pub const BURST_SCATTER: f32 = 200.0;

/// A single firework spark
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 when spawned, removed once it reaches 0
    pub alpha: f32,
    pub color: [f32; 3],
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.vel.x *= PARTICLE_DRAG;
        self.alpha -= PARTICLE_FADE;
    }

    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Live set of sparks owned by one overlay
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    capacity: usize,
    spawned: u64,
    removed: u64,
}

impl ParticleSystem {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(1024)),
            capacity,
            spawned: 0,
            removed: 0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn removed(&self) -> u64 {
        self.removed
    }

    /// Emit one burst around `origin`; returns how many sparks were added
    pub fn burst(&mut self, origin: Vec2, rng: &mut Pcg32) -> usize {
        let color = BURST_COLORS[rng.random_range(0..BURST_COLORS.len())];
        let center = origin
            + Vec2::new(
                (rng.random::<f32>() - 0.5) * BURST_SCATTER,
                (rng.random::<f32>() - 0.5) * BURST_SCATTER,
            );

        let wanted = rng.random_range(BURST_MIN..=BURST_MAX);
        let room = self.capacity.saturating_sub(self.particles.len());
        let count = wanted.min(room);

        for _ in 0..count {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = rng.random::<f32>() * 4.0 + 2.0;
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                alpha: 1.0,
                color,
            });
        }
        self.spawned += count as u64;
        count
    }

    /// Advance every spark and drop the faded ones; returns how many were removed
    pub fn step(&mut self) -> usize {
        for p in &mut self.particles {
            p.update();
        }
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_dead());
        let removed = before - self.particles.len();
        self.removed += removed as u64;
        removed
    }
}
