//! Raining cats: gravity, ground bounce and wall reflection
//!
//! Bodies that come to rest on the ground are recycled above the viewport,
//! so the rain never runs dry.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Viewport;
use crate::consts::{BODY_COUNT, BODY_GRAVITY, BODY_GROUND_MARGIN, BODY_RESTITUTION};

/// Number of distinct glyph sprites
pub const GLYPH_COUNT: usize = 9;

const GROUND_FRICTION: f32 = 0.95;
const SPIN_FRICTION: f32 = 0.9;
/// Below these speeds a grounded body counts as resting
const REST_VY: f32 = 1.0;
const REST_VX: f32 = 0.5;
/// Recycled bodies re-enter here
const RESPAWN_Y: f32 = -50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FallingBody {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees
    pub rotation: f32,
    pub angular_velocity: f32,
    pub glyph: usize,
    pub scale: f32,
}

impl FallingBody {
    fn spawn(rng: &mut Pcg32, viewport: Viewport) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * viewport.width,
                rng.random::<f32>() * -viewport.height,
            ),
            vel: Vec2::new((rng.random::<f32>() - 0.5) * 10.0, rng.random::<f32>() * 5.0),
            rotation: rng.random::<f32>() * 360.0,
            angular_velocity: (rng.random::<f32>() - 0.5) * 15.0,
            glyph: rng.random_range(0..GLYPH_COUNT),
            scale: 0.5 + rng.random::<f32>() * 1.5,
        }
    }

    /// One physics tick; returns true if the body was recycled
    pub fn update(&mut self, viewport: Viewport, rng: &mut Pcg32) -> bool {
        self.vel.y += BODY_GRAVITY;
        self.pos += self.vel;
        self.rotation += self.angular_velocity;

        let mut recycled = false;
        let ground = viewport.height - BODY_GROUND_MARGIN;
        if self.pos.y >= ground {
            self.pos.y = ground;
            self.vel.y *= -BODY_RESTITUTION;
            self.vel.x *= GROUND_FRICTION;
            self.angular_velocity *= SPIN_FRICTION;

            if self.vel.y.abs() < REST_VY && self.vel.x.abs() < REST_VX {
                self.pos = Vec2::new(rng.random::<f32>() * viewport.width, RESPAWN_Y);
                self.vel = Vec2::new((rng.random::<f32>() - 0.5) * 10.0, 0.0);
                recycled = true;
            }
        }

        // Only reflect when heading out, so a body past the wall can't jitter in place
        let right = viewport.width - BODY_GROUND_MARGIN;
        if (self.pos.x <= 0.0 && self.vel.x < 0.0) || (self.pos.x >= right && self.vel.x > 0.0) {
            self.vel.x = -self.vel.x;
        }

        recycled
    }
}

#[derive(Debug, Clone)]
pub struct CatRain {
    bodies: Vec<FallingBody>,
    viewport: Viewport,
    rng: Pcg32,
    recycled: u64,
}

impl CatRain {
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        Self::with_count(BODY_COUNT, viewport, seed)
    }

    pub fn with_count(count: usize, viewport: Viewport, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bodies = (0..count).map(|_| FallingBody::spawn(&mut rng, viewport)).collect();
        Self {
            bodies,
            viewport,
            rng,
            recycled: 0,
        }
    }

    pub fn bodies(&self) -> &[FallingBody] {
        &self.bodies
    }

    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn step(&mut self) {
        for body in &mut self.bodies {
            if body.update(self.viewport, &mut self.rng) {
                self.recycled += 1;
            }
        }
    }
}
