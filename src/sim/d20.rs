//! Holographic d20 roller
//!
//! The die spins fast while a shuffled number flickers, then settles on a
//! final roll. A natural 20 keeps the die spinning and fires bursts of
//! fireworks until the overlay closes.

use glam::{Mat3, Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::particles::ParticleSystem;
use super::timer::{Countdown, Interval};
use crate::Viewport;
use crate::consts::{BURST_INTERVAL, DIE_SIDES, ROLL_DURATION, SHUFFLE_INTERVAL};

/// Golden ratio
pub const PHI: f32 = 1.618_034;

/// Icosahedron vertices centred on the origin
pub const VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

/// Triangular faces as vertex index triples
pub const FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Spin per tick while rolling
const ROLLING_SPIN: Vec3 = Vec3::new(0.05, 0.03, 0.02);
/// Spin kept after a natural 20
const CRITICAL_SPIN: Vec3 = Vec3::new(0.1, 0.1, 0.1);
/// Idle spin after a normal roll
const IDLE_SPIN: Vec3 = Vec3::new(0.005, 0.005, 0.002);

/// Camera distance for the mild perspective
const CAMERA_DISTANCE: f32 = 4.0;
const PERSPECTIVE_STRENGTH: f32 = 0.2;
/// Die radius as a fraction of the smaller viewport side
const DIE_SCALE: f32 = 0.15;

/// Roller state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollPhase {
    Rolling,
    Settled,
    Critical,
}

/// Classification of a finished roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollOutcome {
    CriticalFailure,
    Normal(u8),
    CriticalHit,
}

impl RollOutcome {
    pub fn from_value(value: u8) -> Self {
        match value {
            1 => RollOutcome::CriticalFailure,
            v if v == DIE_SIDES => RollOutcome::CriticalHit,
            v => RollOutcome::Normal(v),
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            RollOutcome::CriticalHit => "CRITICAL HIT!",
            RollOutcome::CriticalFailure => "CRITICAL FAILURE",
            RollOutcome::Normal(_) => "SKILL CHECK PASSED",
        }
    }
}

/// Things that happened during a tick, for audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RollEvents {
    /// Display value changed while shuffling
    pub shuffled: bool,
    /// The roll settled this tick
    pub settled: Option<RollOutcome>,
    /// Firework bursts emitted this tick
    pub bursts: u32,
}

#[derive(Debug, Clone)]
pub struct DiceRoller {
    phase: RollPhase,
    display: u8,
    outcome: Option<RollOutcome>,
    rotation: Vec3,
    spin: Vec3,
    roll_timer: Countdown,
    shuffle: Interval,
    bursts: Interval,
    particles: ParticleSystem,
    viewport: Viewport,
    rng: Pcg32,
}

impl DiceRoller {
    pub fn new(viewport: Viewport, seed: u64, max_particles: usize) -> Self {
        Self {
            phase: RollPhase::Rolling,
            display: 1,
            outcome: None,
            rotation: Vec3::ZERO,
            spin: CRITICAL_SPIN,
            roll_timer: Countdown::new(ROLL_DURATION),
            shuffle: Interval::new(SHUFFLE_INTERVAL),
            bursts: Interval::new(BURST_INTERVAL),
            particles: ParticleSystem::new(max_particles),
            viewport,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> RollPhase {
        self.phase
    }

    /// Number currently shown (shuffling or final)
    pub fn display(&self) -> u8 {
        self.display
    }

    pub fn outcome(&self) -> Option<RollOutcome> {
        self.outcome
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn roll(&mut self) -> u8 {
        self.rng.random_range(1..=DIE_SIDES)
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32) -> RollEvents {
        let mut events = RollEvents::default();

        match self.phase {
            RollPhase::Rolling => {
                self.rotation += ROLLING_SPIN;
                if self.shuffle.tick(dt) > 0 {
                    self.display = self.roll();
                    events.shuffled = true;
                }
                if self.roll_timer.tick(dt) {
                    let value = self.roll();
                    self.settle(value);
                    events.settled = self.outcome;
                    if self.phase == RollPhase::Critical {
                        self.emit_burst();
                        events.bursts += 1;
                    }
                }
            }
            RollPhase::Settled => {
                self.rotation += self.spin;
            }
            RollPhase::Critical => {
                self.rotation += self.spin;
                for _ in 0..self.bursts.tick(dt) {
                    self.emit_burst();
                    events.bursts += 1;
                }
                self.particles.step();
            }
        }

        events
    }

    /// Finish the roll with a known value
    pub fn settle(&mut self, value: u8) {
        let value = value.clamp(1, DIE_SIDES);
        let outcome = RollOutcome::from_value(value);
        self.display = value;
        self.outcome = Some(outcome);
        if outcome == RollOutcome::CriticalHit {
            self.phase = RollPhase::Critical;
            self.spin = CRITICAL_SPIN;
        } else {
            self.phase = RollPhase::Settled;
            self.spin = IDLE_SPIN;
        }
    }

    fn emit_burst(&mut self) {
        let center = self.viewport.center();
        self.particles.burst(center, &mut self.rng);
    }

    /// Rotate a vertex by X, then Y, then Z
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let m = Mat3::from_rotation_z(self.rotation.z)
            * Mat3::from_rotation_y(self.rotation.y)
            * Mat3::from_rotation_x(self.rotation.x);
        m * v
    }

    /// Screen positions of the 12 vertices
    pub fn projected_vertices(&self) -> [Vec2; 12] {
        let scale = self.viewport.width.min(self.viewport.height) * DIE_SCALE;
        let center = self.viewport.center();
        let mut out = [Vec2::ZERO; 12];
        for (slot, v) in out.iter_mut().zip(VERTICES.iter()) {
            let r = self.rotate(Vec3::from_array(*v));
            let z_scale = CAMERA_DISTANCE / (CAMERA_DISTANCE - r.z * PERSPECTIVE_STRENGTH);
            *slot = Vec2::new(r.x, r.y) * scale * z_scale + center;
        }
        out
    }
}
