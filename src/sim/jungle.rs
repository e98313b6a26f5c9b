//! Jungle takeover: swinging vines, bushes and falling leaves

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::keyframes::{Ease, Repeat, Track};
use super::saber::Spring;
use crate::Viewport;

pub const LEAF_COUNT: usize = 15;

const VINE_SWING: f32 = 5.0;
const VINE_GROW_TIME: f32 = 1.5;
const BUSH_SPRING: Spring = Spring::new(170.0, 12.0, 1.0);
const BUSH_DROP: f32 = 200.0;
const BUSH_REST: f32 = 20.0;
const LEAF_OVERSHOOT: f32 = 100.0;
const LEAF_START_Y: f32 = -50.0;
const SUBSTEP: f32 = 1.0 / 240.0;

/// Vine colours, darkest first
pub const VINE_COLORS: [[f32; 3]; 4] = [
    [0.024, 0.306, 0.231],
    [0.024, 0.373, 0.275],
    [0.016, 0.471, 0.341],
    [0.020, 0.588, 0.412],
];

pub const LEAF_COLOR: [f32; 3] = [0.063, 0.725, 0.506];

#[derive(Debug, Clone)]
pub struct Vine {
    /// Anchor x as a fraction of viewport width
    pub anchor: f32,
    /// Length as a fraction of viewport height
    pub length: f32,
    pub thickness: f32,
    pub color: [f32; 3],
    grow_delay: f32,
    swing: Track,
}

/// Snapshot of a vine for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VinePose {
    pub anchor: Vec2,
    /// Visible length in pixels
    pub length: f32,
    /// Degrees from vertical
    pub angle: f32,
}

impl Vine {
    fn new(stagger: f32, swing_secs: f32, length: f32, thickness: f32, color: [f32; 3]) -> Self {
        Self {
            anchor: stagger * 0.2,
            length,
            thickness,
            color,
            grow_delay: stagger * 0.2,
            swing: Track::new(&[-VINE_SWING, VINE_SWING], swing_secs)
                .eased(Ease::InOut)
                .repeating(Repeat::Mirror),
        }
    }

    pub fn pose(&self, elapsed: f32, viewport: Viewport) -> VinePose {
        let grow = ((elapsed - self.grow_delay) / VINE_GROW_TIME).clamp(0.0, 1.0);
        VinePose {
            anchor: Vec2::new(self.anchor * viewport.width, 0.0),
            length: crate::ease_out(grow) * self.length * viewport.height,
            angle: self.swing.sample(elapsed),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bush {
    /// Left edge as a fraction of viewport width
    pub left: f32,
    /// Width as a fraction of viewport width
    pub width: f32,
    pub mirrored: bool,
    pub color: [f32; 3],
    /// Vertical offset from the resting position, pixels
    pub offset: f32,
    velocity: f32,
}

impl Bush {
    fn new(left: f32, width: f32, mirrored: bool, color: [f32; 3]) -> Self {
        Self {
            left,
            width,
            mirrored,
            color,
            offset: BUSH_DROP,
            velocity: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub start_x: f32,
    pub end_x: f32,
    /// Degrees of spin per fall
    pub spin: f32,
    pub duration: f32,
    pub delay: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafPose {
    pub pos: Vec2,
    pub rotation: f32,
    pub opacity: f32,
}

impl Leaf {
    fn spawn(rng: &mut Pcg32, viewport: Viewport) -> Self {
        Self {
            start_x: rng.random::<f32>() * viewport.width,
            end_x: rng.random::<f32>() * viewport.width + (rng.random::<f32>() - 0.5) * 300.0,
            spin: 360.0 + rng.random::<f32>() * 360.0,
            duration: 8.0 + rng.random::<f32>() * 7.0,
            delay: rng.random::<f32>() * 5.0,
        }
    }

    /// Pose at `elapsed`; `None` before the first delay has passed
    pub fn pose(&self, elapsed: f32, viewport: Viewport) -> Option<LeafPose> {
        let local = elapsed - self.delay;
        if local < 0.0 {
            return None;
        }
        let t = (local / self.duration).fract();
        let fade = Track::new(&[0.0, 1.0, 1.0, 0.0], 1.0);
        Some(LeafPose {
            pos: Vec2::new(
                crate::lerp(self.start_x, self.end_x, t),
                crate::lerp(LEAF_START_Y, viewport.height + LEAF_OVERSHOOT, t),
            ),
            rotation: self.spin * t,
            opacity: fade.sample(t),
        })
    }
}

#[derive(Debug, Clone)]
pub struct JungleScene {
    elapsed: f32,
    viewport: Viewport,
    vines: Vec<Vine>,
    bushes: Vec<Bush>,
    leaves: Vec<Leaf>,
}

impl JungleScene {
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let vines = vec![
            Vine::new(0.2, 4.0, 0.70, 10.0, VINE_COLORS[0]),
            Vine::new(1.5, 5.0, 0.50, 8.0, VINE_COLORS[1]),
            Vine::new(3.2, 6.0, 0.85, 12.0, VINE_COLORS[2]),
            Vine::new(4.8, 4.5, 0.40, 6.0, VINE_COLORS[3]),
        ];
        let bushes = vec![
            Bush::new(-0.05, 0.4, false, VINE_COLORS[0]),
            Bush::new(0.65, 0.4, true, VINE_COLORS[1]),
            Bush::new(0.30, 0.3, false, VINE_COLORS[2]),
        ];
        let leaves = (0..LEAF_COUNT).map(|_| Leaf::spawn(&mut rng, viewport)).collect();

        Self {
            elapsed: 0.0,
            viewport,
            vines,
            bushes,
            leaves,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn vines(&self) -> &[Vine] {
        &self.vines
    }

    pub fn bushes(&self) -> &[Bush] {
        &self.bushes
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Resting bush offset (bushes overshoot the bottom edge slightly)
    pub fn bush_rest(&self) -> f32 {
        BUSH_REST
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(SUBSTEP);
            for bush in &mut self.bushes {
                BUSH_SPRING.step(&mut bush.offset, &mut bush.velocity, BUSH_REST, h);
            }
            remaining -= h;
        }
    }
}
