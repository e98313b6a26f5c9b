//! Portfolio FX - procedural easter-egg overlays for a portfolio site
//!
//! Core modules:
//! - `sim`: Per-overlay simulations (fire, starfield, d20, falling bodies, ...)
//! - `gesture`: Key-sequence and click-count trigger detection
//! - `overlay`: Overlay lifecycle (controller) and the single state owner (director)
//! - `renderer`: Raster presenter and WebGPU pipeline
//! - `audio`: Audio handles owned by overlays
//! - `settings`: Persisted user preferences

pub mod audio;
pub mod gesture;
pub mod overlay;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use gesture::{ClickCounter, GestureDetector, Trigger};
pub use overlay::{ActiveOverlay, EffectKind, OverlayDirector};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Tuning constants shared across overlays
pub mod consts {
    /// Nominal frame time (the simulations advance one step per frame)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Frame deltas are clamped to this to survive tab switches
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Fire grid resolution (low-res, stretched to the viewport)
    pub const FIRE_WIDTH: usize = 60;
    pub const FIRE_HEIGHT: usize = 40;
    /// Per-tick wind smoothing factor
    pub const WIND_SMOOTHING: f32 = 0.05;
    /// Wind target at the screen edges (cells per tick)
    pub const MAX_WIND: f32 = 1.5;

    /// Hyperspace defaults
    pub const STAR_COUNT: usize = 800;
    pub const STAR_START_SPEED: f32 = 20.0;
    pub const STAR_MAX_SPEED: f32 = 60.0;
    pub const STAR_ACCELERATION: f32 = 0.2;

    /// Dice timings (seconds)
    pub const DIE_SIDES: u8 = 20;
    pub const ROLL_DURATION: f32 = 1.5;
    pub const SHUFFLE_INTERVAL: f32 = 0.05;
    pub const BURST_INTERVAL: f32 = 0.4;

    /// Firework particle physics (per tick)
    pub const PARTICLE_GRAVITY: f32 = 0.05;
    pub const PARTICLE_DRAG: f32 = 0.99;
    pub const PARTICLE_FADE: f32 = 0.02;

    /// Falling body physics (per tick)
    pub const BODY_COUNT: usize = 30;
    pub const BODY_GRAVITY: f32 = 0.4;
    pub const BODY_RESTITUTION: f32 = 0.7;
    /// Distance between the ground line and the bottom of the viewport
    pub const BODY_GROUND_MARGIN: f32 = 50.0;

    /// Overlay auto-close timeouts (seconds)
    pub const GOAT_DURATION: f32 = 5.0;
    pub const DRAGON_DURATION: f32 = 5.5;

    /// Clicks on the skills title that engage hyperspace
    pub const HYPERSPACE_CLICKS: u32 = 5;
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Map a pointer x coordinate to [-1, 1]
    pub fn normalized_x(&self, x: f32) -> f32 {
        if self.width <= 0.0 {
            return 0.0;
        }
        (x / self.width) * 2.0 - 1.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic ease-in-out on [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Quadratic ease-out on [0, 1]
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}
