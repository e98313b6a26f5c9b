//! Themed pointer trail
//!
//! Each pointer move (throttled) drops a symbol that drifts away, grows,
//! spins a quarter turn and fades out.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::ease_out;

/// Minimum time between spawns (seconds)
pub const SPAWN_THROTTLE: f64 = 0.015;
/// Older symbols kept when a new one spawns
pub const TRAIL_KEEP: usize = 50;
/// Animation length (seconds)
pub const SYMBOL_LIFETIME: f32 = 1.2;

const SPAWN_JITTER: f32 = 20.0;
const DRIFT_SPEED: f32 = 4.0;
const DRIFT_GAIN: f32 = 30.0;
const RISE: f32 = 50.0;

/// Shapes the presenter knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Note,
    DoubleNote,
    Atom,
    Flask,
    Helix,
    Sigma,
    Infinity,
    Plus,
    Star,
    Planet,
    Comet,
    Sparkle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailTheme {
    Music,
    Science,
    Math,
    Astronomy,
}

impl TrailTheme {
    pub fn glyphs(&self) -> &'static [Glyph] {
        use Glyph::*;
        match self {
            TrailTheme::Music => &[Note, DoubleNote, Note, Sparkle],
            TrailTheme::Science => &[Atom, Flask, Helix, Atom],
            TrailTheme::Math => &[Sigma, Infinity, Plus, Sigma],
            TrailTheme::Astronomy => &[Star, Planet, Comet, Sparkle, Star],
        }
    }

    pub fn colors(&self) -> &'static [[f32; 3]] {
        match self {
            // amber, pink, yellow, cyan
            TrailTheme::Music => &[
                [0.961, 0.620, 0.043],
                [0.925, 0.282, 0.600],
                [0.980, 0.800, 0.082],
                [0.133, 0.827, 0.933],
            ],
            // emerald, green, teal, lime
            TrailTheme::Science => &[
                [0.063, 0.725, 0.506],
                [0.290, 0.871, 0.502],
                [0.369, 0.918, 0.831],
                [0.639, 0.902, 0.208],
            ],
            // cyan, blue, indigo, sky
            TrailTheme::Math => &[
                [0.024, 0.714, 0.831],
                [0.376, 0.647, 0.980],
                [0.647, 0.706, 0.988],
                [0.490, 0.827, 0.988],
            ],
            // white, purple, indigo, violet
            TrailTheme::Astronomy => &[
                [1.0, 1.0, 1.0],
                [0.847, 0.706, 0.996],
                [0.780, 0.824, 0.996],
                [0.655, 0.545, 0.980],
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrailSymbol {
    pub origin: Vec2,
    pub vel: Vec2,
    pub glyph: Glyph,
    pub color: [f32; 3],
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
    pub age: f32,
}

/// Interpolated pose of a symbol at its current age
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolPose {
    pub pos: Vec2,
    pub scale: f32,
    pub rotation: f32,
    pub opacity: f32,
}

impl TrailSymbol {
    pub fn progress(&self) -> f32 {
        (self.age / SYMBOL_LIFETIME).clamp(0.0, 1.0)
    }

    pub fn pose(&self) -> SymbolPose {
        let e = ease_out(self.progress());
        let drift = self.vel * DRIFT_GAIN - Vec2::new(0.0, RISE);
        SymbolPose {
            pos: self.origin + drift * e,
            scale: self.scale * 1.5 * e,
            rotation: self.rotation + 90.0 * e,
            opacity: 1.0 - e,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.age >= SYMBOL_LIFETIME
    }
}

#[derive(Debug, Clone)]
pub struct PointerTrail {
    theme: TrailTheme,
    symbols: Vec<TrailSymbol>,
    last_spawn: Option<f64>,
    rng: Pcg32,
}

impl PointerTrail {
    pub fn new(theme: TrailTheme, seed: u64) -> Self {
        Self {
            theme,
            symbols: Vec::with_capacity(TRAIL_KEEP + 1),
            last_spawn: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn theme(&self) -> TrailTheme {
        self.theme
    }

    pub fn symbols(&self) -> &[TrailSymbol] {
        &self.symbols
    }

    /// Pointer moved at `now` seconds; returns true if a symbol spawned
    pub fn on_pointer(&mut self, pointer: Vec2, now: f64) -> bool {
        if let Some(last) = self.last_spawn
            && now - last <= SPAWN_THROTTLE
        {
            return false;
        }
        self.last_spawn = Some(now);
        self.spawn(pointer);
        true
    }

    fn spawn(&mut self, at: Vec2) {
        let glyphs = self.theme.glyphs();
        let colors = self.theme.colors();
        let rng = &mut self.rng;

        let symbol = TrailSymbol {
            origin: at
                + Vec2::new(
                    (rng.random::<f32>() - 0.5) * SPAWN_JITTER,
                    (rng.random::<f32>() - 0.5) * SPAWN_JITTER,
                ),
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * DRIFT_SPEED,
                (rng.random::<f32>() - 0.5) * DRIFT_SPEED,
            ),
            glyph: glyphs[rng.random_range(0..glyphs.len())],
            color: colors[rng.random_range(0..colors.len())],
            rotation: rng.random::<f32>() * 360.0,
            scale: 0.5 + rng.random::<f32>() * 1.5,
            age: 0.0,
        };

        if self.symbols.len() > TRAIL_KEEP {
            let excess = self.symbols.len() - TRAIL_KEEP;
            self.symbols.drain(..excess);
        }
        self.symbols.push(symbol);
    }

    pub fn tick(&mut self, dt: f32) {
        for s in &mut self.symbols {
            s.age += dt;
        }
        self.symbols.retain(|s| !s.is_finished());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_throttled() {
        let mut trail = PointerTrail::new(TrailTheme::Music, 1);
        assert!(trail.on_pointer(Vec2::new(10.0, 10.0), 0.0));
        assert!(!trail.on_pointer(Vec2::new(12.0, 10.0), 0.010));
        assert!(!trail.on_pointer(Vec2::new(12.0, 10.0), 0.015));
        assert!(trail.on_pointer(Vec2::new(14.0, 10.0), 0.020));
        assert_eq!(trail.symbols().len(), 2);
    }

    #[test]
    fn test_capacity() {
        let mut trail = PointerTrail::new(TrailTheme::Math, 2);
        for i in 0..200 {
            trail.on_pointer(Vec2::new(i as f32, 0.0), i as f64 * 0.02);
            assert!(trail.symbols().len() <= TRAIL_KEEP + 1);
        }
        assert_eq!(trail.symbols().len(), TRAIL_KEEP + 1);
        // Newest is last
        let last = &trail.symbols()[TRAIL_KEEP];
        assert!((last.origin.x - 199.0).abs() <= SPAWN_JITTER / 2.0);
    }

    #[test]
    fn test_symbols_expire() {
        let mut trail = PointerTrail::new(TrailTheme::Science, 3);
        trail.on_pointer(Vec2::ZERO, 0.0);
        for _ in 0..71 {
            trail.tick(1.0 / 60.0);
        }
        assert_eq!(trail.symbols().len(), 1);
        trail.tick(1.0 / 30.0);
        assert!(trail.symbols().is_empty());
    }

    #[test]
    fn test_pose_endpoints() {
        let s = TrailSymbol {
            origin: Vec2::new(100.0, 100.0),
            vel: Vec2::new(1.0, 1.0),
            glyph: Glyph::Star,
            color: [1.0; 3],
            rotation: 10.0,
            scale: 2.0,
            age: 0.0,
        };
        let start = s.pose();
        assert_eq!(start.pos, s.origin);
        assert_eq!(start.scale, 0.0);
        assert_eq!(start.opacity, 1.0);

        let end = TrailSymbol { age: SYMBOL_LIFETIME, ..s }.pose();
        assert_eq!(end.pos, Vec2::new(130.0, 80.0));
        assert_eq!(end.scale, 3.0);
        assert_eq!(end.rotation, 100.0);
        assert_eq!(end.opacity, 0.0);
    }

    #[test]
    fn test_theme_palettes() {
        for theme in [
            TrailTheme::Music,
            TrailTheme::Science,
            TrailTheme::Math,
            TrailTheme::Astronomy,
        ] {
            assert!(!theme.glyphs().is_empty());
            assert_eq!(theme.colors().len(), 4);
        }
    }
}
