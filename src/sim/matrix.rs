//! Matrix digital rain
//!
//! Stepped on a fixed 35 ms cadence. Each step stamps one glyph per column
//! into a persistent buffer that is faded between steps.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::timer::Interval;
use crate::Viewport;

/// Column pitch and glyph size in pixels
pub const CELL_SIZE: f32 = 18.0;
/// Seconds between steps
pub const STEP_INTERVAL: f32 = 0.035;
/// Fraction of glyphs drawn bright white
pub const WHITE_CHANCE: f32 = 0.02;
/// Per-step chance that a drop below the viewport restarts at the top
pub const RESET_CHANCE: f32 = 0.025;
/// Alpha of the black fill laid over the buffer each step
pub const FADE_ALPHA: f32 = 0.08;

/// Glyph bitmap width and height in cells
pub const GLYPH_COLS: u32 = 3;
pub const GLYPH_ROWS: u32 = 5;

/// One glyph drawn this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphStamp {
    pub column: usize,
    pub row: u32,
    /// 3x5 bitmap, bit `r * 3 + c` set when lit
    pub pattern: u16,
    pub white: bool,
}

#[derive(Debug, Clone)]
pub struct MatrixRain {
    drops: Vec<u32>,
    viewport: Viewport,
    cadence: Interval,
    stamps: Vec<GlyphStamp>,
    rng: Pcg32,
}

pub fn column_count(width: f32) -> usize {
    (width.max(0.0) / CELL_SIZE).ceil() as usize
}

impl MatrixRain {
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        Self {
            drops: vec![1; column_count(viewport.width)],
            viewport,
            cadence: Interval::new(STEP_INTERVAL),
            stamps: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    /// Glyphs stamped by the most recent tick (empty if no step ran)
    pub fn stamps(&self) -> &[GlyphStamp] {
        &self.stamps
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// New columns start at the top; existing drops keep their rows
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.drops.resize(column_count(viewport.width), 1);
    }

    pub fn tick(&mut self, dt: f32) {
        self.stamps.clear();
        for _ in 0..self.cadence.tick(dt) {
            self.step();
        }
    }

    /// One rain step
    pub fn step(&mut self) {
        let height = self.viewport.height;
        for (column, drop) in self.drops.iter_mut().enumerate() {
            let pattern = self.rng.random_range(1..(1u16 << (GLYPH_COLS * GLYPH_ROWS)));
            let white = self.rng.random::<f32>() < WHITE_CHANCE;
            self.stamps.push(GlyphStamp {
                column,
                row: *drop,
                pattern,
                white,
            });

            if *drop as f32 * CELL_SIZE > height && self.rng.random::<f32>() < RESET_CHANCE {
                *drop = 0;
            }
            *drop += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count() {
        assert_eq!(column_count(1280.0), 72);
        assert_eq!(column_count(1000.0), 56);
        assert_eq!(column_count(0.0), 0);
        let rain = MatrixRain::new(Viewport::new(360.0, 640.0), 1);
        assert_eq!(rain.columns(), 20);
    }

    #[test]
    fn test_steps_on_cadence() {
        let mut rain = MatrixRain::new(Viewport::new(180.0, 400.0), 1);
        rain.tick(0.016);
        assert!(rain.stamps().is_empty());
        rain.tick(0.016);
        assert!(rain.stamps().is_empty());
        rain.tick(0.016);
        assert_eq!(rain.stamps().len(), 10);
        assert!(rain.drops().iter().all(|&d| d == 2));
    }

    #[test]
    fn test_drops_reset_only_below_viewport() {
        let vp = Viewport::new(180.0, 180.0);
        let mut rain = MatrixRain::new(vp, 8);
        let mut resets = 0;
        for _ in 0..2000 {
            let before = rain.drops().to_vec();
            rain.step();
            for (b, a) in before.iter().zip(rain.drops()) {
                if *a == 1 {
                    resets += 1;
                    assert!(*b as f32 * CELL_SIZE > vp.height);
                } else {
                    assert_eq!(*a, b + 1);
                }
            }
        }
        assert!(resets > 0);
    }

    #[test]
    fn test_white_glyphs_are_rare() {
        let mut rain = MatrixRain::new(Viewport::new(1800.0, 900.0), 3);
        let mut white = 0;
        let mut total = 0;
        for _ in 0..100 {
            rain.step();
            white += rain.stamps().iter().filter(|s| s.white).count();
            total += rain.stamps().len();
            rain.stamps.clear();
        }
        let ratio = white as f32 / total as f32;
        assert!(ratio > 0.005 && ratio < 0.04, "ratio {ratio}");
    }

    #[test]
    fn test_resize_preserves_drops() {
        let mut rain = MatrixRain::new(Viewport::new(180.0, 400.0), 1);
        rain.step();
        rain.resize(Viewport::new(360.0, 400.0));
        assert_eq!(rain.columns(), 20);
        assert_eq!(rain.drops()[0], 2);
        assert_eq!(rain.drops()[19], 1);
    }
}
