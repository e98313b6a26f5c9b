//! Doom-style fire propagation on a low-resolution intensity grid
//!
//! Heat rises one row per tick from a seeded bottom row, losing a random
//! 0..=2 intensity and drifting sideways with the smoothed wind.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{FIRE_HEIGHT, FIRE_WIDTH, MAX_WIND, WIND_SMOOTHING};

/// Hottest intensity; the seed value of the bottom row
pub const PALETTE_MAX: u8 = 36;

/// Colour ramp from ember black to white hot (36 entries)
pub const FIRE_PALETTE: [[u8; 3]; 36] = [
    [7, 7, 7],
    [31, 7, 7],
    [47, 15, 7],
    [71, 15, 7],
    [87, 23, 7],
    [103, 31, 7],
    [119, 31, 7],
    [143, 39, 7],
    [159, 47, 7],
    [175, 63, 7],
    [191, 71, 7],
    [199, 71, 7],
    [223, 79, 7],
    [223, 87, 7],
    [223, 87, 7],
    [215, 95, 7],
    [215, 95, 7],
    [215, 103, 15],
    [207, 111, 15],
    [207, 119, 15],
    [207, 127, 15],
    [207, 135, 23],
    [199, 135, 23],
    [199, 143, 23],
    [199, 151, 31],
    [191, 159, 31],
    [191, 159, 31],
    [191, 167, 39],
    [191, 167, 39],
    [191, 175, 47],
    [183, 183, 47],
    [183, 183, 55],
    [207, 207, 111],
    [223, 223, 159],
    [239, 239, 199],
    [255, 255, 255],
];

/// Alpha of cold (intensity 0) cells, letting the backdrop show through
pub const COLD_ALPHA: u8 = 240;

/// Map an intensity to RGBA
pub fn intensity_rgba(intensity: u8) -> [u8; 4] {
    let idx = (intensity as usize).min(FIRE_PALETTE.len() - 1);
    let [r, g, b] = FIRE_PALETTE[idx];
    let a = if intensity == 0 { COLD_ALPHA } else { 255 };
    [r, g, b, a]
}

/// Exponentially smoothed horizontal drift
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindBias {
    current: f32,
    target: f32,
}

impl WindBias {
    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Aim the wind from a pointer position normalized to [-1, 1]
    pub fn aim(&mut self, normalized_x: f32) {
        self.target = normalized_x.clamp(-1.0, 1.0) * MAX_WIND;
    }

    /// One smoothing step toward the target
    pub fn step(&mut self) {
        self.current += (self.target - self.current) * WIND_SMOOTHING;
    }

    /// Whole-cell offset applied to write targets
    pub fn offset(&self) -> isize {
        self.current.round() as isize
    }
}

/// How the bottom row is fed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reseed {
    /// Seed at init only; the flame slowly erodes at the wind edges
    #[default]
    Once,
    /// Force the bottom row to max every tick (sustained flame)
    EveryTick,
}

/// Fire intensity grid (row-major, row 0 at the top)
#[derive(Debug, Clone)]
pub struct FireGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
    wind: WindBias,
    reseed: Reseed,
    rng: Pcg32,
    ticks: u64,
}

impl FireGrid {
    pub fn new(seed: u64, reseed: Reseed) -> Self {
        Self::with_size(FIRE_WIDTH, FIRE_HEIGHT, seed, reseed)
    }

    pub fn with_size(width: usize, height: usize, seed: u64, reseed: Reseed) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut grid = Self {
            width,
            height,
            cells: vec![0; width * height],
            wind: WindBias::default(),
            reseed,
            rng: Pcg32::seed_from_u64(seed),
            ticks: 0,
        };
        grid.seed_bottom_row();
        grid
    }

    fn seed_bottom_row(&mut self) {
        let start = self.width * (self.height - 1);
        self.cells[start..].fill(PALETTE_MAX);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn wind(&self) -> &WindBias {
        &self.wind
    }

    pub fn wind_mut(&mut self) -> &mut WindBias {
        &mut self.wind
    }

    pub fn intensity(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    /// Cells of row `y`, or `None` past the bottom
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        Some(&self.cells[y * self.width..(y + 1) * self.width])
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.width)
    }

    /// Average intensity of a row
    pub fn row_mean(&self, y: usize) -> Option<f32> {
        let row = self.row(y)?;
        Some(row.iter().map(|&c| c as f32).sum::<f32>() / row.len() as f32)
    }

    /// Advance the fire by one tick
    pub fn step(&mut self) {
        self.wind.step();
        let wind = self.wind.offset();
        let len = self.cells.len() as isize;

        // Column-major: writes can land on cells that are read later this tick
        for column in 0..self.width {
            for row in 0..self.height {
                let index = column + self.width * row;
                let below = index + self.width;
                if below >= self.cells.len() {
                    continue;
                }

                let decay: u8 = self.rng.random_range(0..3);
                let intensity = self.cells[below].saturating_sub(decay);

                let target = index as isize - decay as isize + wind;
                if (0..len).contains(&target) {
                    self.cells[target as usize] = intensity;
                }
            }
        }

        if self.reseed == Reseed::EveryTick {
            self.seed_bottom_row();
        }
        self.ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_row_seeded() {
        let grid = FireGrid::new(1, Reseed::Once);
        assert!(grid.row(FIRE_HEIGHT - 1).unwrap().iter().all(|&c| c == PALETTE_MAX));
        assert!(grid.row(0).unwrap().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_row_past_bottom_is_none() {
        let grid = FireGrid::new(1, Reseed::Once);
        assert!(grid.row(FIRE_HEIGHT).is_none());
        assert!(grid.row_mean(FIRE_HEIGHT).is_none());
        assert_eq!(grid.intensity(0, FIRE_HEIGHT), None);
        assert_eq!(grid.rows().count(), FIRE_HEIGHT);
    }

    #[test]
    fn test_heat_decays_with_height() {
        let mut grid = FireGrid::new(7, Reseed::Once);
        for _ in 0..200 {
            grid.step();
        }
        let bottom = grid.row_mean(FIRE_HEIGHT - 2).unwrap();
        let middle = grid.row_mean(FIRE_HEIGHT / 2).unwrap();
        let top = grid.row_mean(0).unwrap();
        assert!(bottom > middle, "bottom {bottom} middle {middle}");
        assert!(middle >= top, "middle {middle} top {top}");
        assert!(grid.cells().iter().all(|&c| c <= PALETTE_MAX));
        assert_eq!(grid.cells().len(), FIRE_WIDTH * FIRE_HEIGHT);
    }

    #[test]
    fn test_no_wind_keeps_bottom_row() {
        // With zero wind a target never lands below its own row
        let mut grid = FireGrid::new(3, Reseed::Once);
        for _ in 0..50 {
            grid.step();
        }
        assert!(grid.row(FIRE_HEIGHT - 1).unwrap().iter().all(|&c| c == PALETTE_MAX));
    }

    #[test]
    fn test_every_tick_reseed_restores_source() {
        let mut grid = FireGrid::new(11, Reseed::EveryTick);
        grid.wind_mut().set_target(1.5);
        for _ in 0..300 {
            grid.step();
        }
        assert!(grid.row(FIRE_HEIGHT - 1).unwrap().iter().all(|&c| c == PALETTE_MAX));
    }

    #[test]
    fn test_wind_converges_without_overshoot() {
        let mut wind = WindBias::default();
        wind.set_target(1.5);
        let mut last = 0.0;
        for n in 1..=120 {
            wind.step();
            let expected = 1.5 * (1.0 - 0.95f32.powi(n));
            assert!((wind.current() - expected).abs() < 1e-4);
            assert!(wind.current() >= last);
            assert!(wind.current() <= 1.5);
            last = wind.current();
        }
    }

    #[test]
    fn test_aim_maps_pointer() {
        let mut wind = WindBias::default();
        wind.aim(1.0);
        assert_eq!(wind.target(), MAX_WIND);
        wind.aim(-3.0);
        assert_eq!(wind.target(), -MAX_WIND);
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(intensity_rgba(0), [7, 7, 7, COLD_ALPHA]);
        assert_eq!(intensity_rgba(35), [255, 255, 255, 255]);
        // Seed value 36 clamps onto the last ramp entry
        assert_eq!(intensity_rgba(PALETTE_MAX), [255, 255, 255, 255]);
    }
}
