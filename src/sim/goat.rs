//! G.O.A.T. strobe show

use glam::Vec2;

use super::keyframes::{Repeat, Track};
use super::saber::Spring;

const TITLE_SPRING: Spring = Spring::new(300.0, 10.0, 1.0);
const TITLE_START_SCALE: f32 = 3.0;
const FADE_IN: f32 = 0.3;
const SUBSTEP: f32 = 1.0 / 240.0;

/// One frame of the show
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoatFrame {
    /// White flash opacity
    pub strobe: f32,
    /// Portrait offset in pixels
    pub jitter: Vec2,
    /// Red glitch copy offset in pixels
    pub glitch: f32,
    /// Hue rotation in degrees
    pub hue: f32,
    pub title_scale: f32,
    /// Whole-overlay fade-in
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct GoatShow {
    elapsed: f32,
    strobe_enabled: bool,
    strobe: Track,
    jitter_x: Track,
    jitter_y: Track,
    glitch: Track,
    hue: Track,
    title_scale: f32,
    title_vel: f32,
}

impl GoatShow {
    /// `strobe_enabled` is off under reduced motion
    pub fn new(strobe_enabled: bool) -> Self {
        Self {
            elapsed: 0.0,
            strobe_enabled,
            strobe: Track::new(&[0.0, 1.0, 0.0, 0.5, 0.0, 1.0, 0.0], 0.1)
                .repeating(Repeat::Mirror),
            jitter_x: Track::new(&[-3.0, 3.0, -3.0, 3.0, 0.0], 0.2).repeating(Repeat::Loop),
            jitter_y: Track::new(&[2.0, -2.0, 2.0, -2.0, 0.0], 0.2).repeating(Repeat::Loop),
            glitch: Track::new(&[-5.0, 5.0, -5.0], 0.05).repeating(Repeat::Loop),
            hue: Track::new(&[0.0, 90.0, 0.0], 0.2).repeating(Repeat::Loop),
            title_scale: TITLE_START_SCALE,
            title_vel: 0.0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(SUBSTEP);
            TITLE_SPRING.step(&mut self.title_scale, &mut self.title_vel, 1.0, h);
            remaining -= h;
        }
    }

    pub fn frame(&self) -> GoatFrame {
        let t = self.elapsed;
        GoatFrame {
            strobe: if self.strobe_enabled {
                self.strobe.sample(t)
            } else {
                0.0
            },
            jitter: Vec2::new(self.jitter_x.sample(t), self.jitter_y.sample(t)),
            glitch: self.glitch.sample(t),
            hue: self.hue.sample(t),
            title_scale: self.title_scale,
            opacity: (t / FADE_IN).min(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strobe_bounded() {
        let mut show = GoatShow::new(true);
        let mut flashes = 0;
        for _ in 0..300 {
            show.tick(1.0 / 60.0);
            let f = show.frame();
            assert!((0.0..=1.0).contains(&f.strobe));
            assert!(f.jitter.x.abs() <= 3.0 && f.jitter.y.abs() <= 2.0);
            if f.strobe > 0.5 {
                flashes += 1;
            }
        }
        assert!(flashes > 0);
    }

    #[test]
    fn test_title_settles_to_unit_scale() {
        let mut show = GoatShow::new(true);
        assert_eq!(show.frame().title_scale, TITLE_START_SCALE);
        for _ in 0..120 {
            show.tick(1.0 / 60.0);
        }
        assert!((show.frame().title_scale - 1.0).abs() < 0.05);
        assert_eq!(show.frame().opacity, 1.0);
    }

    #[test]
    fn test_reduced_motion_disables_strobe() {
        let mut show = GoatShow::new(false);
        for _ in 0..30 {
            show.tick(1.0 / 60.0);
            assert_eq!(show.frame().strobe, 0.0);
        }
    }
}
