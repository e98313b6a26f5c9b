//! Lightsaber pointer follower
//!
//! The hilt chases the pointer on a damped spring and the blade swings in the
//! direction of horizontal pointer motion.

use glam::Vec2;

use crate::Viewport;

/// Damped harmonic spring integrated with semi-implicit Euler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl Spring {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Advance `value`/`velocity` toward `target` by `dt` seconds
    pub fn step(&self, value: &mut f32, velocity: &mut f32, target: f32, dt: f32) {
        let force = -self.stiffness * (*value - target) - self.damping * *velocity;
        *velocity += force / self.mass * dt;
        *value += *velocity * dt;
    }

    pub fn step_vec(&self, value: &mut Vec2, velocity: &mut Vec2, target: Vec2, dt: f32) {
        self.step(&mut value.x, &mut velocity.x, target.x, dt);
        self.step(&mut value.y, &mut velocity.y, target.y, dt);
    }
}

/// Heavy spring for the hilt position
pub const FOLLOW_SPRING: Spring = Spring::new(250.0, 20.0, 0.8);
/// Softer spring smoothing the swing angle
pub const SWING_SPRING: Spring = Spring::new(200.0, 20.0, 1.0);

/// Degrees of swing per pixel of horizontal pointer motion
const SWING_GAIN: f32 = 1.5;
const MAX_SWING: f32 = 60.0;

/// Integration substep; springs this stiff go unstable at a full frame
const SUBSTEP: f32 = 1.0 / 240.0;

#[derive(Debug, Clone)]
pub struct Lightsaber {
    pos: Vec2,
    vel: Vec2,
    target: Vec2,
    last_pointer_x: f32,
    swing_target: f32,
    swing: f32,
    swing_vel: f32,
}

impl Lightsaber {
    pub fn new(viewport: Viewport) -> Self {
        let center = viewport.center();
        Self {
            pos: center,
            vel: Vec2::ZERO,
            target: center,
            last_pointer_x: 0.0,
            swing_target: 0.0,
            swing: 0.0,
            swing_vel: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Smoothed blade angle in degrees
    pub fn swing(&self) -> f32 {
        self.swing
    }

    pub fn swing_target(&self) -> f32 {
        self.swing_target
    }

    pub fn on_pointer(&mut self, pointer: Vec2) {
        self.target = pointer;
        let dx = pointer.x - self.last_pointer_x;
        self.swing_target = (dx * SWING_GAIN).clamp(-MAX_SWING, MAX_SWING);
        self.last_pointer_x = pointer.x;
    }

    pub fn tick(&mut self, dt: f32) {
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(SUBSTEP);
            FOLLOW_SPRING.step_vec(&mut self.pos, &mut self.vel, self.target, h);
            SWING_SPRING.step(&mut self.swing, &mut self.swing_vel, self.swing_target, h);
            remaining -= h;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;

    #[test]
    fn test_hilt_converges_on_pointer() {
        let mut saber = Lightsaber::new(Viewport::new(800.0, 600.0));
        let target = Vec2::new(100.0, 500.0);
        saber.on_pointer(target);
        for _ in 0..180 {
            saber.tick(FRAME_DT);
        }
        assert!(saber.position().distance(target) < 1.0);
    }

    #[test]
    fn test_swing_clamped() {
        let mut saber = Lightsaber::new(Viewport::new(800.0, 600.0));
        saber.on_pointer(Vec2::new(0.0, 0.0));
        saber.on_pointer(Vec2::new(500.0, 0.0));
        assert_eq!(saber.swing_target(), MAX_SWING);
        saber.on_pointer(Vec2::new(0.0, 0.0));
        assert_eq!(saber.swing_target(), -MAX_SWING);
        saber.on_pointer(Vec2::new(10.0, 0.0));
        assert_eq!(saber.swing_target(), 15.0);
    }

    #[test]
    fn test_swing_settles() {
        let mut saber = Lightsaber::new(Viewport::new(800.0, 600.0));
        saber.on_pointer(Vec2::new(20.0, 0.0));
        for _ in 0..240 {
            saber.tick(FRAME_DT);
        }
        assert!((saber.swing() - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_spring_is_stable_at_frame_rate() {
        let mut value = 0.0;
        let mut velocity = 0.0;
        let mut peak: f32 = 0.0;
        for _ in 0..600 {
            let mut remaining = FRAME_DT;
            while remaining > 0.0 {
                let h = remaining.min(SUBSTEP);
                FOLLOW_SPRING.step(&mut value, &mut velocity, 1.0, h);
                remaining -= h;
            }
            peak = peak.max(value);
        }
        assert!((value - 1.0).abs() < 1e-3);
        assert!(peak < 1.5);
    }
}
