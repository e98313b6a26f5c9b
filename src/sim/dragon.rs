//! Dragon fly-over
//!
//! The dragon sweeps right to left across the top of the page while the
//! page itself shakes.

use glam::Vec2;

use super::keyframes::{Ease, Track};
use crate::Viewport;

/// Flight length (the overlay itself lingers a little longer)
pub const FLIGHT_DURATION: f32 = 5.0;

/// Page shake amplitude in pixels
const SHAKE_AMPLITUDE: f32 = 6.0;
/// Shake frequencies per axis (Hz); unequal so the motion never repeats a line
const SHAKE_FREQ_X: f32 = 11.0;
const SHAKE_FREQ_Y: f32 = 7.0;

/// Dragon transform at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragonPose {
    /// Top-left offset in pixels
    pub pos: Vec2,
    pub scale: f32,
    /// Degrees
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPose {
    pub x: f32,
    pub opacity: f32,
    pub scale: f32,
}

#[derive(Debug, Clone)]
pub struct DragonFlight {
    elapsed: f32,
    viewport: Viewport,
    shake_enabled: bool,
    x_vw: Track,
    y_vh: Track,
    scale: Track,
    rotation: Track,
    shadow_x_vw: Track,
    shadow_opacity: Track,
    shadow_scale: Track,
}

impl DragonFlight {
    pub fn new(viewport: Viewport, shake_enabled: bool) -> Self {
        let times = vec![0.0, 0.4, 0.8, 1.0];
        let flight = |values: &[f32]| {
            Track::with_times(values, times.clone(), FLIGHT_DURATION).eased(Ease::InOut)
        };
        let shadow = |values: &[f32]| Track::new(values, FLIGHT_DURATION).eased(Ease::InOut);

        Self {
            elapsed: 0.0,
            viewport,
            shake_enabled,
            x_vw: flight(&[120.0, 50.0, -50.0, -120.0]),
            y_vh: flight(&[-10.0, 15.0, 0.0, -20.0]),
            scale: flight(&[0.5, 1.2, 1.0, 0.8]),
            rotation: flight(&[10.0, 0.0, -5.0, -5.0]),
            shadow_x_vw: shadow(&[120.0, 50.0, -120.0]),
            shadow_opacity: shadow(&[0.0, 0.4, 0.0]),
            shadow_scale: shadow(&[0.5, 1.2, 0.5]),
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

    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn pose(&self) -> DragonPose {
        let t = self.elapsed;
        DragonPose {
            pos: Vec2::new(
                self.x_vw.sample(t) / 100.0 * self.viewport.width,
                self.y_vh.sample(t) / 100.0 * self.viewport.height,
            ),
            scale: self.scale.sample(t),
            rotation: self.rotation.sample(t),
        }
    }

    pub fn shadow(&self) -> ShadowPose {
        let t = self.elapsed;
        ShadowPose {
            x: self.shadow_x_vw.sample(t) / 100.0 * self.viewport.width,
            opacity: self.shadow_opacity.sample(t),
            scale: self.shadow_scale.sample(t),
        }
    }

    /// Page offset for the earthquake; zero when motion is reduced
    pub fn page_shake(&self) -> Vec2 {
        if !self.shake_enabled {
            return Vec2::ZERO;
        }
        let tau = std::f32::consts::TAU;
        Vec2::new(
            (self.elapsed * SHAKE_FREQ_X * tau).sin(),
            (self.elapsed * SHAKE_FREQ_Y * tau).cos(),
        ) * SHAKE_AMPLITUDE
    }
}
