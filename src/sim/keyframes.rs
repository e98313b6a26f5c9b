//! Keyframe tracks for the scripted overlays

use crate::{ease_in_out, lerp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    InOut,
}

impl Ease {
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Ease::Linear => t.clamp(0.0, 1.0),
            Ease::InOut => ease_in_out(t),
        }
    }
}

/// How a track behaves past its duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Hold the last value
    #[default]
    Once,
    /// Start over
    Loop,
    /// Play forward then backward
    Mirror,
}

/// Values at normalized times, eased per segment
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    values: Vec<f32>,
    times: Vec<f32>,
    duration: f32,
    ease: Ease,
    repeat: Repeat,
}

impl Track {
    /// Evenly spaced keyframes
    pub fn new(values: &[f32], duration: f32) -> Self {
        let n = values.len().max(2) - 1;
        let times = (0..values.len()).map(|i| i as f32 / n as f32).collect();
        Self::with_times(values, times, duration)
    }

    /// Explicit normalized times; must be ascending and match `values` in length
    pub fn with_times(values: &[f32], times: Vec<f32>, duration: f32) -> Self {
        debug_assert_eq!(values.len(), times.len());
        debug_assert!(times.windows(2).all(|w| w[0] <= w[1]));
        Self {
            values: values.to_vec(),
            times,
            duration: duration.max(f32::EPSILON),
            ease: Ease::Linear,
            repeat: Repeat::Once,
        }
    }

    pub fn eased(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn repeating(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    fn progress(&self, elapsed: f32) -> f32 {
        let raw = elapsed.max(0.0) / self.duration;
        match self.repeat {
            Repeat::Once => raw.min(1.0),
            Repeat::Loop => raw.fract(),
            Repeat::Mirror => {
                let cycle = raw % 2.0;
                if cycle > 1.0 { 2.0 - cycle } else { cycle }
            }
        }
    }

    /// Value after `elapsed` seconds
    pub fn sample(&self, elapsed: f32) -> f32 {
        let Some(&first) = self.values.first() else {
            return 0.0;
        };
        let p = self.progress(elapsed);

        for i in 1..self.values.len() {
            let (t0, t1) = (self.times[i - 1], self.times[i]);
            if p <= t1 {
                let span = t1 - t0;
                let local = if span > 0.0 { (p - t0) / span } else { 1.0 };
                return lerp(self.values[i - 1], self.values[i], self.ease.apply(local));
            }
        }
        self.values.last().copied().unwrap_or(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_and_midpoints() {
        let track = Track::new(&[0.0, 10.0, 20.0], 2.0);
        assert_eq!(track.sample(0.0), 0.0);
        assert_eq!(track.sample(1.0), 10.0);
        assert_eq!(track.sample(0.5), 5.0);
        assert_eq!(track.sample(2.0), 20.0);
        assert_eq!(track.sample(50.0), 20.0);
    }

    #[test]
    fn test_explicit_times() {
        let track = Track::with_times(&[120.0, 50.0, -50.0, -120.0], vec![0.0, 0.4, 0.8, 1.0], 5.0);
        assert_eq!(track.sample(2.0), 50.0);
        assert_eq!(track.sample(4.0), -50.0);
        assert_eq!(track.sample(5.0), -120.0);
    }

    #[test]
    fn test_mirror_and_loop() {
        let mirror = Track::new(&[0.0, 1.0], 1.0).repeating(Repeat::Mirror);
        assert!((mirror.sample(0.25) - 0.25).abs() < 1e-6);
        assert!((mirror.sample(1.25) - 0.75).abs() < 1e-6);
        assert!((mirror.sample(2.25) - 0.25).abs() < 1e-6);

        let looped = Track::new(&[0.0, 1.0], 1.0).repeating(Repeat::Loop);
        assert!((looped.sample(1.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let track = Track::new(&[0.0, 1.0], 1.0).eased(Ease::InOut);
        assert!((track.sample(0.5) - 0.5).abs() < 1e-6);
        assert!(track.sample(0.25) < 0.25);
        assert!(track.sample(0.75) > 0.75);
    }
}
