//! Hyperspace starfield
//!
//! Stars fly toward the viewer and are recycled at the far plane once they
//! pass the near plane. Speed ramps up every tick for the "jump" feel.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Viewport;
use crate::consts::{STAR_ACCELERATION, STAR_MAX_SPEED, STAR_START_SPEED};

/// A star in view-centred coordinates (z is depth, far plane = viewport width)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarPoint {
    pub pos: Vec3,
}

/// A projected motion-blur streak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Streak {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<StarPoint>,
    speed: f32,
    viewport: Viewport,
    rng: Pcg32,
    respawns: u64,
}

impl Starfield {
    pub fn new(count: usize, viewport: Viewport, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| {
                let lateral = random_lateral(&mut rng, viewport);
                StarPoint {
                    pos: Vec3::new(
                        lateral.x,
                        lateral.y,
                        rng.random::<f32>() * viewport.width,
                    ),
                }
            })
            .collect();

        Self {
            stars,
            speed: STAR_START_SPEED,
            viewport,
            rng,
            respawns: 0,
        }
    }

    pub fn stars(&self) -> &[StarPoint] {
        &self.stars
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Far plane depth
    pub fn far_plane(&self) -> f32 {
        self.viewport.width
    }

    pub fn respawns(&self) -> u64 {
        self.respawns
    }

    /// Resize the projection; stars keep their coordinates
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Advance one tick; returns how many stars were recycled
    pub fn step(&mut self) -> usize {
        if self.speed < STAR_MAX_SPEED {
            self.speed += STAR_ACCELERATION;
        }

        let far = self.far_plane();
        let mut recycled = 0;
        for star in &mut self.stars {
            star.pos.z -= self.speed;
            if star.pos.z <= 0.0 {
                let lateral = random_lateral(&mut self.rng, self.viewport);
                star.pos = Vec3::new(lateral.x, lateral.y, far);
                recycled += 1;
            }
        }
        self.respawns += recycled as u64;
        recycled
    }

    /// Perspective projection of a point at depth `z`
    pub fn project(&self, x: f32, y: f32, z: f32) -> Vec2 {
        let focal = self.viewport.width / 2.0;
        let z = z.max(f32::EPSILON);
        Vec2::new(x / z * focal, y / z * focal) + self.viewport.center()
    }

    /// Streaks for every star, nearer stars thicker and brighter
    pub fn streaks(&self) -> impl Iterator<Item = Streak> + '_ {
        let far = self.far_plane().max(1.0);
        self.stars.iter().map(move |star| {
            let p = star.pos;
            let nearness = (1.0 - p.z / far).clamp(0.0, 1.0);
            let trail_z = p.z + self.speed * 2.0;
            Streak {
                from: self.project(p.x, p.y, trail_z),
                to: self.project(p.x, p.y, p.z),
                width: nearness * 4.0,
                alpha: nearness,
            }
        })
    }
}

fn random_lateral(rng: &mut Pcg32, viewport: Viewport) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * viewport.width - viewport.width / 2.0,
        rng.random::<f32>() * viewport.height - viewport.height / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_speed_ramps_to_cap() {
        let mut field = Starfield::new(10, viewport(), 1);
        for _ in 0..1000 {
            field.step();
        }
        assert!(field.speed() >= STAR_MAX_SPEED);
        assert!(field.speed() < STAR_MAX_SPEED + STAR_ACCELERATION + 1e-3);
    }

    #[test]
    fn test_respawn_at_far_plane() {
        let vp = viewport();
        let mut field = Starfield::new(200, vp, 5);
        let mut seen = 0;
        for _ in 0..50 {
            let before: Vec<f32> = field.stars().iter().map(|s| s.pos.z).collect();
            field.step();
            for (star, z0) in field.stars().iter().zip(before) {
                if star.pos.z > z0 {
                    seen += 1;
                    assert_eq!(star.pos.z, vp.width);
                    assert!(star.pos.x >= -vp.width / 2.0 && star.pos.x < vp.width / 2.0);
                    assert!(star.pos.y >= -vp.height / 2.0 && star.pos.y < vp.height / 2.0);
                } else {
                    assert!(star.pos.z < z0, "depth must strictly decrease");
                }
            }
        }
        assert!(seen > 0);
        assert_eq!(field.respawns(), seen);
    }

    #[test]
    fn test_projection_centre() {
        let field = Starfield::new(0, viewport(), 1);
        assert_eq!(field.project(0.0, 0.0, 100.0), Vec2::new(400.0, 300.0));
        // x/z * width/2 + cx
        assert_eq!(field.project(100.0, 0.0, 400.0), Vec2::new(500.0, 300.0));
    }

    #[test]
    fn test_near_stars_are_brighter() {
        let mut field = Starfield::new(0, viewport(), 1);
        field.stars.push(StarPoint { pos: Vec3::new(10.0, 10.0, 700.0) });
        field.stars.push(StarPoint { pos: Vec3::new(10.0, 10.0, 50.0) });
        let streaks: Vec<Streak> = field.streaks().collect();
        assert!(streaks[1].alpha > streaks[0].alpha);
        assert!(streaks[1].width > streaks[0].width);
    }

    #[test]
    fn test_resize_keeps_stars() {
        let mut field = Starfield::new(20, viewport(), 9);
        let before: Vec<StarPoint> = field.stars().to_vec();
        field.resize(Viewport::new(1024.0, 768.0));
        assert_eq!(field.stars(), &before[..]);
        assert_eq!(field.far_plane(), 1024.0);
    }
}
