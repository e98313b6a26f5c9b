//! Shape generation for 2D primitives
//!
//! Everything is emitted as a flat triangle list in screen pixels.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;
use crate::sim::Glyph;
use crate::sim::matrix::{GLYPH_COLS, GLYPH_ROWS};

/// Placement of a shape authored in unit space (roughly -0.5..0.5)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub center: Vec2,
    pub scale: f32,
    /// Unit rotation vector (cos, sin)
    pub rotation: Vec2,
}

impl Transform {
    pub fn new(center: Vec2, scale: f32, degrees: f32) -> Self {
        Self {
            center,
            scale,
            rotation: Vec2::from_angle(degrees.to_radians()),
        }
    }

    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.center + self.rotation.rotate(local * self.scale)
    }
}

/// A single triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> [Vertex; 3] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Quad from four corners in winding order
pub fn quad(corners: [Vec2; 4], color: [f32; 4]) -> Vec<Vertex> {
    let [a, b, c, d] = corners;
    let mut vertices = Vec::with_capacity(6);
    vertices.extend(triangle(a, b, c, color));
    vertices.extend(triangle(a, c, d, color));
    vertices
}

/// Axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    quad(
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        color,
    )
}

/// Thick line segment with a colour per end
pub fn line_gradient(a: Vec2, b: Vec2, width: f32, from: [f32; 4], to: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::new(a1.x, a1.y, from),
        Vertex::new(a2.x, a2.y, from),
        Vertex::new(b1.x, b1.y, to),
        Vertex::new(b1.x, b1.y, to),
        Vertex::new(a2.x, a2.y, from),
        Vertex::new(b2.x, b2.y, to),
    ]
}

/// Thick line segment
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    line_gradient(a, b, width, color, color)
}

/// Open polyline; set `closed` to join the last point back to the first
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4], closed: bool) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len() * 6);
    for pair in points.windows(2) {
        vertices.extend(line(pair[0], pair[1], width, color));
    }
    if closed
        && points.len() > 2
        && let (Some(&last), Some(&first)) = (points.last(), points.first())
    {
        vertices.extend(line(last, first, width, color));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), 0.0, color, segments)
}

/// Filled ellipse rotated by `angle` radians
pub fn ellipse(center: Vec2, radii: Vec2, angle: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let rot = Vec2::from_angle(angle);
    let point = |i: u32| {
        let theta = (i as f32 / segments as f32) * TAU;
        center + rot.rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()))
    };

    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        vertices.extend(triangle(center, point(i), point(i + 1), color));
    }
    vertices
}

/// Ellipse outline
pub fn ellipse_outline(
    center: Vec2,
    radii: Vec2,
    angle: f32,
    width: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let rot = Vec2::from_angle(angle);
    let points: Vec<Vec2> = (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * TAU;
            center + rot.rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()))
        })
        .collect();
    polyline(&points, width, color, true)
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.extend(triangle(inner1, outer1, inner2, color));
        vertices.extend(triangle(inner2, outer1, outer2, color));
    }

    vertices
}

/// Filled star with `points` tips
pub fn star(t: Transform, points: u32, inner: f32, color: [f32; 4]) -> Vec<Vertex> {
    let tips = points.max(2) * 2;
    let corner = |i: u32| {
        let theta = i as f32 / tips as f32 * TAU - PI / 2.0;
        let r = if i % 2 == 0 { 0.5 } else { 0.5 * inner };
        t.apply(Vec2::new(theta.cos(), theta.sin()) * r)
    };
    let mut vertices = Vec::with_capacity(tips as usize * 3);
    for i in 0..tips {
        vertices.extend(triangle(t.center, corner(i), corner(i + 1), color));
    }
    vertices
}

/// One 3x5 bitmap glyph, top-left at `origin`
pub fn bitmap(pattern: u16, origin: Vec2, pixel: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for row in 0..GLYPH_ROWS {
        for col in 0..GLYPH_COLS {
            if pattern & (1 << (row * GLYPH_COLS + col)) != 0 {
                let min = origin + Vec2::new(col as f32, row as f32) * pixel;
                vertices.extend(rect(min, pixel, color));
            }
        }
    }
    vertices
}

/// Vector rendition of a trail glyph
pub fn glyph(glyph: Glyph, t: Transform, color: [f32; 4]) -> Vec<Vertex> {
    let stroke = 0.09 * t.scale;
    let p = |x: f32, y: f32| t.apply(Vec2::new(x, y));
    let angle = t.rotation.to_angle();
    let mut v = Vec::new();

    match glyph {
        Glyph::Note => {
            v.extend(ellipse(p(-0.12, 0.3), Vec2::new(0.16, 0.11) * t.scale, angle - 0.4, color, 12));
            v.extend(line(p(0.03, 0.28), p(0.03, -0.45), stroke, color));
            v.extend(line(p(0.03, -0.45), p(0.25, -0.2), stroke, color));
        }
        Glyph::DoubleNote => {
            for x in [-0.3, 0.2] {
                v.extend(ellipse(p(x, 0.3), Vec2::new(0.13, 0.09) * t.scale, angle - 0.4, color, 10));
                v.extend(line(p(x + 0.12, 0.28), p(x + 0.12, -0.4), stroke, color));
            }
            v.extend(line(p(-0.18, -0.4), p(0.32, -0.4), stroke * 1.5, color));
        }
        Glyph::Atom => {
            for k in 0..3 {
                let a = angle + k as f32 * PI / 3.0;
                v.extend(ellipse_outline(t.center, Vec2::new(0.48, 0.16) * t.scale, a, stroke * 0.7, color, 20));
            }
            v.extend(circle(t.center, 0.08 * t.scale, color, 8));
        }
        Glyph::Flask => {
            let outline = [p(-0.1, -0.45), p(-0.1, -0.1), p(-0.38, 0.42), p(0.38, 0.42), p(0.1, -0.1), p(0.1, -0.45)];
            v.extend(polyline(&outline, stroke, color, false));
            v.extend(triangle(p(-0.24, 0.15), p(-0.36, 0.4), p(0.36, 0.4), color));
            v.extend(triangle(p(-0.24, 0.15), p(0.36, 0.4), p(0.24, 0.15), color));
        }
        Glyph::Helix => {
            let strand = |phase: f32| -> Vec<Vec2> {
                (0..=16)
                    .map(|i| {
                        let y = i as f32 / 16.0 - 0.5;
                        p((y * TAU + phase).sin() * 0.25, y)
                    })
                    .collect()
            };
            v.extend(polyline(&strand(0.0), stroke, color, false));
            v.extend(polyline(&strand(PI), stroke, color, false));
            for i in 1..4 {
                let y = i as f32 / 4.0 - 0.5;
                let x = (y * TAU).sin() * 0.25;
                v.extend(line(p(x, y), p(-x, y), stroke * 0.5, color));
            }
        }
        Glyph::Sigma => {
            let path = [p(0.3, -0.4), p(-0.3, -0.4), p(0.05, 0.0), p(-0.3, 0.4), p(0.3, 0.4)];
            v.extend(polyline(&path, stroke, color, false));
        }
        Glyph::Infinity => {
            // Lemniscate of Bernoulli
            let path: Vec<Vec2> = (0..32)
                .map(|i| {
                    let s = i as f32 / 32.0 * TAU;
                    let d = 1.0 + s.sin() * s.sin();
                    p(0.45 * s.cos() / d, 0.45 * s.sin() * s.cos() / d)
                })
                .collect();
            v.extend(polyline(&path, stroke, color, true));
        }
        Glyph::Plus => {
            v.extend(line(p(-0.4, 0.0), p(0.4, 0.0), stroke * 1.5, color));
            v.extend(line(p(0.0, -0.4), p(0.0, 0.4), stroke * 1.5, color));
        }
        Glyph::Star => v.extend(star(t, 5, 0.45, color)),
        Glyph::Planet => {
            v.extend(circle(t.center, 0.25 * t.scale, color, 16));
            v.extend(ellipse_outline(t.center, Vec2::new(0.48, 0.12) * t.scale, angle - 0.3, stroke * 0.7, color, 20));
        }
        Glyph::Comet => {
            let mut tail = color;
            tail[3] = 0.0;
            v.extend(circle(p(0.25, -0.25), 0.14 * t.scale, color, 12));
            v.extend(line_gradient(p(0.25, -0.25), p(-0.45, 0.45), 0.2 * t.scale, color, tail));
        }
        Glyph::Sparkle => v.extend(star(t, 4, 0.25, color)),
    }
    v
}

/// Cartoon cat face; `variant` picks ears and expression
pub fn cat(t: Transform, variant: usize, fur: [f32; 4]) -> Vec<Vertex> {
    let p = |x: f32, y: f32| t.apply(Vec2::new(x, y));
    let dark = [0.1, 0.1, 0.1, fur[3]];
    let mut v = Vec::new();

    let ear_tilt = (variant % 3) as f32 * 0.05;
    v.extend(triangle(p(-0.42, -0.1), p(-0.38 - ear_tilt, -0.5), p(-0.1, -0.3), fur));
    v.extend(triangle(p(0.42, -0.1), p(0.38 + ear_tilt, -0.5), p(0.1, -0.3), fur));
    v.extend(circle(t.center, 0.4 * t.scale, fur, 20));

    // Closed eyes on odd variants
    for x in [-0.15, 0.15] {
        if variant % 2 == 0 {
            v.extend(circle(p(x, -0.05), 0.06 * t.scale, dark, 8));
        } else {
            v.extend(line(p(x - 0.07, -0.05), p(x + 0.07, -0.05), 0.04 * t.scale, dark));
        }
    }
    v.extend(triangle(p(-0.05, 0.08), p(0.05, 0.08), p(0.0, 0.14), dark));
    for side in [-1.0, 1.0] {
        v.extend(line(p(side * 0.12, 0.14), p(side * 0.45, 0.08), 0.015 * t.scale, dark));
        v.extend(line(p(side * 0.12, 0.17), p(side * 0.45, 0.22), 0.015 * t.scale, dark));
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 10.0, RED, 16);
        assert_eq!(verts.len(), 48);
        for v in &verts {
            let d = Vec2::from_array(v.position).length();
            assert!(d <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 4.0, RED).is_empty());
        assert_eq!(line(Vec2::ZERO, Vec2::X, 4.0, RED).len(), 6);
    }

    #[test]
    fn test_polyline_closed_adds_segment() {
        let pts = [Vec2::ZERO, Vec2::X, Vec2::ONE];
        assert_eq!(polyline(&pts, 1.0, RED, false).len(), 12);
        assert_eq!(polyline(&pts, 1.0, RED, true).len(), 18);
    }

    #[test]
    fn test_bitmap_draws_lit_pixels() {
        // Top row fully lit plus the centre pixel
        let pattern = 0b111 | 1 << 7;
        let verts = bitmap(pattern, Vec2::ZERO, Vec2::splat(2.0), RED);
        assert_eq!(verts.len(), 4 * 6);
    }

    #[test]
    fn test_transform_rotates() {
        let t = Transform::new(Vec2::new(10.0, 10.0), 2.0, 90.0);
        let p = t.apply(Vec2::X);
        assert!((p - Vec2::new(10.0, 12.0)).length() < 1e-4);
    }

    #[test]
    fn test_every_glyph_has_geometry() {
        let t = Transform::new(Vec2::new(50.0, 50.0), 24.0, 15.0);
        for theme in [
            crate::sim::TrailTheme::Music,
            crate::sim::TrailTheme::Science,
            crate::sim::TrailTheme::Math,
            crate::sim::TrailTheme::Astronomy,
        ] {
            for g in theme.glyphs() {
                let verts = glyph(*g, t, RED);
                assert!(!verts.is_empty(), "{g:?}");
                assert_eq!(verts.len() % 3, 0);
            }
        }
    }
}
