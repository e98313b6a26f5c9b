//! Raster presenter: scene state to triangles
//!
//! Runs once per frame after the simulation step. Fire cells become quads
//! stretched over the viewport; strokes (streaks, vines, die edges) become
//! thick line quads. Persistence trails (hyperspace, matrix) are expressed
//! through `Clear::Fade` rather than by re-drawing history.

use glam::Vec2;

use super::shapes::{self, Transform};
use super::vertex::{Vertex, colors};
use crate::Viewport;
use crate::overlay::Scene;
use crate::overlay::scene::ADMIN_BACKDROP;
use crate::sim::d20::FACES;
use crate::sim::matrix::{CELL_SIZE, FADE_ALPHA, GLYPH_COLS, GLYPH_ROWS};
use crate::sim::{
    CatRain, DiceRoller, DragonFlight, FireGrid, GoatShow, JungleScene, Lightsaber, MatrixRain,
    PointerTrail, RollPhase, Starfield, intensity_rgba,
};

/// Streak persistence: each frame paints black at this alpha over the last
const STREAK_FADE: f32 = 0.4;
const CAT_SIZE: f32 = 48.0;
const SYMBOL_SIZE: f32 = 28.0;
const DRAGON_SIZE: f32 = 320.0;

/// How the previous frame is treated before drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clear {
    /// Start from transparent
    Full,
    /// Darken the previous frame by this alpha, then draw on top
    Fade(f32),
    /// Leave the previous frame untouched
    Keep,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub clear: Clear,
    pub vertices: Vec<Vertex>,
}

impl DrawList {
    fn new(clear: Clear) -> Self {
        Self {
            clear,
            vertices: Vec::new(),
        }
    }

    fn push(&mut self, vertices: impl IntoIterator<Item = Vertex>) {
        self.vertices.extend(vertices);
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Geometry for the current state of `scene`
pub fn present(scene: &Scene, viewport: Viewport) -> DrawList {
    match scene {
        Scene::Fire(grid) => fire(grid, viewport),
        Scene::Goat(show) => goat(show, viewport),
        Scene::Dragon(flight) => dragon(flight, viewport),
        Scene::Jungle(jungle) => jungle_scene(jungle, viewport),
        Scene::Lightsaber(saber) => lightsaber(saber, viewport),
        Scene::Cats(rain) => cats(rain),
        Scene::Matrix(rain) => matrix(rain),
        Scene::Trail(trail) => pointer_trail(trail),
        Scene::Admin => {
            let mut list = DrawList::new(Clear::Full);
            list.push(full_rect(viewport, [0.0, 0.0, 0.0, ADMIN_BACKDROP]));
            list
        }
        Scene::Hyperspace(field) => hyperspace(field),
        Scene::Dice(roller) => dice(roller),
    }
}

fn full_rect(viewport: Viewport, color: [f32; 4]) -> Vec<Vertex> {
    shapes::rect(Vec2::ZERO, Vec2::new(viewport.width, viewport.height), color)
}

fn fire(grid: &FireGrid, viewport: Viewport) -> DrawList {
    let mut list = DrawList::new(Clear::Full);
    let cell = Vec2::new(
        viewport.width / grid.width() as f32,
        viewport.height / grid.height() as f32,
    );
    list.vertices.reserve(grid.cells().len() * 6);
    for (y, row) in grid.rows().enumerate() {
        for (x, &intensity) in row.iter().enumerate() {
            let min = Vec2::new(x as f32, y as f32) * cell;
            let color = colors::from_rgba8(intensity_rgba(intensity));
            list.push(shapes::rect(min, cell, color));
        }
    }
    list
}

fn hyperspace(field: &Starfield) -> DrawList {
    let mut list = DrawList::new(Clear::Fade(STREAK_FADE));
    for streak in field.streaks() {
        if streak.width <= 0.0 {
            continue;
        }
        let head = colors::with_alpha([1.0, 1.0, 1.0], streak.alpha);
        let tail = colors::with_alpha([0.6, 0.8, 1.0], 0.0);
        list.push(shapes::line_gradient(
            streak.from,
            streak.to,
            streak.width,
            tail,
            head,
        ));
    }
    list
}

fn dice(roller: &DiceRoller) -> DrawList {
    let mut list = DrawList::new(Clear::Full);
    let verts = roller.projected_vertices();
    let (rgb, stroke_alpha) = match roller.phase() {
        RollPhase::Critical => (colors::DIE_RED, 0.8),
        RollPhase::Rolling | RollPhase::Settled => (colors::DIE_BLUE, 0.4),
    };
    let fill = colors::with_alpha(rgb, 0.05);
    let stroke = colors::with_alpha(rgb, stroke_alpha);

    for [a, b, c] in FACES {
        let (a, b, c) = (verts[a], verts[b], verts[c]);
        list.push(shapes::triangle(a, b, c, fill));
        list.push(shapes::polyline(&[a, b, c], 1.5, stroke, true));
    }

    for p in roller.particles().particles() {
        let color = colors::with_alpha(p.color, p.alpha.clamp(0.0, 1.0));
        list.push(shapes::rect(p.pos - Vec2::splat(1.5), Vec2::splat(3.0), color));
    }
    list
}

fn cats(rain: &CatRain) -> DrawList {
    let mut list = DrawList::new(Clear::Full);
    for body in rain.bodies() {
        let fur = colors::CAT_FUR[body.glyph % colors::CAT_FUR.len()];
        let t = Transform::new(body.pos, CAT_SIZE * body.scale, body.rotation);
        list.push(shapes::cat(t, body.glyph, colors::with_alpha(fur, 1.0)));
    }
    list
}

fn matrix(rain: &MatrixRain) -> DrawList {
    let stamps = rain.stamps();
    if stamps.is_empty() {
        return DrawList::new(Clear::Keep);
    }
    let mut list = DrawList::new(Clear::Fade(FADE_ALPHA));
    let pixel = Vec2::new(
        CELL_SIZE / (GLYPH_COLS + 1) as f32,
        CELL_SIZE / (GLYPH_ROWS + 1) as f32,
    );
    for stamp in stamps {
        let origin = Vec2::new(stamp.column as f32, stamp.row as f32) * CELL_SIZE;
        let color = if stamp.white {
            colors::WHITE
        } else {
            colors::MATRIX_GREEN
        };
        list.push(shapes::bitmap(stamp.pattern, origin, pixel, color));
    }
    list
}

fn pointer_trail(trail: &PointerTrail) -> DrawList {
    let mut list = DrawList::new(Clear::Full);
    for symbol in trail.symbols() {
        let pose = symbol.pose();
        if pose.opacity <= 0.0 || pose.scale <= 0.0 {
            continue;
        }
        let t = Transform::new(pose.pos, SYMBOL_SIZE * pose.scale, pose.rotation);
        list.push(shapes::glyph(
            symbol.glyph,
            t,
            colors::with_alpha(symbol.color, pose.opacity),
        ));
    }
    list
}

fn lightsaber(saber: &Lightsaber, viewport: Viewport) -> DrawList {
    let mut list = DrawList::new(Clear::Full);
    let hilt = saber.position();
    let up = Vec2::from_angle(saber.swing().to_radians()).rotate(Vec2::NEG_Y);
    let tip = hilt + up * viewport.height * 0.45;

    let mut glow = colors::SABER_BLADE;
    glow[3] = 0.3;
    list.push(shapes::line(hilt, tip, 22.0, glow));
    list.push(shapes::line(hilt, tip, 10.0, colors::SABER_BLADE));
    list.push(shapes::line(hilt, tip, 4.0, colors::SABER_CORE));
    list.push(shapes::circle(tip, 5.0, colors::SABER_BLADE, 12));
    list.push(shapes::line(hilt, hilt - up * 70.0, 14.0, colors::SABER_HILT));
    list
}

fn dragon(flight: &DragonFlight, viewport: Viewport) -> DrawList {
    let mut list = DrawList::new(Clear::Full);

    let shadow = flight.shadow();
    if shadow.opacity > 0.0 {
        let center = Vec2::new(
            shadow.x + DRAGON_SIZE * 0.5 * shadow.scale,
            viewport.height - 40.0,
        );
        list.push(shapes::ellipse(
            center,
            Vec2::new(DRAGON_SIZE * 0.5, 24.0) * shadow.scale,
            0.0,
            [0.0, 0.0, 0.0, shadow.opacity],
            24,
        ));
    }

    let pose = flight.pose();
    let size = DRAGON_SIZE * pose.scale;
    let t = Transform::new(pose.pos + Vec2::splat(size * 0.5), size, pose.rotation);
    let p = |x: f32, y: f32| t.apply(Vec2::new(x, y));

    // Flying right to left: head on the left
    list.push(shapes::triangle(p(-0.05, -0.05), p(0.25, -0.48), p(0.2, 0.0), colors::DRAGON_WING));
    list.push(shapes::triangle(p(0.0, -0.02), p(0.45, -0.35), p(0.25, 0.02), colors::DRAGON_WING));
    list.push(shapes::ellipse(p(0.05, 0.05), Vec2::new(0.25, 0.1) * size, t.rotation.to_angle(), colors::DRAGON, 20));
    list.push(shapes::polyline(&[p(0.28, 0.05), p(0.4, 0.12), p(0.5, 0.05)], 0.05 * size, colors::DRAGON, false));
    list.push(shapes::line(p(-0.15, 0.02), p(-0.32, -0.08), 0.08 * size, colors::DRAGON));
    list.push(shapes::circle(p(-0.36, -0.1), 0.07 * size, colors::DRAGON, 12));
    list.push(shapes::circle(p(-0.39, -0.12), 0.015 * size, [1.0, 0.85, 0.1, 1.0], 6));
    list
}

/// CSS `hue-rotate()` matrix applied to `rgb`
pub fn hue_rotate(rgb: [f32; 3], degrees: f32) -> [f32; 3] {
    let (s, c) = degrees.to_radians().sin_cos();
    let m = [
        [
            0.213 + c * 0.787 - s * 0.213,
            0.715 - c * 0.715 - s * 0.715,
            0.072 - c * 0.072 + s * 0.928,
        ],
        [
            0.213 - c * 0.213 + s * 0.143,
            0.715 + c * 0.285 + s * 0.140,
            0.072 - c * 0.072 - s * 0.283,
        ],
        [
            0.213 - c * 0.213 - s * 0.787,
            0.715 - c * 0.715 + s * 0.715,
            0.072 + c * 0.928 + s * 0.072,
        ],
    ];
    m.map(|row| (row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]).clamp(0.0, 1.0))
}

fn goat(show: &GoatShow, viewport: Viewport) -> DrawList {
    let mut list = DrawList::new(Clear::Full);
    let f = show.frame();

    list.push(full_rect(viewport, [0.0, 0.0, 0.0, 0.85 * f.opacity]));

    let center = viewport.center() + f.jitter;
    let radius = viewport.width.min(viewport.height) * 0.25;
    let portrait = colors::with_alpha(hue_rotate([0.55, 0.2, 0.75], f.hue), f.opacity);
    let mut glitch = colors::GOAT_GLITCH;
    glitch[3] *= f.opacity;
    list.push(shapes::circle(center + Vec2::new(f.glitch, 0.0), radius, glitch, 32));
    list.push(shapes::circle(center, radius, portrait, 32));

    let banner = Vec2::new(radius * 2.4, radius * 0.35) * f.title_scale;
    let top = Vec2::new(viewport.center().x, center.y + radius * 1.25) - banner * 0.5;
    let mut gold = colors::GOAT_TITLE;
    gold[3] *= f.opacity;
    list.push(shapes::rect(top, banner, gold));

    if f.strobe > 0.0 {
        list.push(full_rect(viewport, [1.0, 1.0, 1.0, 0.8 * f.strobe * f.opacity]));
    }
    list
}

fn jungle_scene(jungle: &JungleScene, viewport: Viewport) -> DrawList {
    let mut list = DrawList::new(Clear::Full);
    let elapsed = jungle.elapsed();

    list.push(full_rect(viewport, [0.02, 0.12, 0.05, 0.35]));

    for vine in jungle.vines() {
        let pose = vine.pose(elapsed, viewport);
        if pose.length <= 0.0 {
            continue;
        }
        let dir = Vec2::from_angle(pose.angle.to_radians()).rotate(Vec2::Y);
        let end = pose.anchor + dir * pose.length;
        let color = colors::with_alpha(vine.color, 1.0);
        list.push(shapes::line(pose.anchor, end, vine.thickness, color));

        let leaf = colors::with_alpha(crate::sim::jungle::LEAF_COLOR, 0.9);
        let mut along = 40.0;
        let mut side = 1.0;
        while along < pose.length {
            let at = pose.anchor + dir * along;
            let angle = dir.to_angle() + side * 0.8;
            list.push(shapes::ellipse(at, Vec2::new(10.0, 4.0), angle, leaf, 8));
            along += 40.0;
            side = -side;
        }
    }

    for bush in jungle.bushes() {
        let width = bush.width * viewport.width;
        let left = bush.left * viewport.width;
        let base = viewport.height + bush.offset;
        let color = colors::with_alpha(bush.color, 1.0);
        list.push(shapes::ellipse(
            Vec2::new(left + width * 0.5, base),
            Vec2::new(width * 0.5, width * 0.35),
            0.0,
            color,
            24,
        ));
        let lobe = if bush.mirrored { 0.75 } else { 0.25 };
        list.push(shapes::circle(
            Vec2::new(left + width * lobe, base - width * 0.25),
            width * 0.2,
            color,
            16,
        ));
    }

    for leaf in jungle.leaves() {
        if let Some(pose) = leaf.pose(elapsed, viewport) {
            let color = colors::with_alpha(crate::sim::jungle::LEAF_COLOR, pose.opacity);
            list.push(shapes::ellipse(
                pose.pos,
                Vec2::new(12.0, 5.0),
                pose.rotation.to_radians(),
                color,
                8,
            ));
        }
    }
    list
}
