//! Vertex types for 2D rendering
//!
//! Positions are in screen pixels (origin top-left); the pipeline maps them
//! to clip space.

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Overlay palette
pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const DIE_BLUE: [f32; 3] = [0.180, 0.427, 0.706];
    pub const DIE_RED: [f32; 3] = [0.937, 0.267, 0.267];
    pub const MATRIX_GREEN: [f32; 4] = [0.0, 1.0, 0.255, 1.0];
    pub const SABER_BLADE: [f32; 4] = [0.3, 0.6, 1.0, 0.9];
    pub const SABER_CORE: [f32; 4] = [0.95, 0.97, 1.0, 1.0];
    pub const SABER_HILT: [f32; 4] = [0.55, 0.55, 0.6, 1.0];
    pub const DRAGON: [f32; 4] = [0.75, 0.12, 0.08, 1.0];
    pub const DRAGON_WING: [f32; 4] = [0.5, 0.05, 0.05, 0.9];
    pub const GOAT_GLITCH: [f32; 4] = [1.0, 0.0, 0.0, 0.5];
    pub const GOAT_TITLE: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const CAT_FUR: [[f32; 3]; 3] = [[0.96, 0.62, 0.26], [0.55, 0.55, 0.58], [0.2, 0.2, 0.22]];

    /// `rgb` with an alpha channel
    pub fn with_alpha(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
        [rgb[0], rgb[1], rgb[2], alpha]
    }

    /// Palette bytes as linear-ish floats
    pub fn from_rgba8(rgba: [u8; 4]) -> [f32; 4] {
        rgba.map(|c| c as f32 / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 24);
        assert_eq!(desc.attributes[1].offset, 8);
        assert_eq!(desc.attributes[0].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(desc.attributes[1].format, wgpu::VertexFormat::Float32x4);
    }

    #[test]
    fn test_vertex_equality() {
        let v = Vertex::new(1.0, 2.0, colors::WHITE);
        assert_eq!(v, Vertex::new(1.0, 2.0, [1.0; 4]));
        assert_ne!(v, Vertex::new(1.0, 2.0, [0.0; 4]));
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(colors::with_alpha([0.1, 0.2, 0.3], 0.5), [0.1, 0.2, 0.3, 0.5]);
        assert_eq!(colors::from_rgba8([255, 0, 255, 0]), [1.0, 0.0, 1.0, 0.0]);
    }
}
