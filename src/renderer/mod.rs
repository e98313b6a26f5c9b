//! WebGPU rendering module
//!
//! `present` turns a scene into a draw list in layout pixels; `pipeline`
//! uploads it and keeps the accumulation texture used for trails.

pub mod pipeline;
pub mod present;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use present::{Clear, DrawList, present};
pub use vertex::Vertex;
