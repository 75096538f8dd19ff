//! Mesh Module
//!
//! CPU-side geometry: buffers, the GPU vertex format, primitive builders and
//! the shape synthesizer that extrudes floorplan surfaces.

pub mod buffers;
pub mod shapes;
pub mod triangulate;

pub use buffers::{MeshBuffers, MeshVertex, box_mesh, cuboid, plane, sprite_quad};
pub use shapes::{CIRCLE_SEGMENTS, synthesize};
