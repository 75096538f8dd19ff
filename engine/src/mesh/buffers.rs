//! Mesh Buffers
//!
//! Flat position/normal/uv/index buffers produced by the shape synthesizer,
//! the door cutter and the billboard builder, plus the interleaved vertex
//! format uploaded to the GPU.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Interleaved vertex uploaded to the GPU.
///
/// Matches the VertexInput struct in the scene shader:
/// - position: vec3<f32> at @location(0)
/// - normal: vec3<f32> at @location(1)
/// - uv: vec2<f32> at @location(2)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 32]);

impl MeshVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Raw geometry buffers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append one vertex and return its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv.to_array());
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append a flat quad. Corners must be counter-clockwise seen from the
    /// side `normal` points to.
    pub fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3, uvs: [Vec2; 4]) {
        let base = self.positions.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.push_vertex(corner, normal, uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Append another mesh, rebasing its indices.
    pub fn merge(&mut self, other: &MeshBuffers) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Copy with positions and normals transformed by `matrix`.
    pub fn transformed(&self, matrix: Mat4) -> MeshBuffers {
        let normal_matrix = matrix.inverse().transpose();
        MeshBuffers {
            positions: self
                .positions
                .iter()
                .map(|p| matrix.transform_point3(Vec3::from(*p)).to_array())
                .collect(),
            normals: self
                .normals
                .iter()
                .map(|n| {
                    normal_matrix
                        .transform_vector3(Vec3::from(*n))
                        .normalize_or_zero()
                        .to_array()
                })
                .collect(),
            uvs: self.uvs.clone(),
            indices: self.indices.clone(),
        }
    }

    /// Axis-aligned bounds, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions.iter().map(|p| Vec3::from(*p));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Volume enclosed by a closed, outward-wound triangle mesh.
    pub fn enclosed_volume(&self) -> f32 {
        let volume: f64 = self
            .indices
            .chunks_exact(3)
            .map(|tri| {
                let a = Vec3::from(self.positions[tri[0] as usize]).as_dvec3();
                let b = Vec3::from(self.positions[tri[1] as usize]).as_dvec3();
                let c = Vec3::from(self.positions[tri[2] as usize]).as_dvec3();
                a.dot(b.cross(c)) / 6.0
            })
            .sum();
        volume as f32
    }

    /// Interleave into GPU vertices.
    pub fn to_vertices(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((position, normal), uv)| MeshVertex {
                position: *position,
                normal: *normal,
                uv: *uv,
            })
            .collect()
    }

    /// Distinct face normals, compared with a small tolerance.
    pub fn distinct_normals(&self) -> Vec<Vec3> {
        let mut distinct: Vec<Vec3> = Vec::new();
        for n in &self.normals {
            let n = Vec3::from(*n);
            if !distinct.iter().any(|d| d.abs_diff_eq(n, 1e-4)) {
                distinct.push(n);
            }
        }
        distinct
    }
}

/// Closed box between `min` and `max` with outward counter-clockwise faces.
///
/// Top and bottom faces tile `repeat_u` on both axes; side faces tile
/// `repeat_u` along the run and `repeat_v` up the height.
pub fn cuboid(min: Vec3, max: Vec3, repeat_u: f32, repeat_v: f32) -> MeshBuffers {
    let (x1, y1, z1) = (min.x, min.y, min.z);
    let (x2, y2, z2) = (max.x, max.y, max.z);
    let (ru, rv) = (repeat_u, repeat_v);
    let uv = Vec2::new;

    let mut mesh = MeshBuffers::with_capacity(24, 36);
    // Bottom
    mesh.push_quad(
        [
            Vec3::new(x1, y1, z1),
            Vec3::new(x2, y1, z1),
            Vec3::new(x2, y1, z2),
            Vec3::new(x1, y1, z2),
        ],
        Vec3::NEG_Y,
        [uv(0.0, 0.0), uv(ru, 0.0), uv(ru, ru), uv(0.0, ru)],
    );
    // Top
    mesh.push_quad(
        [
            Vec3::new(x1, y2, z1),
            Vec3::new(x1, y2, z2),
            Vec3::new(x2, y2, z2),
            Vec3::new(x2, y2, z1),
        ],
        Vec3::Y,
        [uv(0.0, 0.0), uv(0.0, ru), uv(ru, ru), uv(ru, 0.0)],
    );
    // Front (z1)
    mesh.push_quad(
        [
            Vec3::new(x1, y1, z1),
            Vec3::new(x1, y2, z1),
            Vec3::new(x2, y2, z1),
            Vec3::new(x2, y1, z1),
        ],
        Vec3::NEG_Z,
        [uv(0.0, 0.0), uv(0.0, rv), uv(ru, rv), uv(ru, 0.0)],
    );
    // Back (z2)
    mesh.push_quad(
        [
            Vec3::new(x1, y1, z2),
            Vec3::new(x2, y1, z2),
            Vec3::new(x2, y2, z2),
            Vec3::new(x1, y2, z2),
        ],
        Vec3::Z,
        [uv(0.0, 0.0), uv(ru, 0.0), uv(ru, rv), uv(0.0, rv)],
    );
    // Left (x1)
    mesh.push_quad(
        [
            Vec3::new(x1, y1, z1),
            Vec3::new(x1, y1, z2),
            Vec3::new(x1, y2, z2),
            Vec3::new(x1, y2, z1),
        ],
        Vec3::NEG_X,
        [uv(0.0, 0.0), uv(ru, 0.0), uv(ru, rv), uv(0.0, rv)],
    );
    // Right (x2)
    mesh.push_quad(
        [
            Vec3::new(x2, y1, z1),
            Vec3::new(x2, y2, z1),
            Vec3::new(x2, y2, z2),
            Vec3::new(x2, y1, z2),
        ],
        Vec3::X,
        [uv(0.0, 0.0), uv(0.0, rv), uv(ru, rv), uv(ru, 0.0)],
    );
    mesh
}

/// Untiled box of `size` centred on `center`.
pub fn box_mesh(center: Vec3, size: Vec3) -> MeshBuffers {
    let half = size / 2.0;
    cuboid(center - half, center + half, 1.0, 1.0)
}

/// Horizontal plane facing up, centred on `center`.
pub fn plane(center: Vec3, width: f32, depth: f32) -> MeshBuffers {
    let (hw, hd) = (width / 2.0, depth / 2.0);
    let mut mesh = MeshBuffers::with_capacity(4, 6);
    mesh.push_quad(
        [
            center + Vec3::new(-hw, 0.0, -hd),
            center + Vec3::new(-hw, 0.0, hd),
            center + Vec3::new(hw, 0.0, hd),
            center + Vec3::new(hw, 0.0, -hd),
        ],
        Vec3::Y,
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ],
    );
    mesh
}

/// Unit quad in the XY plane facing +Z, centred on the origin.
///
/// Sprites are drawn with this quad and a camera-facing model matrix.
pub fn sprite_quad() -> MeshBuffers {
    let mut mesh = MeshBuffers::with_capacity(4, 6);
    mesh.push_quad(
        [
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ],
        Vec3::Z,
        [
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ],
    );
    mesh
}
