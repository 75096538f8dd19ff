//! CSG Module
//!
//! Boolean subtraction of closed triangle meshes, used to cut door
//! openings out of walls. The boolean itself runs in `csgrs`; this module
//! converts `MeshBuffers` to and from its polygon meshes.
//!
//! `csgrs` vertices carry no texture coordinates, so every input triangle
//! tags its polygon with a [`UvFrame`]: the affine position-to-UV map of
//! that triangle. Split pieces inherit the tag and get their UVs back
//! from it, which keeps tiling continuous across the cut.

use csgrs::float_types::Real;
use csgrs::mesh::Mesh as CsgMesh;
use csgrs::mesh::polygon::Polygon;
use csgrs::mesh::vertex::Vertex;
use csgrs::traits::CSG;
use glam::{DVec2, DVec3, Vec3};
use nalgebra::{Point3, Vector3};
use thiserror::Error;

use crate::mesh::MeshBuffers;

/// Why a boolean operation produced no usable mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CsgError {
    #[error("operand has no triangles")]
    EmptyOperand,

    #[error("operand contains non-finite coordinates")]
    NonFinite,

    #[error("subtraction removed the whole solid")]
    EmptyResult,
}

/// Affine map from a point on a triangle's plane to its texture coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvFrame {
    origin: DVec3,
    origin_uv: DVec2,
    u_gradient: DVec3,
    v_gradient: DVec3,
}

impl UvFrame {
    /// Frame reproducing `uvs` at the corners of triangle `p`.
    ///
    /// `None` for triangles with no area.
    pub fn from_triangle(p: [DVec3; 3], uvs: [DVec2; 3]) -> Option<Self> {
        let (e1, e2) = (p[1] - p[0], p[2] - p[0]);
        let (d1, d2) = (uvs[1] - uvs[0], uvs[2] - uvs[0]);

        // Gradients lie in the plane: g = a * e1 + b * e2 with g.e1 = d1, g.e2 = d2
        let (g11, g12, g22) = (e1.dot(e1), e1.dot(e2), e2.dot(e2));
        let det = g11 * g22 - g12 * g12;
        if det <= 1e-12 * g11 * g22 {
            return None;
        }
        let gradient = |r1: f64, r2: f64| {
            let a = (g22 * r1 - g12 * r2) / det;
            let b = (g11 * r2 - g12 * r1) / det;
            e1 * a + e2 * b
        };
        Some(Self {
            origin: p[0],
            origin_uv: uvs[0],
            u_gradient: gradient(d1.x, d2.x),
            v_gradient: gradient(d1.y, d2.y),
        })
    }

    pub fn uv_at(&self, point: DVec3) -> DVec2 {
        let offset = point - self.origin;
        self.origin_uv + DVec2::new(offset.dot(self.u_gradient), offset.dot(self.v_gradient))
    }
}

fn to_point(p: DVec3) -> Point3<Real> {
    Point3::new(p.x, p.y, p.z)
}

fn from_point(p: &Point3<Real>) -> DVec3 {
    DVec3::new(p.x, p.y, p.z)
}

/// Convert mesh triangles to `csgrs` polygons, dropping degenerate ones.
pub fn to_csg(mesh: &MeshBuffers) -> Result<CsgMesh<UvFrame>, CsgError> {
    if mesh.is_empty() {
        return Err(CsgError::EmptyOperand);
    }
    if mesh.positions.iter().flatten().any(|c| !c.is_finite()) {
        return Err(CsgError::NonFinite);
    }

    let position = |i: u32| Vec3::from(mesh.positions[i as usize]).as_dvec3();
    let uv = |i: u32| DVec2::from(mesh.uvs.get(i as usize).copied().unwrap_or_default().map(f64::from));

    let polygons: Vec<Polygon<UvFrame>> = mesh
        .indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&i| (i as usize) < mesh.positions.len()))
        .filter_map(|tri| {
            let p = [position(tri[0]), position(tri[1]), position(tri[2])];
            let normal = (p[1] - p[0]).cross(p[2] - p[0]).normalize_or_zero();
            if normal == DVec3::ZERO {
                return None;
            }
            let frame = UvFrame::from_triangle(p, [uv(tri[0]), uv(tri[1]), uv(tri[2])])?;
            let n = Vector3::new(normal.x, normal.y, normal.z);
            let vertices = p.iter().map(|&v| Vertex::new(to_point(v), n)).collect();
            Some(Polygon::new(vertices, Some(frame)))
        })
        .collect();

    if polygons.is_empty() {
        return Err(CsgError::EmptyOperand);
    }
    Ok(CsgMesh::from_polygons(&polygons, None))
}

/// Fan-triangulate `csgrs` polygons back into flat-shaded buffers.
pub fn from_csg(csg: &CsgMesh<UvFrame>) -> MeshBuffers {
    let vertex_count = csg.polygons.iter().map(|p| p.vertices.len()).sum();
    let mut mesh = MeshBuffers::with_capacity(vertex_count, vertex_count * 3);

    for polygon in &csg.polygons {
        if polygon.vertices.len() < 3 {
            continue;
        }
        let points: Vec<DVec3> = polygon.vertices.iter().map(|v| from_point(&v.pos)).collect();
        let Some(normal) = newell_normal(&points) else {
            continue;
        };
        let base = mesh.vertex_count() as u32;
        for &point in &points {
            let uv = polygon.metadata.map(|frame| frame.uv_at(point)).unwrap_or_default();
            mesh.push_vertex(point.as_vec3(), normal.as_vec3(), uv.as_vec2());
        }
        for i in 1..points.len() as u32 - 1 {
            mesh.push_triangle(base, base + i, base + i + 1);
        }
    }
    mesh
}

/// Face normal of a planar polygon, robust to collinear leading vertices.
fn newell_normal(points: &[DVec3]) -> Option<DVec3> {
    let mut normal = DVec3::ZERO;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    let normal = normal.normalize_or_zero();
    (normal != DVec3::ZERO).then_some(normal)
}

/// `a` with the volume of `b` removed.
pub fn subtract_mesh(a: &MeshBuffers, b: &MeshBuffers) -> Result<MeshBuffers, CsgError> {
    let result = to_csg(a)?.difference(&to_csg(b)?);
    let mesh = from_csg(&result);
    if mesh.is_empty() {
        return Err(CsgError::EmptyResult);
    }
    Ok(mesh)
}
