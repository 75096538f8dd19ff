//! Shape Synthesizer
//!
//! Extrudes a surface footprint from the floor (y = 0) to its height.
//!
//! ## Shapes
//! - Box: 6 faces × 4 vertices, one normal per face.
//! - Circle: 32-segment cylinder; walls also get fanned top/bottom caps.
//! - Polygon: one quad per edge; walls also get ear-clipped caps.
//!
//! Every face is wound counter-clockwise seen from outside so the result is
//! a closed solid the door cutter can subtract from. A degenerate footprint
//! produces empty buffers.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::buffers::{MeshBuffers, cuboid};
use super::triangulate::{signed_area2, triangulate};
use crate::floorplan::{PixelPoint, Shape, Surface};
use crate::texture::TileRepeat;
use crate::world::GridConfig;

/// Angular segments of a circular footprint.
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Build the mesh for one surface.
///
/// `height` is the extrusion height in world units and `repeat` the tiling
/// of the bound texture (`TileRepeat::ONE` when untextured).
pub fn synthesize(surface: &Surface, grid: &GridConfig, height: f32, repeat: TileRepeat) -> MeshBuffers {
    if surface.bounds.is_degenerate() || !(height > 0.0) {
        tracing::debug!("[ShapeSynth] surface {} has a degenerate footprint", surface.id);
        return MeshBuffers::new();
    }
    match &surface.shape {
        Shape::Box => synthesize_box(surface, grid, height, repeat),
        Shape::Circle => synthesize_circle(surface, grid, height, repeat),
        Shape::Polygon(points) => synthesize_polygon(surface, points, grid, height, repeat),
    }
}

fn synthesize_box(surface: &Surface, grid: &GridConfig, height: f32, repeat: TileRepeat) -> MeshBuffers {
    let b = &surface.bounds;
    let min = grid.to_world(b.x, b.y);
    let max = grid.to_world(b.x + b.width, b.y + b.height);
    cuboid(
        Vec3::new(min.x, 0.0, min.y),
        Vec3::new(max.x, height, max.y),
        repeat.u,
        repeat.v,
    )
}

fn synthesize_circle(surface: &Surface, grid: &GridConfig, height: f32, repeat: TileRepeat) -> MeshBuffers {
    let b = &surface.bounds;
    let c = b.center();
    let center = grid.to_world(c.x, c.y);
    let radius = grid.to_units(b.width.max(b.height)) / 2.0;
    let segments = CIRCLE_SEGMENTS;
    let ring = |i: u32| {
        let theta = i as f32 / segments as f32 * TAU;
        Vec2::new(theta.cos(), theta.sin())
    };

    let caps = surface.is_wall();
    let vertex_estimate = 2 * (segments as usize + 1) + if caps { 2 * (segments as usize + 2) } else { 0 };
    let mut mesh = MeshBuffers::with_capacity(vertex_estimate, segments as usize * if caps { 12 } else { 6 });

    // Side strip: ring i has bottom vertex 2i and top vertex 2i + 1. Ring
    // `segments` repeats ring 0's angle so the strip closes with its own UVs.
    for i in 0..=segments {
        let dir = ring(i);
        let normal = Vec3::new(dir.x, 0.0, dir.y);
        let foot = Vec3::new(center.x + dir.x * radius, 0.0, center.y + dir.y * radius);
        let u = i as f32 / segments as f32 * repeat.u;
        mesh.push_vertex(foot, normal, Vec2::new(u, 0.0));
        mesh.push_vertex(foot + Vec3::Y * height, normal, Vec2::new(u, repeat.v));
    }
    for i in 0..segments {
        let base = 2 * i;
        mesh.push_triangle(base, base + 1, base + 2);
        mesh.push_triangle(base + 1, base + 3, base + 2);
    }

    if caps {
        for (y, normal) in [(0.0, Vec3::NEG_Y), (height, Vec3::Y)] {
            let cap_uv = |dir: Vec2| (Vec2::splat(0.5) + dir * 0.5) * repeat.u;
            let hub = mesh.push_vertex(Vec3::new(center.x, y, center.y), normal, Vec2::splat(0.5 * repeat.u));
            let first = hub + 1;
            for i in 0..=segments {
                let dir = ring(i);
                let p = Vec3::new(center.x + dir.x * radius, y, center.y + dir.y * radius);
                mesh.push_vertex(p, normal, cap_uv(dir));
            }
            for i in 0..segments {
                let (cur, next) = (first + i, first + i + 1);
                if normal.y < 0.0 {
                    mesh.push_triangle(hub, cur, next);
                } else {
                    mesh.push_triangle(hub, next, cur);
                }
            }
        }
    }
    mesh
}

fn synthesize_polygon(
    surface: &Surface,
    points: &[PixelPoint],
    grid: &GridConfig,
    height: f32,
    repeat: TileRepeat,
) -> MeshBuffers {
    if points.len() < 3 {
        tracing::warn!(
            "[ShapeSynth] polygon {} has {} points, need at least 3",
            surface.id,
            points.len()
        );
        return MeshBuffers::new();
    }
    let b = &surface.bounds;
    let mut outline: Vec<Vec2> = points
        .iter()
        .map(|p| grid.to_world(b.x + p.x, b.y + p.y))
        .collect();

    let area2 = signed_area2(&outline);
    if area2.abs() <= f32::EPSILON {
        tracing::warn!("[ShapeSynth] polygon {} encloses no area", surface.id);
        return MeshBuffers::new();
    }
    // In (x, z) a negative shoelace area puts the outward normal on the
    // left-hand side of each edge quad.
    if area2 > 0.0 {
        outline.reverse();
    }

    let footprint_width = grid.to_units(b.width);
    let mut mesh = MeshBuffers::with_capacity(outline.len() * 4, outline.len() * 6);
    for (p1, p2) in outline.iter().zip(outline.iter().cycle().skip(1)) {
        let edge = *p2 - *p1;
        let length = edge.length();
        if length <= f32::EPSILON {
            continue;
        }
        let normal = Vec3::new(-edge.y, 0.0, edge.x) / length;
        let u = length / footprint_width * repeat.u;
        mesh.push_quad(
            [
                Vec3::new(p1.x, 0.0, p1.y),
                Vec3::new(p2.x, 0.0, p2.y),
                Vec3::new(p2.x, height, p2.y),
                Vec3::new(p1.x, height, p1.y),
            ],
            normal,
            [
                Vec2::new(0.0, 0.0),
                Vec2::new(u, 0.0),
                Vec2::new(u, repeat.v),
                Vec2::new(0.0, repeat.v),
            ],
        );
    }

    if surface.is_wall() {
        match triangulate(&outline) {
            Some(triangles) => push_polygon_caps(&mut mesh, &outline, &triangles, height, repeat),
            None => tracing::warn!("[ShapeSynth] polygon {} caps could not be triangulated", surface.id),
        }
    }
    mesh
}

fn push_polygon_caps(
    mesh: &mut MeshBuffers,
    outline: &[Vec2],
    triangles: &[[usize; 3]],
    height: f32,
    repeat: TileRepeat,
) {
    let (min, max) = outline
        .iter()
        .fold((outline[0], outline[0]), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
    let extent = (max - min).max(Vec2::splat(f32::EPSILON));

    for (y, normal) in [(0.0, Vec3::NEG_Y), (height, Vec3::Y)] {
        let base = mesh.vertex_count() as u32;
        for p in outline {
            let uv = (*p - min) / extent * repeat.u;
            mesh.push_vertex(Vec3::new(p.x, y, p.y), normal, uv);
        }
        for &[a, b, c] in triangles {
            // (b - a) × (c - a) has y = -(2D cross), so a negative 2D cross faces up.
            let cross = (outline[b] - outline[a]).perp_dot(outline[c] - outline[a]);
            let faces_up = cross < 0.0;
            let (b, c) = if faces_up == (normal.y > 0.0) { (b, c) } else { (c, b) };
            mesh.push_triangle(base + a as u32, base + b as u32, base + c as u32);
        }
    }
}
