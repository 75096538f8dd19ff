//! Door openings cut out of wall meshes.

use glam::Vec3;
use tracing::{debug, warn};

use super::{DoorDimensions, frame_mesh};
use crate::csg::subtract_mesh;
use crate::floorplan::{DoorMarker, Surface};
use crate::mesh::{MeshBuffers, box_mesh};
use crate::world::GridConfig;

/// Direction a wall's long side runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallAxis {
    X,
    Z,
}

impl WallAxis {
    /// Walls at least as wide as they are deep run along X.
    pub fn of(wall: &Surface) -> Self {
        if wall.bounds.width >= wall.bounds.height {
            WallAxis::X
        } else {
            WallAxis::Z
        }
    }
}

/// Result of cutting every door of one wall.
#[derive(Clone, Debug)]
pub struct DoorCut {
    /// Wall geometry after all openings were removed
    pub mesh: MeshBuffers,
    /// All frames for this wall merged into one mesh
    pub frames: Option<MeshBuffers>,
    /// Openings actually cut
    pub cut_count: usize,
}

impl DoorCut {
    fn uncut(mesh: &MeshBuffers) -> Self {
        Self {
            mesh: mesh.clone(),
            frames: None,
            cut_count: 0,
        }
    }
}

/// Ground position of the opening for `door` in `wall`.
///
/// The opening is centred across the wall thickness and clamped to the
/// wall's span, so a marker sitting a little off the wall still cuts it.
fn opening_center(wall: &Surface, door: &DoorMarker, grid: &GridConfig) -> Vec3 {
    let b = &wall.bounds;
    let center = b.center();
    let px = match WallAxis::of(wall) {
        WallAxis::X => (door.position.x.clamp(b.x, b.x + b.width), center.y),
        WallAxis::Z => (center.x, door.position.y.clamp(b.y, b.y + b.height)),
    };
    grid.to_world_at(px.0, px.1, 0.0)
}

/// Box volume removed from `wall` by `door`.
///
/// The box is slightly larger than the opening in every direction except
/// height, and dips below the floor, so none of its faces are coplanar
/// with the wall's.
pub fn cutter_mesh(wall: &Surface, door: &DoorMarker, grid: &GridConfig, dims: &DoorDimensions) -> MeshBuffers {
    let thickness = grid.to_units(wall.bounds.width.min(wall.bounds.height));
    let ground = opening_center(wall, door, grid);

    let across = dims.width + dims.cut_margin;
    let through = thickness + dims.cut_margin;
    let height = dims.cut_height + dims.cut_margin;
    let size = match WallAxis::of(wall) {
        WallAxis::X => Vec3::new(across, height, through),
        WallAxis::Z => Vec3::new(through, height, across),
    };
    let center = Vec3::new(ground.x, (dims.cut_height - dims.cut_margin) / 2.0, ground.z);
    box_mesh(center, size)
}

/// Cut every door of `wall` out of `mesh` and build their frames.
///
/// Doors are applied one after another. If any subtraction fails the
/// input mesh is returned uncut and without frames.
pub fn cut_doors(
    mesh: &MeshBuffers,
    wall: &Surface,
    doors: &[&DoorMarker],
    grid: &GridConfig,
    dims: &DoorDimensions,
) -> DoorCut {
    if doors.is_empty() {
        return DoorCut::uncut(mesh);
    }

    let rotated = WallAxis::of(wall) == WallAxis::Z;
    let mut current = mesh.clone();
    let mut frames = MeshBuffers::new();

    for door in doors {
        let cutter = cutter_mesh(wall, door, grid, dims);
        match subtract_mesh(&current, &cutter) {
            Ok(result) => {
                debug!(
                    "[Doors] Cut door {} into wall {} ({} triangles)",
                    door.id,
                    wall.id,
                    result.triangle_count()
                );
                current = result;
                frames.merge(&frame_mesh(opening_center(wall, door, grid), rotated, dims));
            }
            Err(e) => {
                warn!(
                    "[Doors] Failed to cut door {} into wall {}: {}; keeping wall uncut",
                    door.id, wall.id, e
                );
                return DoorCut::uncut(mesh);
            }
        }
    }

    DoorCut {
        mesh: current,
        frames: Some(frames),
        cut_count: doors.len(),
    }
}
