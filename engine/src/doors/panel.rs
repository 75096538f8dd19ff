//! Door panels: a thin textured slab standing in an opening.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use super::DoorDimensions;
use crate::floorplan::{DoorMarker, Surface};
use crate::mesh::{MeshBuffers, box_mesh};
use crate::world::GridConfig;

/// True when the door sits closer to the wall's left or right edge than to
/// its top or bottom edge.
pub fn on_vertical_edge(door: &DoorMarker, wall: &Surface) -> bool {
    let b = &wall.bounds;
    let (x, y) = (door.position.x, door.position.y);
    let horizontal = (x - b.x).abs().min((x - (b.x + b.width)).abs());
    let vertical = (y - b.y).abs().min((y - (b.y + b.height)).abs());
    horizontal < vertical
}

/// Panel mesh for a textured door, in world space.
///
/// Returns `None` for doors without a texture.
pub fn door_panel(
    door: &DoorMarker,
    wall: &Surface,
    grid: &GridConfig,
    wall_height: f32,
    dims: &DoorDimensions,
) -> Option<MeshBuffers> {
    door.texture_ref.as_ref()?;

    let height = wall_height * dims.panel_ratio;
    let slab = box_mesh(Vec3::ZERO, Vec3::new(grid.cell_units(), height, dims.panel_depth));
    let rotation = if on_vertical_edge(door, wall) {
        Quat::from_rotation_y(FRAC_PI_2)
    } else {
        Quat::IDENTITY
    };
    let position = grid.to_world_at(door.position.x, door.position.y, height / 2.0);
    Some(slab.transformed(Mat4::from_rotation_translation(rotation, position)))
}
