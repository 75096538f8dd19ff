//! Door frames: four bars around an opening.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use super::DoorDimensions;
use crate::mesh::{MeshBuffers, box_mesh};

/// Frame for an opening centred on `ground` (y ignored).
///
/// Bars are laid out across X; `rotated` turns the frame 90° about Y for
/// walls that run along Z.
pub fn frame_mesh(ground: Vec3, rotated: bool, dims: &DoorDimensions) -> MeshBuffers {
    let (w, h) = (dims.width, dims.frame_height);
    let (t, d) = (dims.frame_thickness, dims.frame_depth);

    let bars = [
        // Top
        (Vec3::new(0.0, h, 0.0), Vec3::new(w + t * 2.0, t, d)),
        // Bottom
        (Vec3::ZERO, Vec3::new(w + t * 2.0, t, d)),
        // Left
        (Vec3::new(-w / 2.0 - t / 2.0, h / 2.0, 0.0), Vec3::new(t, h, d)),
        // Right
        (Vec3::new(w / 2.0 + t / 2.0, h / 2.0, 0.0), Vec3::new(t, h, d)),
    ];

    let mut frame = MeshBuffers::with_capacity(bars.len() * 24, bars.len() * 36);
    for (center, size) in bars {
        frame.merge(&box_mesh(center, size));
    }

    let rotation = if rotated {
        Quat::from_rotation_y(FRAC_PI_2)
    } else {
        Quat::IDENTITY
    };
    frame.transformed(Mat4::from_rotation_translation(
        rotation,
        Vec3::new(ground.x, 0.0, ground.z),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_has_four_bars() {
        let frame = frame_mesh(Vec3::ZERO, false, &DoorDimensions::default());
        assert_eq!(frame.vertex_count(), 4 * 24);
        assert_eq!(frame.indices.len(), 4 * 36);
    }

    #[test]
    fn test_frame_surrounds_opening() {
        let dims = DoorDimensions::default();
        let frame = frame_mesh(Vec3::new(3.0, 9.0, -2.0), false, &dims);
        let (min, max) = frame.bounds().unwrap();
        let half = dims.width / 2.0 + dims.frame_thickness;
        assert!((min.x - (3.0 - half)).abs() < 1e-5);
        assert!((max.x - (3.0 + half)).abs() < 1e-5);
        assert!((max.y - (dims.frame_height + dims.frame_thickness / 2.0)).abs() < 1e-5);
        assert!((max.z - (-2.0 + dims.frame_depth / 2.0)).abs() < 1e-5);
    }

    #[test]
    fn test_rotated_frame_runs_along_z() {
        let dims = DoorDimensions::default();
        let frame = frame_mesh(Vec3::ZERO, true, &dims);
        let (min, max) = frame.bounds().unwrap();
        assert!((max.z - min.z) > (max.x - min.x));
    }
}
