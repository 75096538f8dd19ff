//! Grid Configuration Module
//!
//! Maps floorplan pixel coordinates onto world space.
//!
//! ## Units
//! - Floorplans are authored in pixels on a square grid.
//! - One world unit is always `UNIT_SCALE` (50) pixels, independent of the
//!   editor's cell size.
//! - The world origin sits under the centre of the floorplan, so
//!   `world_x = pixel_x / 50 - floor_width / 2`.

use glam::{Vec2, Vec3};

/// Pixels per world unit. Fixed; never derived from the cell size.
pub const UNIT_SCALE: f32 = 50.0;

/// Default number of floorplan pixels per grid cell.
pub const DEFAULT_CELL_SIZE: f32 = 50.0;

/// Grid and floor configuration for one loaded map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    /// Pixels per grid cell (editor setting)
    pub cell_size: f32,
    /// Floor width in world units (X axis)
    pub floor_width: f32,
    /// Floor depth in world units (Z axis)
    pub floor_depth: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            floor_width: 0.0,
            floor_depth: 0.0,
        }
    }
}

impl GridConfig {
    /// Create a grid for a floorplan of the given pixel dimensions.
    pub fn from_pixels(width_px: f32, height_px: f32, cell_size: f32) -> Self {
        Self {
            cell_size,
            floor_width: width_px / UNIT_SCALE,
            floor_depth: height_px / UNIT_SCALE,
        }
    }

    /// Create a grid from a cell count (the persisted `gridSettings` form).
    pub fn from_cells(cells_wide: f32, cells_deep: f32, cell_size: f32) -> Self {
        Self::from_pixels(cells_wide * cell_size, cells_deep * cell_size, cell_size)
    }

    /// Convert a pixel length to world units.
    #[inline]
    pub fn to_units(&self, pixels: f32) -> f32 {
        pixels / UNIT_SCALE
    }

    /// Convert a floorplan pixel position to the world ground plane (x, z).
    #[inline]
    pub fn to_world(&self, px: f32, py: f32) -> Vec2 {
        Vec2::new(
            px / UNIT_SCALE - self.floor_width / 2.0,
            py / UNIT_SCALE - self.floor_depth / 2.0,
        )
    }

    /// Convert a floorplan pixel position to a world position at height `y`.
    #[inline]
    pub fn to_world_at(&self, px: f32, py: f32, y: f32) -> Vec3 {
        let ground = self.to_world(px, py);
        Vec3::new(ground.x, y, ground.y)
    }

    /// Width of one grid cell in world units.
    #[inline]
    pub fn cell_units(&self) -> f32 {
        self.cell_size / UNIT_SCALE
    }

    /// World-space bounding box of the floor up to `height`.
    pub fn world_bounds(&self, height: f32) -> (Vec3, Vec3) {
        let half = Vec3::new(self.floor_width / 2.0, 0.0, self.floor_depth / 2.0);
        (
            Vec3::new(-half.x, 0.0, -half.z),
            Vec3::new(half.x, height, half.z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels_scales_by_fifty() {
        let grid = GridConfig::from_pixels(1000.0, 500.0, 50.0);
        assert_eq!(grid.floor_width, 20.0);
        assert_eq!(grid.floor_depth, 10.0);
    }

    #[test]
    fn test_to_world_is_centered() {
        let grid = GridConfig::from_pixels(1000.0, 1000.0, 50.0);
        assert_eq!(grid.to_world(500.0, 500.0), Vec2::ZERO);
        assert_eq!(grid.to_world(0.0, 0.0), Vec2::new(-10.0, -10.0));
        assert_eq!(grid.to_world(1000.0, 250.0), Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_unit_scale_ignores_cell_size() {
        // A 25px cell changes door widths and token scale, not coordinates
        let grid = GridConfig::from_pixels(1000.0, 1000.0, 25.0);
        assert_eq!(grid.to_world(750.0, 500.0), Vec2::new(5.0, 0.0));
        assert_eq!(grid.cell_units(), 0.5);
    }

    #[test]
    fn test_from_cells() {
        let grid = GridConfig::from_cells(20.0, 10.0, 50.0);
        assert_eq!(grid.floor_width, 20.0);
        assert_eq!(grid.floor_depth, 10.0);
    }

    #[test]
    fn test_world_bounds() {
        let grid = GridConfig::from_pixels(1000.0, 500.0, 50.0);
        let (min, max) = grid.world_bounds(4.0);
        assert_eq!(min, Vec3::new(-10.0, 0.0, -5.0));
        assert_eq!(max, Vec3::new(10.0, 4.0, 5.0));
    }
}
