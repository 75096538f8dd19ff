//! Texture Tiling
//!
//! Repeat factors are whole cell counts so tile edges land on grid lines.
//! Extents are measured in floorplan pixels; world-unit heights are
//! converted back to pixels (`× UNIT_SCALE`) before dividing by the cell size.

use crate::floorplan::Bounds;
use crate::world::UNIT_SCALE;

/// How many times a texture repeats across a face, per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileRepeat {
    pub u: f32,
    pub v: f32,
}

impl Default for TileRepeat {
    fn default() -> Self {
        Self::ONE
    }
}

impl TileRepeat {
    /// Untiled: the texture is stretched once over the face.
    pub const ONE: TileRepeat = TileRepeat { u: 1.0, v: 1.0 };

    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }

    /// Repeats for a footprint: `round(width / cell)`, `round(height / cell)`.
    pub fn for_footprint(bounds: &Bounds, cell_size: f32) -> Self {
        Self {
            u: repeat_count(bounds.width, cell_size),
            v: repeat_count(bounds.height, cell_size),
        }
    }

    /// Repeats for an extruded surface. U follows the footprint width and V
    /// follows the extrusion height in world units.
    pub fn for_extrusion(bounds: &Bounds, height_units: f32, cell_size: f32) -> Self {
        Self {
            u: repeat_count(bounds.width, cell_size),
            v: repeat_count(height_units * UNIT_SCALE, cell_size),
        }
    }

    /// Repeats only apply when a texture is actually bound.
    pub fn or_one(self, textured: bool) -> Self {
        if textured { self } else { Self::ONE }
    }
}

/// Whole number of cells covering `extent_px`, never less than one.
///
/// Rounds half away from zero, so 4.5 cells tile 5 times.
pub fn repeat_count(extent_px: f32, cell_size: f32) -> f32 {
    if !(cell_size > 0.0) || !extent_px.is_finite() {
        return 1.0;
    }
    (extent_px.abs() / cell_size).round().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_rounds_half_up() {
        assert_eq!(repeat_count(225.0, 50.0), 5.0);
        assert_eq!(repeat_count(200.0, 50.0), 4.0);
        assert_eq!(repeat_count(220.0, 50.0), 4.0);
    }

    #[test]
    fn test_repeat_never_below_one() {
        assert_eq!(repeat_count(10.0, 50.0), 1.0);
        assert_eq!(repeat_count(0.0, 50.0), 1.0);
        assert_eq!(repeat_count(100.0, 0.0), 1.0);
    }

    #[test]
    fn test_extrusion_uses_height_in_pixels() {
        let bounds = Bounds::new(0.0, 0.0, 500.0, 50.0);
        let repeat = TileRepeat::for_extrusion(&bounds, 4.0, 50.0);
        assert_eq!(repeat, TileRepeat::new(10.0, 4.0));
    }

    #[test]
    fn test_untextured_is_one() {
        let bounds = Bounds::new(0.0, 0.0, 500.0, 500.0);
        let repeat = TileRepeat::for_footprint(&bounds, 50.0).or_one(false);
        assert_eq!(repeat, TileRepeat::ONE);
    }
}
