//! Doors Module
//!
//! Cuts door openings out of wall meshes, adds the decorative frame around
//! each opening and builds textured door slabs.

pub mod cutter;
pub mod frame;
pub mod panel;

pub use cutter::{DoorCut, WallAxis, cut_doors, cutter_mesh};
pub use frame::frame_mesh;
pub use panel::{door_panel, on_vertical_edge};

use crate::config::ViewerConfig;

/// Door sizes in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorDimensions {
    /// Opening width: one grid cell
    pub width: f32,
    pub cut_height: f32,
    pub cut_margin: f32,
    pub frame_height: f32,
    pub frame_thickness: f32,
    pub frame_depth: f32,
    pub panel_ratio: f32,
    pub panel_depth: f32,
}

impl DoorDimensions {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            width: config.door_width(),
            cut_height: config.door_cut_height,
            cut_margin: config.door_cut_margin,
            frame_height: config.door_frame_height,
            frame_thickness: config.door_frame_thickness,
            frame_depth: config.door_frame_depth,
            panel_ratio: config.door_panel_ratio,
            panel_depth: config.door_panel_depth,
        }
    }
}

impl Default for DoorDimensions {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}
