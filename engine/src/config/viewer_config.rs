//! Viewer Configuration
//!
//! Single source of truth for the walkthrough's dimensions, speeds and
//! lighting. Every field has a default, so a config file only needs to
//! list the values it overrides.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::world::DEFAULT_CELL_SIZE;

/// Walkthrough configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    // Grid
    /// Floorplan pixels per grid cell
    pub cell_size: f32,

    // Extrusion
    /// Height of every extruded room and wall, in world units
    pub wall_height: f32,

    // Player
    /// Camera height above the floor, re-applied every frame
    pub eye_height: f32,
    /// Movement per frame while walking
    pub walk_speed: f32,
    /// Movement per frame while sprinting
    pub sprint_speed: f32,
    /// Mouse look sensitivity in radians per pixel
    pub mouse_sensitivity: f32,

    // Doors
    /// Height of the volume cut out of a wall
    pub door_cut_height: f32,
    /// Extra width/depth added to the cutter so it clears the wall faces
    pub door_cut_margin: f32,
    /// Height of the decorative frame around an opening
    pub door_frame_height: f32,
    /// Cross-section of a frame bar
    pub door_frame_thickness: f32,
    /// Depth of the frame bars through the wall
    pub door_frame_depth: f32,
    /// Door panel height as a fraction of the wall height
    pub door_panel_ratio: f32,
    /// Door panel thickness
    pub door_panel_depth: f32,

    // Tokens
    /// Base height a token sprite floats at (multiplied by creature size)
    pub token_height: f32,
    /// Cell size the token art is authored against
    pub token_reference_cell: f32,

    // Camera
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    // Lighting
    /// Clear colour (0xRRGGBB)
    pub background: u32,
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub sun_color: u32,
    pub sun_intensity: f32,
    /// Position the directional light shines from
    pub sun_position: Vec3,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,

            wall_height: 4.0,

            eye_height: 1.7,
            walk_speed: 0.025,
            sprint_speed: 0.05,
            mouse_sensitivity: 0.002,

            door_cut_height: 2.1,
            door_cut_margin: 0.1,
            door_frame_height: 2.0,
            door_frame_thickness: 0.04,
            door_frame_depth: 0.28,
            door_panel_ratio: 0.8,
            door_panel_depth: 0.15,

            token_height: 2.0,
            token_reference_cell: 25.0,

            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,

            background: 0x222222,
            ambient_color: 0x404040,
            ambient_intensity: 0.5,
            sun_color: 0xffffff,
            sun_intensity: 0.8,
            sun_position: Vec3::new(5.0, 10.0, 5.0),
        }
    }
}

impl ViewerConfig {
    /// Parse a config from JSON text. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Width of a door opening: exactly one grid cell.
    pub fn door_width(&self) -> f32 {
        self.cell_size / crate::world::UNIT_SCALE
    }
}

/// Split a packed 0xRRGGBB colour into linear-ish [0, 1] components.
pub fn unpack_rgb(color: u32) -> [f32; 3] {
    [
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
    ]
}
