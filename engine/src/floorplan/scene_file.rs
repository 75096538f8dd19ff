//! Floorplans and the persisted scene JSON.
//!
//! A `Floorplan` is what the editor hands over live: pixel dimensions, the
//! decoded base bitmap, surfaces and markers. A `SceneFile` is the saved
//! form (`gridSettings`, `rooms`, `mapImage`, `playerStart`, `markers`)
//! and converts into a `Floorplan` once the cell size is known.

use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::marker::Marker;
use super::surface::{PixelPoint, Surface};
use crate::error::SceneError;

/// Floor bitmap, either already decoded or still to be loaded.
#[derive(Clone, Debug)]
pub enum BaseImage {
    Decoded(Arc<RgbaImage>),
    /// Data URL or file path, decoded in the background
    Source(String),
}

/// Everything needed to build one scene.
#[derive(Clone, Debug)]
pub struct Floorplan {
    pub width_px: f32,
    pub height_px: f32,
    pub cell_size: f32,
    pub base_image: Option<BaseImage>,
    pub surfaces: Vec<Surface>,
    pub markers: Vec<Marker>,
    pub player_start: Option<PixelPoint>,
}

impl Floorplan {
    pub fn new(width_px: f32, height_px: f32, cell_size: f32) -> Self {
        Self {
            width_px,
            height_px,
            cell_size,
            base_image: None,
            surfaces: Vec::new(),
            markers: Vec::new(),
            player_start: None,
        }
    }

    /// Use a decoded bitmap as the floor; its size becomes the floorplan size.
    pub fn with_bitmap(mut self, image: Arc<RgbaImage>) -> Self {
        self.width_px = image.width() as f32;
        self.height_px = image.height() as f32;
        self.base_image = Some(BaseImage::Decoded(image));
        self
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surfaces.push(surface);
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn surface(&self, id: &str) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    /// Surface with the given editor name, used for texture-source regions.
    pub fn named(&self, name: &str) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.name.as_deref() == Some(name))
    }

    pub fn bitmap(&self) -> Option<&Arc<RgbaImage>> {
        match &self.base_image {
            Some(BaseImage::Decoded(image)) => Some(image),
            _ => None,
        }
    }
}

/// Persisted grid dimensions, counted in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_size: Option<f32>,
}

/// Saved scene as written by the editor's export.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFile {
    #[serde(default)]
    pub grid_settings: GridSettings,
    #[serde(default)]
    pub rooms: Vec<Surface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_start: Option<PixelPoint>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl SceneFile {
    pub fn parse(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Convert to a floorplan. Grid settings count cells, so the pixel size
    /// is `cells × cell_size`; a cell size stored in the file wins over the
    /// configured one.
    pub fn into_floorplan(self, default_cell_size: f32) -> Floorplan {
        let cell_size = self
            .grid_settings
            .cell_size
            .filter(|c| *c > 0.0)
            .unwrap_or(default_cell_size);
        Floorplan {
            width_px: self.grid_settings.width * cell_size,
            height_px: self.grid_settings.height * cell_size,
            cell_size,
            base_image: self
                .map_image
                .filter(|s| !s.is_empty())
                .map(BaseImage::Source),
            surfaces: self.rooms,
            markers: self.markers,
            player_start: self.player_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "gridSettings": { "width": 20, "height": 20 },
        "rooms": [
            { "id": "room", "type": "room", "shape": "rectangle",
              "bounds": { "x": 0, "y": 0, "width": 1000, "height": 1000 } }
        ],
        "mapImage": "data:image/png;base64,AAAA",
        "playerStart": { "x": 500, "y": 500 },
        "markers": [ { "id": "m", "type": "poi", "x": 0, "y": 0 } ]
    }"#;

    #[test]
    fn test_parse_scene_file() {
        let file = SceneFile::parse(SCENE).unwrap();
        assert_eq!(file.rooms.len(), 1);
        assert_eq!(file.markers.len(), 1);
        assert_eq!(file.player_start, Some(PixelPoint::new(500.0, 500.0)));
    }

    #[test]
    fn test_grid_cells_become_pixels() {
        let plan = SceneFile::parse(SCENE).unwrap().into_floorplan(50.0);
        assert_eq!(plan.width_px, 1000.0);
        assert_eq!(plan.height_px, 1000.0);
        assert!(matches!(plan.base_image, Some(BaseImage::Source(_))));
    }

    #[test]
    fn test_empty_scene_parses() {
        let file = SceneFile::parse("{}").unwrap();
        assert!(file.rooms.is_empty());
        assert!(file.map_image.is_none());
    }

    #[test]
    fn test_bitmap_sets_dimensions() {
        let image = Arc::new(RgbaImage::new(640, 480));
        let plan = Floorplan::new(0.0, 0.0, 50.0).with_bitmap(image);
        assert_eq!((plan.width_px, plan.height_px), (640.0, 480.0));
        assert!(plan.bitmap().is_some());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(SceneFile::parse("[1, 2"), Err(SceneError::Json(_))));
    }
}
