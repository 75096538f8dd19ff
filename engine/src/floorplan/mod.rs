//! Floorplan Module
//!
//! Data model for the 2D floorplan: surfaces (rooms and walls), door and
//! encounter markers, creature tokens and the saved scene JSON.

pub mod marker;
pub mod scene_file;
pub mod surface;
pub mod token;

pub use marker::{DoorMarker, EncounterMarker, Marker, MonsterRecord};
pub use scene_file::{BaseImage, Floorplan, GridSettings, SceneFile};
pub use surface::{
    Bounds, PixelPoint, ROOM_TEXTURE_REGION, Shape, Surface, SurfaceKind, WALL_TEXTURE_REGION,
};
pub use token::{SizeCategory, Token, TokenKind, size_in_squares};
