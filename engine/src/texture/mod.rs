//! Texture Module
//!
//! Tiling repeat factors, background bitmap loading and texture regions
//! cropped from the floor bitmap.

pub mod region;
pub mod slot;
pub mod tiling;

pub use region::crop_region;
pub use slot::{SlotEvent, TextureError, TextureSlot, decode_data_url, load_source};
pub use tiling::{TileRepeat, repeat_count};
