//! World Module
//!
//! World-space configuration: grid cell size, floor extent and the
//! pixel-to-world coordinate convention shared by every builder.

pub mod grid;

pub use grid::{DEFAULT_CELL_SIZE, GridConfig, UNIT_SCALE};
