//! Map Walker Engine Library
//!
//! Turns a 2D floorplan (rooms, walls, doors and creature tokens drawn on a
//! pixel grid) into a 3D scene you can walk through in first person.
//!
//! # Modules
//!
//! - [`world`] - Grid configuration and pixel to world conversion
//! - [`floorplan`] - Surfaces, markers, tokens and the saved scene JSON
//! - [`mesh`] - Mesh buffers and the shape synthesizer
//! - [`texture`] - Tiling repeat, background bitmap loading, texture regions
//! - [`material`] - Material descriptors and the texture fallback chain
//! - [`csg`] - Boolean mesh subtraction
//! - [`doors`] - Door openings, frames and panels
//! - [`tokens`] - Billboard token sprites with floor proxies
//! - [`input`] - Platform-agnostic keys, mouse buttons and pointer lock
//! - [`camera`] - First-person camera
//! - [`navigation`] - Walk/sprint movement driven by input
//! - [`render`] - Renderer context trait, headless and wgpu renderers
//! - [`scene`] - Scene graph and the lifecycle driver
//! - [`config`] - Viewer configuration
//!
//! # Example
//!
//! ```ignore
//! use map_walker_engine::config::ViewerConfig;
//! use map_walker_engine::material::NoAssets;
//! use map_walker_engine::render::HeadlessRenderer;
//! use map_walker_engine::scene::{FrameStatus, SceneDriver};
//!
//! let mut driver = SceneDriver::new(
//!     ViewerConfig::default(),
//!     Box::new(HeadlessRenderer::new(1280, 720)),
//!     Box::new(NoAssets),
//! );
//! driver.load_from_json(&std::fs::read_to_string("dungeon.json")?)?;
//!
//! while driver.frame()? == FrameStatus::Continue {
//!     // feed input through driver.navigation_mut()
//! #   break;
//! }
//! driver.cleanup();
//! ```

pub mod camera;
pub mod config;
pub mod csg;
pub mod doors;
pub mod error;
pub mod floorplan;
pub mod input;
pub mod material;
pub mod mesh;
pub mod navigation;
pub mod render;
pub mod scene;
pub mod texture;
pub mod tokens;
pub mod world;

// Re-export the types most callers need
pub use config::ViewerConfig;
pub use error::SceneError;
pub use floorplan::{Floorplan, SceneFile};
pub use scene::{FrameStatus, SceneDriver};
pub use world::GridConfig;
