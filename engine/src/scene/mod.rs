//! Scene Module
//!
//! The node graph handed to renderers and the driver that builds it from a
//! floorplan and runs the per-frame loop.

pub mod driver;
pub mod graph;
pub mod pending;

pub use driver::{FrameStatus, SceneDriver};
pub use graph::{NodeId, NodeKind, SceneGraph, SceneNode, Transform};
pub use pending::PendingTexture;
