//! Render Module
//!
//! The `RenderContext` seam plus two implementations: an in-memory
//! recorder for headless use and a wgpu renderer for the walkthrough
//! window.

pub mod context;
pub mod gpu_context;
pub mod headless;
pub mod shader;
pub mod wgpu_renderer;

pub use context::{CameraView, Fog, FrameView, Lighting, MeshHandle, RenderContext, TextureHandle};
pub use gpu_context::{GpuContext, GpuContextConfig};
pub use headless::{FrameRecord, HeadlessRenderer};
pub use shader::{GlobalUniforms, ObjectUniforms, SCENE_SHADER};
pub use wgpu_renderer::WgpuRenderer;
