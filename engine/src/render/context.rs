//! Renderer Context
//!
//! The seam between scene construction and the GPU. The scene driver owns
//! a `Box<dyn RenderContext>` and hands `&mut` references to whatever needs
//! to upload or release resources. Nothing else touches the renderer.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use image::RgbaImage;

use crate::config::ViewerConfig;
use crate::config::viewer_config::unpack_rgb;
use crate::error::SceneError;
use crate::mesh::MeshBuffers;
use crate::scene::SceneGraph;

/// Uploaded mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshHandle(pub u32);

/// Uploaded bitmap, sampled with repeating addressing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureHandle(pub u32);

/// Ambient plus one directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub sun_color: [f32; 3],
    pub sun_intensity: f32,
    /// Position the sun shines from, towards the origin
    pub sun_position: Vec3,
}

impl Lighting {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            ambient_color: unpack_rgb(config.ambient_color),
            ambient_intensity: config.ambient_intensity,
            sun_color: unpack_rgb(config.sun_color),
            sun_intensity: config.sun_intensity,
            sun_position: config.sun_position,
        }
    }

    /// Unit direction the light travels in.
    pub fn sun_direction(&self) -> Vec3 {
        (-self.sun_position).normalize_or(Vec3::NEG_Y)
    }
}

/// Linear distance fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

impl Fog {
    pub fn new(color: u32, near: f32, far: f32) -> Self {
        Self {
            color: unpack_rgb(color),
            near,
            far,
        }
    }
}

/// Camera matrices for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub view: Mat4,
    pub projection: Mat4,
    pub position: Vec3,
}

/// Everything a renderer needs to draw one frame.
pub struct FrameView<'a> {
    pub graph: &'a SceneGraph,
    pub camera: CameraView,
    pub lighting: Lighting,
    pub fog: Option<Fog>,
    pub clear_color: [f32; 3],
    /// Draw every mesh as wireframe
    pub wireframe: bool,
}

/// GPU resource owner and frame submitter.
pub trait RenderContext {
    fn upload_mesh(&mut self, mesh: &MeshBuffers) -> MeshHandle;

    fn upload_texture(&mut self, image: &RgbaImage) -> TextureHandle;

    /// Releasing an unknown handle is a no-op.
    fn release_mesh(&mut self, handle: MeshHandle);

    /// Releasing an unknown handle is a no-op.
    fn release_texture(&mut self, handle: TextureHandle);

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), SceneError>;

    fn resize(&mut self, width: u32, height: u32);

    /// Release everything still held. Safe to call twice.
    fn dispose(&mut self);
}

/// Shared renderer, so a caller can keep inspecting the one it handed over.
impl<R: RenderContext + ?Sized> RenderContext for Rc<RefCell<R>> {
    fn upload_mesh(&mut self, mesh: &MeshBuffers) -> MeshHandle {
        self.borrow_mut().upload_mesh(mesh)
    }

    fn upload_texture(&mut self, image: &RgbaImage) -> TextureHandle {
        self.borrow_mut().upload_texture(image)
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        self.borrow_mut().release_mesh(handle)
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        self.borrow_mut().release_texture(handle)
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), SceneError> {
        self.borrow_mut().render(frame)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.borrow_mut().resize(width, height)
    }

    fn dispose(&mut self) {
        self.borrow_mut().dispose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lighting_from_defaults() {
        let lighting = Lighting::from_config(&ViewerConfig::default());
        assert_eq!(lighting.ambient_intensity, 0.5);
        assert_eq!(lighting.sun_color, [1.0, 1.0, 1.0]);
        let dir = lighting.sun_direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_fog_unpacks_color() {
        let fog = Fog::new(0xff0000, 1.0, 50.0);
        assert_eq!(fog.color, [1.0, 0.0, 0.0]);
    }
}
