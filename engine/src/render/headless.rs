//! Headless Renderer
//!
//! In-memory `RenderContext` that records what was uploaded, drawn and
//! released. Used by tests and tools that build scenes without a window.

use std::collections::BTreeMap;

use image::RgbaImage;

use super::context::{FrameView, MeshHandle, RenderContext, TextureHandle};
use crate::error::SceneError;
use crate::mesh::MeshBuffers;

/// Summary of one rendered frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameRecord {
    /// Visible nodes submitted
    pub draws: usize,
    /// Billboarded nodes among them
    pub billboards: usize,
    pub fogged: bool,
    pub wireframe: bool,
}

/// Records renderer traffic instead of drawing.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    meshes: BTreeMap<MeshHandle, usize>,
    textures: BTreeMap<TextureHandle, (u32, u32)>,
    next_mesh: u32,
    next_texture: u32,
    frames: Vec<FrameRecord>,
    size: (u32, u32),
    released_meshes: usize,
    released_textures: usize,
    disposed: bool,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    /// Meshes currently held.
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Textures currently held.
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn mesh_vertex_count(&self, handle: MeshHandle) -> Option<usize> {
        self.meshes.get(&handle).copied()
    }

    pub fn texture_size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&handle).copied()
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn released_meshes(&self) -> usize {
        self.released_meshes
    }

    pub fn released_textures(&self) -> usize {
        self.released_textures
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl RenderContext for HeadlessRenderer {
    fn upload_mesh(&mut self, mesh: &MeshBuffers) -> MeshHandle {
        let handle = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        self.meshes.insert(handle, mesh.vertex_count());
        handle
    }

    fn upload_texture(&mut self, image: &RgbaImage) -> TextureHandle {
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(handle, image.dimensions());
        handle
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if self.meshes.remove(&handle).is_some() {
            self.released_meshes += 1;
        }
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_some() {
            self.released_textures += 1;
        }
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), SceneError> {
        if self.disposed {
            return Err(SceneError::NotInitialized);
        }
        let visible = frame.graph.iter().filter(|(_, node)| node.visible);
        let (draws, billboards) = visible.fold((0, 0), |(d, b), (_, node)| {
            (d + 1, b + usize::from(node.billboard))
        });
        self.frames.push(FrameRecord {
            draws,
            billboards,
            fogged: frame.fog.is_some(),
            wireframe: frame.wireframe,
        });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
        }
    }

    fn dispose(&mut self) {
        self.released_meshes += self.meshes.len();
        self.released_textures += self.textures.len();
        self.meshes.clear();
        self.textures.clear();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::box_mesh;
    use glam::Vec3;

    #[test]
    fn test_upload_and_release() {
        let mut renderer = HeadlessRenderer::new(800, 600);
        let mesh = renderer.upload_mesh(&box_mesh(Vec3::ZERO, Vec3::ONE));
        let texture = renderer.upload_texture(&RgbaImage::new(4, 2));
        assert_eq!(renderer.mesh_vertex_count(mesh), Some(24));
        assert_eq!(renderer.texture_size(texture), Some((4, 2)));

        renderer.release_mesh(mesh);
        renderer.release_mesh(mesh);
        renderer.release_texture(texture);
        assert_eq!(renderer.live_meshes(), 0);
        assert_eq!(renderer.released_meshes(), 1);
        assert_eq!(renderer.released_textures(), 1);
    }

    #[test]
    fn test_dispose_releases_everything() {
        let mut renderer = HeadlessRenderer::new(800, 600);
        renderer.upload_mesh(&box_mesh(Vec3::ZERO, Vec3::ONE));
        renderer.upload_mesh(&box_mesh(Vec3::ONE, Vec3::ONE));
        renderer.dispose();
        renderer.dispose();
        assert_eq!(renderer.live_meshes(), 0);
        assert_eq!(renderer.released_meshes(), 2);
        assert!(renderer.is_disposed());
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut renderer = HeadlessRenderer::new(800, 600);
        renderer.resize(0, 100);
        assert_eq!(renderer.size(), (800, 600));
        renderer.resize(1024, 768);
        assert_eq!(renderer.size(), (1024, 768));
    }
}
