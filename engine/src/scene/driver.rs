//! Scene Driver
//!
//! Owns the renderer and one live scene built from a floorplan. Build order
//! is fixed: floor plane, legacy texture regions, every surface (walls with
//! their doors), then tokens. `frame` is the per-tick entry point and does
//! nothing once `cleanup` has run.

use glam::Vec3;
use tracing::{debug, info, warn};

use super::graph::{NodeId, NodeKind, SceneGraph, SceneNode};
use super::pending::PendingTexture;
use crate::config::ViewerConfig;
use crate::doors::{DoorDimensions, cut_doors, door_panel};
use crate::error::SceneError;
use crate::floorplan::{BaseImage, DoorMarker, Floorplan, SceneFile, Surface, SurfaceKind, Token};
use crate::material::{AssetSource, Material, MaterialBinder, ResolvedTexture, TextureCategory};
use crate::mesh::{MeshBuffers, plane, synthesize};
use crate::navigation::NavigationController;
use crate::render::{CameraView, Fog, FrameView, Lighting, RenderContext};
use crate::texture::TextureSlot;
use crate::tokens::{TokenLayout, TokenManager};
use crate::world::GridConfig;

/// Floor plane lift above y = 0, clear of room bottoms
const FLOOR_LIFT: f32 = 0.01;

/// What the caller should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    /// The scene was cleaned up; stop scheduling frames
    Stopped,
}

/// State that exists only between `initialize_map` and `cleanup`.
struct LiveScene {
    grid: GridConfig,
    graph: SceneGraph,
    navigation: NavigationController,
    tokens: TokenManager,
    pending: Vec<PendingTexture>,
    lighting: Lighting,
    fog: Option<Fog>,
    wireframe: bool,
}

/// Builds, drives and tears down the walkthrough scene.
pub struct SceneDriver {
    config: ViewerConfig,
    renderer: Box<dyn RenderContext>,
    assets: Box<dyn AssetSource>,
    binder: MaterialBinder,
    scene: Option<LiveScene>,
    disposed: bool,
    viewport: (u32, u32),
}

impl SceneDriver {
    pub fn new(config: ViewerConfig, renderer: Box<dyn RenderContext>, assets: Box<dyn AssetSource>) -> Self {
        let binder = MaterialBinder::new(config.cell_size);
        Self {
            config,
            renderer,
            assets,
            binder,
            scene: None,
            disposed: false,
            viewport: (1, 1),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Texture assignments consulted when surfaces are built.
    pub fn binder_mut(&mut self) -> &mut MaterialBinder {
        &mut self.binder
    }

    pub fn is_active(&self) -> bool {
        self.scene.is_some()
    }

    pub fn graph(&self) -> Option<&SceneGraph> {
        self.scene.as_ref().map(|scene| &scene.graph)
    }

    pub fn grid(&self) -> Option<&GridConfig> {
        self.scene.as_ref().map(|scene| &scene.grid)
    }

    pub fn tokens(&self) -> Option<&TokenManager> {
        self.scene.as_ref().map(|scene| &scene.tokens)
    }

    pub fn navigation(&self) -> Option<&NavigationController> {
        self.scene.as_ref().map(|scene| &scene.navigation)
    }

    /// Input goes here. `None` while no scene is live.
    pub fn navigation_mut(&mut self) -> Option<&mut NavigationController> {
        self.scene.as_mut().map(|scene| &mut scene.navigation)
    }

    pub fn fog(&self) -> Option<Fog> {
        self.scene.as_ref().and_then(|scene| scene.fog)
    }

    pub fn is_wireframe(&self) -> bool {
        self.scene.as_ref().is_some_and(|scene| scene.wireframe)
    }

    /// Number of nodes still waiting for a bitmap.
    pub fn pending_textures(&self) -> usize {
        self.scene.as_ref().map_or(0, |scene| {
            scene.pending.len() + usize::from(scene.tokens.has_pending())
        })
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build a scene from a floorplan, replacing any scene already live.
    pub fn initialize_map(&mut self, floorplan: Floorplan) -> Result<(), SceneError> {
        if self.disposed {
            return Err(SceneError::NotInitialized);
        }
        self.clear_scene();

        let grid = GridConfig::from_pixels(floorplan.width_px, floorplan.height_px, floorplan.cell_size);
        self.binder.set_cell_size(floorplan.cell_size);
        info!(
            "[SceneDriver] Building {}x{} map ({} surfaces, {} markers)",
            grid.floor_width,
            grid.floor_depth,
            floorplan.surfaces.len(),
            floorplan.markers.len()
        );

        let mut navigation = NavigationController::new(&self.config);
        let (width, height) = self.viewport;
        navigation.camera.set_aspect(width, height);

        let mut scene = LiveScene {
            grid,
            graph: SceneGraph::new(),
            navigation,
            tokens: TokenManager::new(TokenLayout::new(grid, &self.config)),
            pending: Vec::new(),
            lighting: Lighting::from_config(&self.config),
            fog: None,
            wireframe: false,
        };

        self.binder.load_legacy_regions(&floorplan);
        self.build_floor(&mut scene, &floorplan);
        self.build_surfaces(&mut scene, &floorplan);
        self.build_tokens(&mut scene, &floorplan);

        if let Some(start) = floorplan.player_start {
            let ground = grid.to_world(start.x, start.y);
            scene.navigation.place(ground.x, ground.y);
        }

        info!(
            "[SceneDriver] Scene ready: {} nodes, {} tokens",
            scene.graph.len(),
            scene.tokens.len()
        );
        self.scene = Some(scene);
        Ok(())
    }

    /// Parse a saved scene and build it.
    pub fn load_from_json(&mut self, json: &str) -> Result<(), SceneError> {
        let file = SceneFile::parse(json)?;
        self.initialize_map(file.into_floorplan(self.config.cell_size))
    }

    fn build_floor(&mut self, scene: &mut LiveScene, floorplan: &Floorplan) {
        let grid = scene.grid;
        if !(grid.floor_width > 0.0 && grid.floor_depth > 0.0) {
            warn!("[SceneDriver] Floorplan has no area, skipping floor");
            return;
        }
        let mesh = plane(Vec3::new(0.0, FLOOR_LIFT, 0.0), grid.floor_width, grid.floor_depth);
        let node = self.add_node(scene, NodeKind::Floor, "floor", &mesh, Material::floor(), None);

        let slot = match &floorplan.base_image {
            Some(BaseImage::Decoded(image)) => TextureSlot::Ready(image.clone()),
            Some(BaseImage::Source(source)) => TextureSlot::load(source.clone()),
            None => return,
        };
        scene.pending.push(PendingTexture::bitmap(node, slot, Material::floor()));
    }

    fn build_surfaces(&mut self, scene: &mut LiveScene, floorplan: &Floorplan) {
        let dims = DoorDimensions::from_config(&self.config);
        warn_orphan_doors(floorplan);

        for surface in &floorplan.surfaces {
            if surface.is_texture_region() {
                debug!("[SceneDriver] {} is a texture region, not extruded", surface.id);
                continue;
            }

            let height = surface.height_or(self.config.wall_height);
            let binding = self.binder.bind(surface, height, self.assets.as_ref());
            let mesh = synthesize(surface, &scene.grid, height, binding.repeat());
            if mesh.is_empty() {
                warn!("[SceneDriver] Surface {} produced no geometry, skipping", surface.id);
                continue;
            }
            let fallback = binding.fallback().clone();

            let node = match surface.kind {
                SurfaceKind::Room => self.add_node(scene, NodeKind::Room, &surface.id, &mesh, fallback, None),
                SurfaceKind::Wall => self.build_wall(scene, floorplan, surface, &mesh, fallback, &dims),
            };
            if !binding.is_settled() {
                scene.pending.push(PendingTexture::surface(node, binding));
            }
        }
    }

    /// Wall with its doors cut, a frame group and any textured door panels.
    fn build_wall(
        &mut self,
        scene: &mut LiveScene,
        floorplan: &Floorplan,
        wall: &Surface,
        mesh: &MeshBuffers,
        material: Material,
        dims: &DoorDimensions,
    ) -> NodeId {
        let doors: Vec<&DoorMarker> = floorplan
            .markers
            .iter()
            .filter_map(|marker| marker.as_door())
            .filter(|door| door.parent_wall_id.as_deref() == Some(wall.id.as_str()))
            .collect();

        let cut = cut_doors(mesh, wall, &doors, &scene.grid, dims);
        let node = self.add_node(scene, NodeKind::Wall, &wall.id, &cut.mesh, material, None);

        if let Some(frames) = cut.frames.filter(|frames| !frames.is_empty()) {
            self.add_node(scene, NodeKind::DoorFrame, &wall.id, &frames, Material::door_frame(), Some(node));
        }

        let wall_height = wall.height_or(self.config.wall_height);
        for door in doors {
            let Some(panel) = door_panel(door, wall, &scene.grid, wall_height, dims) else {
                continue;
            };
            let panel_node = self.add_node(scene, NodeKind::DoorPanel, &door.id, &panel, Material::door_panel(), Some(node));
            if let Some(texture_ref) = door.texture_ref.as_deref() {
                let slot = self.door_art(texture_ref);
                scene.pending.push(PendingTexture::bitmap(panel_node, slot, Material::door_panel()));
            }
        }
        node
    }

    /// Door textures may name a `doors` asset or carry the image itself.
    fn door_art(&self, texture_ref: &str) -> TextureSlot {
        match self.assets.get_texture(texture_ref, TextureCategory::Doors) {
            Some(asset) => asset.source.open(),
            None => TextureSlot::load(texture_ref),
        }
    }

    fn build_tokens(&mut self, scene: &mut LiveScene, floorplan: &Floorplan) {
        for encounter in floorplan.markers.iter().filter_map(|marker| marker.as_encounter()) {
            match encounter.to_token() {
                Some(token) => {
                    scene.tokens.create(token, &mut scene.graph, self.renderer.as_mut());
                }
                None => debug!("[SceneDriver] Encounter {} has no monster, no token", encounter.id),
            }
        }
    }

    fn add_node(
        &mut self,
        scene: &mut LiveScene,
        kind: NodeKind,
        element_id: &str,
        mesh: &MeshBuffers,
        material: Material,
        parent: Option<NodeId>,
    ) -> NodeId {
        let handle = self.renderer.upload_mesh(mesh);
        let mut node = SceneNode::new(kind, element_id, handle, material).with_vertex_count(mesh.vertex_count());
        if let Some(parent) = parent {
            node = node.with_parent(parent);
        }
        scene.graph.add(node)
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Run one frame: move the camera, swap in loaded textures and draw.
    ///
    /// Returns `Stopped` without doing anything once the scene is gone.
    pub fn frame(&mut self) -> Result<FrameStatus, SceneError> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(FrameStatus::Stopped);
        };
        let renderer = self.renderer.as_mut();

        scene.navigation.tick();
        poll_pending(scene, renderer);
        scene.tokens.poll_textures(&mut scene.graph, renderer);

        let camera = &scene.navigation.camera;
        let frame = FrameView {
            graph: &scene.graph,
            camera: CameraView {
                view: camera.view_matrix(),
                projection: camera.projection_matrix(),
                position: camera.position,
            },
            lighting: scene.lighting,
            fog: scene.fog,
            clear_color: crate::config::viewer_config::unpack_rgb(self.config.background),
            wireframe: scene.wireframe,
        };
        renderer.render(&frame)?;
        Ok(FrameStatus::Continue)
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    pub fn create_token(&mut self, token: Token) -> Result<NodeId, SceneError> {
        let scene = self.scene.as_mut().ok_or(SceneError::NotInitialized)?;
        Ok(scene.tokens.create(token, &mut scene.graph, self.renderer.as_mut()))
    }

    /// Move a token on the ground plane. False if no such token is live.
    pub fn update_token_position(&mut self, id: &str, x: f32, y: f32) -> bool {
        match self.scene.as_mut() {
            Some(scene) => scene.tokens.update_position(id, x, y, &mut scene.graph),
            None => false,
        }
    }

    /// Remove a token. Unknown ids and repeated calls are no-ops.
    pub fn remove_token(&mut self, id: &str) -> bool {
        match self.scene.as_mut() {
            Some(scene) => scene.tokens.remove(id, &mut scene.graph, self.renderer.as_mut()),
            None => false,
        }
    }

    // ========================================================================
    // Camera and effects
    // ========================================================================

    /// Put the camera at a floorplan pixel position, at eye height.
    pub fn set_player_start_position(&mut self, x: f32, y: f32) -> Result<(), SceneError> {
        let scene = self.scene.as_mut().ok_or(SceneError::NotInitialized)?;
        let ground = scene.grid.to_world(x, y);
        scene.navigation.place(ground.x, ground.y);
        Ok(())
    }

    pub fn set_camera_position(&mut self, position: Vec3) -> Result<(), SceneError> {
        let scene = self.scene.as_mut().ok_or(SceneError::NotInitialized)?;
        scene.navigation.camera.position = position;
        Ok(())
    }

    pub fn look_at(&mut self, target: Vec3) -> Result<(), SceneError> {
        let scene = self.scene.as_mut().ok_or(SceneError::NotInitialized)?;
        scene.navigation.camera.look_at(target);
        Ok(())
    }

    /// Camera back to (0, eye, 5) looking towards the origin at eye level.
    pub fn reset_view(&mut self) -> Result<(), SceneError> {
        let scene = self.scene.as_mut().ok_or(SceneError::NotInitialized)?;
        let eye = scene.navigation.eye_height();
        let camera = &mut scene.navigation.camera;
        camera.position = Vec3::new(0.0, eye, 5.0);
        camera.look_at(Vec3::new(0.0, eye, 0.0));
        Ok(())
    }

    pub fn set_fog(&mut self, color: u32, near: f32, far: f32) -> Result<(), SceneError> {
        let scene = self.scene.as_mut().ok_or(SceneError::NotInitialized)?;
        scene.fog = Some(Fog::new(color, near, far));
        Ok(())
    }

    pub fn clear_fog(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.fog = None;
        }
    }

    /// Switch every mesh between filled and wireframe drawing.
    pub fn toggle_wireframe(&mut self, enabled: bool) -> Result<(), SceneError> {
        let scene = self.scene.as_mut().ok_or(SceneError::NotInitialized)?;
        scene.wireframe = enabled;
        for (_, node) in scene.graph.iter_mut() {
            node.material.wireframe = enabled;
        }
        debug!("[SceneDriver] Wireframe {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    /// New viewport size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        if let Some(scene) = self.scene.as_mut() {
            scene.navigation.camera.set_aspect(width, height);
        }
        if !self.disposed {
            self.renderer.resize(width, height);
        }
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Release every node of the live scene. The renderer stays usable.
    fn clear_scene(&mut self) {
        let Some(mut scene) = self.scene.take() else {
            return;
        };
        let renderer = self.renderer.as_mut();
        scene.tokens.clear(&mut scene.graph, renderer);
        for node in scene.graph.drain() {
            renderer.release_mesh(node.mesh);
            if let Some(texture) = node.texture() {
                renderer.release_texture(texture);
            }
        }
        debug!("[SceneDriver] Scene cleared");
    }

    /// Stop the frame loop and release the scene and the renderer.
    ///
    /// Safe to call more than once. Afterwards `frame` returns `Stopped`
    /// and building a new scene fails with `NotInitialized`.
    pub fn cleanup(&mut self) {
        if self.disposed {
            return;
        }
        self.clear_scene();
        self.renderer.dispose();
        self.disposed = true;
        info!("[SceneDriver] Cleaned up");
    }
}

impl Drop for SceneDriver {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Swap in every bitmap that finished loading; drop settled entries.
fn poll_pending(scene: &mut LiveScene, renderer: &mut dyn RenderContext) {
    let LiveScene {
        graph,
        pending,
        wireframe,
        ..
    } = scene;
    pending.retain_mut(|entry| {
        if let Some(resolved) = entry.poll() {
            apply_texture(graph, renderer, entry.node, resolved, *wireframe);
            return false;
        }
        !entry.is_settled()
    });
}

fn apply_texture(
    graph: &mut SceneGraph,
    renderer: &mut dyn RenderContext,
    node_id: NodeId,
    resolved: ResolvedTexture,
    wireframe: bool,
) {
    let Some(node) = graph.get_mut(node_id) else {
        return;
    };
    let handle = renderer.upload_texture(&resolved.image);
    if let Some(old) = node.texture() {
        renderer.release_texture(old);
    }
    let mut material = resolved.material.with_texture(handle);
    material.wireframe = wireframe;
    node.material = material;
    debug!("[SceneDriver] Texture bound to {}", node.element_id);
}

/// Doors must name an existing wall; anything else is reported and skipped.
fn warn_orphan_doors(floorplan: &Floorplan) {
    for door in floorplan.markers.iter().filter_map(|marker| marker.as_door()) {
        match door.parent_wall_id.as_deref() {
            None => warn!("[SceneDriver] Door {} has no parent wall, skipping", door.id),
            Some(wall_id) => match floorplan.surface(wall_id) {
                None => warn!("[SceneDriver] Door {} references missing wall {}, skipping", door.id, wall_id),
                Some(surface) if !surface.is_wall() => {
                    warn!("[SceneDriver] Door {} parent {} is not a wall, skipping", door.id, wall_id)
                }
                Some(_) => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floorplan::{Bounds, Marker, PixelPoint, Shape, SizeCategory};
    use crate::material::NoAssets;
    use crate::render::HeadlessRenderer;

    fn driver() -> SceneDriver {
        SceneDriver::new(
            ViewerConfig::default(),
            Box::new(HeadlessRenderer::new(800, 600)),
            Box::new(NoAssets),
        )
    }

    fn floorplan() -> Floorplan {
        Floorplan::new(1000.0, 1000.0, 50.0)
            .with_surface(Surface::new("r1", SurfaceKind::Room, Shape::Box, Bounds::new(100.0, 100.0, 300.0, 300.0)))
            .with_surface(Surface::new("w1", SurfaceKind::Wall, Shape::Box, Bounds::new(100.0, 500.0, 500.0, 50.0)))
            .with_marker(Marker::Door(DoorMarker {
                id: "d1".into(),
                position: PixelPoint::new(350.0, 525.0),
                parent_wall_id: Some("w1".into()),
                texture_ref: None,
            }))
    }

    #[test]
    fn test_frame_before_initialize_is_stopped() {
        let mut driver = driver();
        assert_eq!(driver.frame().unwrap(), FrameStatus::Stopped);
        assert!(matches!(driver.create_token(Token::monster("t", 0.0, 0.0, SizeCategory::Medium, "")), Err(SceneError::NotInitialized)));
    }

    #[test]
    fn test_texture_regions_are_not_extruded() {
        let mut driver = driver();
        let plan = floorplan().with_surface(
            Surface::new("tex", SurfaceKind::Room, Shape::Box, Bounds::new(0.0, 0.0, 100.0, 100.0)).with_name("RoomTexture"),
        );
        driver.initialize_map(plan).unwrap();
        let graph = driver.graph().unwrap();
        assert_eq!(graph.count(NodeKind::Room), 1);
        assert!(graph.find(NodeKind::Room, "tex").is_none());
    }

    #[test]
    fn test_wall_door_gets_frame_under_wall() {
        let mut driver = driver();
        driver.initialize_map(floorplan()).unwrap();
        let graph = driver.graph().unwrap();
        let wall = graph.find(NodeKind::Wall, "w1").unwrap();
        let (_, frame) = graph.of_kind(NodeKind::DoorFrame).next().unwrap();
        assert_eq!(frame.parent, Some(wall));
    }

    #[test]
    fn test_player_start_places_camera() {
        let mut driver = driver();
        let mut plan = floorplan();
        plan.player_start = Some(PixelPoint::new(750.0, 250.0));
        driver.initialize_map(plan).unwrap();
        let camera = &driver.navigation().unwrap().camera;
        assert_eq!(camera.position, Vec3::new(5.0, 1.7, -5.0));
    }

    #[test]
    fn test_reset_view_faces_origin() {
        let mut driver = driver();
        driver.initialize_map(floorplan()).unwrap();
        driver.set_camera_position(Vec3::new(3.0, 9.0, 3.0)).unwrap();
        driver.reset_view().unwrap();
        let camera = &driver.navigation().unwrap().camera;
        assert_eq!(camera.position, Vec3::new(0.0, 1.7, 5.0));
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_wireframe_reaches_every_node() {
        let mut driver = driver();
        driver.initialize_map(floorplan()).unwrap();
        driver.toggle_wireframe(true).unwrap();
        assert!(driver.graph().unwrap().iter().all(|(_, node)| node.material.wireframe));
        driver.toggle_wireframe(false).unwrap();
        assert!(driver.graph().unwrap().iter().all(|(_, node)| !node.material.wireframe));
    }

    #[test]
    fn test_reinitialize_replaces_scene() {
        let mut driver = driver();
        driver.initialize_map(floorplan()).unwrap();
        let first = driver.graph().unwrap().len();
        driver.initialize_map(floorplan()).unwrap();
        assert_eq!(driver.graph().unwrap().len(), first);
    }

    #[test]
    fn test_cleanup_then_initialize_fails() {
        let mut driver = driver();
        driver.initialize_map(floorplan()).unwrap();
        driver.cleanup();
        driver.cleanup();
        assert!(!driver.is_active());
        assert_eq!(driver.frame().unwrap(), FrameStatus::Stopped);
        assert!(matches!(driver.initialize_map(floorplan()), Err(SceneError::NotInitialized)));
    }
}
