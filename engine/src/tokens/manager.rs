//! Token Manager
//!
//! Keeps one camera-facing sprite per token id. Monster tokens also drop a
//! flat, hidden collision proxy on the floor. The proxy is a plain scene
//! node: it is not tracked here, does not follow the sprite and is only
//! released with the scene. Token art loads in the background; the sprite is
//! drawn untextured until `poll_textures` swaps the bitmap in and applies
//! its aspect ratio.

use std::collections::HashMap;

use glam::Vec3;
use tracing::{debug, warn};

use super::placement::{PROXY_THICKNESS, TokenLayout};
use crate::floorplan::{Token, TokenKind};
use crate::material::Material;
use crate::mesh::{box_mesh, sprite_quad};
use crate::render::{RenderContext, TextureHandle};
use crate::scene::{NodeId, NodeKind, SceneGraph, SceneNode, Transform};
use crate::texture::{SlotEvent, TextureSlot};

struct TokenEntry {
    token: Token,
    sprite: NodeId,
    art: TextureSlot,
    texture: Option<TextureHandle>,
    scale: f32,
}

/// Live token sprites keyed by token id.
#[derive(Default)]
pub struct TokenManager {
    layout: TokenLayout,
    entries: HashMap<String, TokenEntry>,
}

impl TokenManager {
    pub fn new(layout: TokenLayout) -> Self {
        Self {
            layout,
            entries: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &TokenLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Token> {
        self.entries.get(id).map(|entry| &entry.token)
    }

    /// Sprite node of a token.
    pub fn sprite(&self, id: &str) -> Option<NodeId> {
        self.entries.get(id).map(|entry| entry.sprite)
    }

    /// Add a token. An existing token with the same id is replaced.
    pub fn create(&mut self, token: Token, graph: &mut SceneGraph, ctx: &mut dyn RenderContext) -> NodeId {
        if self.contains(&token.id) {
            warn!("[TokenManager] Token {} already exists, replacing it", token.id);
            self.remove(&token.id, graph, ctx);
        }

        let scale = self.layout.scale(&token);
        let quad = sprite_quad();
        let mut sprite = SceneNode::new(
            NodeKind::TokenSprite,
            token.id.clone(),
            ctx.upload_mesh(&quad),
            Material::sprite(),
        )
        .with_transform(Transform {
            translation: self.layout.sprite_position(&token),
            rotation_y: 0.0,
            scale: Vec3::new(scale, scale, 1.0),
        })
        .with_vertex_count(quad.vertex_count());
        sprite.billboard = true;
        let sprite = graph.add(sprite);

        if token.kind == TokenKind::Monster {
            let slab = box_mesh(Vec3::ZERO, Vec3::new(scale, PROXY_THICKNESS, scale));
            let mut proxy = SceneNode::new(
                NodeKind::TokenProxy,
                String::new(),
                ctx.upload_mesh(&slab),
                Material::collision_proxy(),
            )
            .with_transform(Transform::at(self.layout.proxy_position(&token)))
            .with_vertex_count(slab.vertex_count());
            proxy.visible = false;
            graph.add(proxy);
        }

        let art = if token.image_ref.is_empty() {
            TextureSlot::Failed
        } else {
            TextureSlot::load(token.image_ref.clone())
        };

        debug!(
            "[TokenManager] Created token {} ({:?}, scale {})",
            token.id, token.size_category, scale
        );
        self.entries.insert(
            token.id.clone(),
            TokenEntry {
                token,
                sprite,
                art,
                texture: None,
                scale,
            },
        );
        sprite
    }

    /// Move a token's sprite on the ground plane. Height is left unchanged.
    ///
    /// Returns false when no token has this id.
    pub fn update_position(&mut self, id: &str, x: f32, y: f32, graph: &mut SceneGraph) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            warn!("[TokenManager] Cannot move unknown token {}", id);
            return false;
        };
        entry.token.x = x;
        entry.token.y = y;
        let ground = self.layout.grid.to_world(x, y);
        if let Some(node) = graph.get_mut(entry.sprite) {
            node.transform.translation.x = ground.x;
            node.transform.translation.z = ground.y;
        }
        true
    }

    /// Remove a token's sprite. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str, graph: &mut SceneGraph, ctx: &mut dyn RenderContext) -> bool {
        let Some(entry) = self.entries.remove(id) else {
            return false;
        };
        if let Some(node) = graph.remove(entry.sprite) {
            ctx.release_mesh(node.mesh);
        }
        if let Some(texture) = entry.texture {
            ctx.release_texture(texture);
        }
        debug!("[TokenManager] Removed token {}", id);
        true
    }

    /// Swap in token art that finished loading since the last call.
    pub fn poll_textures(&mut self, graph: &mut SceneGraph, ctx: &mut dyn RenderContext) {
        for entry in self.entries.values_mut() {
            if !entry.art.is_pending() {
                continue;
            }
            match entry.art.poll() {
                Some(SlotEvent::Loaded) => {
                    let Some(image) = entry.art.image() else {
                        continue;
                    };
                    let (width, height) = image.dimensions();
                    let aspect = if height > 0 {
                        width as f32 / height as f32
                    } else {
                        1.0
                    };
                    let handle = ctx.upload_texture(image);
                    entry.texture = Some(handle);
                    if let Some(node) = graph.get_mut(entry.sprite) {
                        node.material = node.material.clone().with_texture(handle);
                        node.transform.scale.x = entry.scale * aspect;
                    }
                    debug!("[TokenManager] Art loaded for {} ({}x{})", entry.token.id, width, height);
                }
                Some(SlotEvent::Failed) => {
                    warn!("[TokenManager] Art for token {} failed to load", entry.token.id);
                }
                None => {}
            }
        }
    }

    /// True while any token art is still loading.
    pub fn has_pending(&self) -> bool {
        self.entries.values().any(|entry| entry.art.is_pending())
    }

    /// Remove every token.
    pub fn clear(&mut self, graph: &mut SceneGraph, ctx: &mut dyn RenderContext) {
        let ids: Vec<String> = self.entries.keys().cloned().collect();
        for id in ids {
            self.remove(&id, graph, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::floorplan::SizeCategory;
    use crate::render::HeadlessRenderer;
    use crate::world::GridConfig;
    use base64::Engine;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn manager() -> TokenManager {
        let grid = GridConfig::from_pixels(1000.0, 1000.0, 50.0);
        TokenManager::new(TokenLayout::new(grid, &ViewerConfig::default()))
    }

    fn png_data_url(width: u32, height: u32) -> String {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes.into_inner())
        )
    }

    #[test]
    fn test_monster_gets_sprite_and_proxy() {
        let mut tokens = manager();
        let mut graph = SceneGraph::new();
        let mut ctx = HeadlessRenderer::new(800, 600);
        tokens.create(Token::monster("g1", 500.0, 500.0, SizeCategory::Medium, ""), &mut graph, &mut ctx);

        assert_eq!(graph.count(NodeKind::TokenSprite), 1);
        assert_eq!(graph.count(NodeKind::TokenProxy), 1);
        let (_, proxy) = graph.of_kind(NodeKind::TokenProxy).next().unwrap();
        assert!(!proxy.visible);
        assert!(proxy.element_id.is_empty());
        assert_eq!(proxy.parent, None);
        let (_, sprite) = graph.of_kind(NodeKind::TokenSprite).next().unwrap();
        assert!(sprite.billboard);
        assert_eq!(sprite.transform.translation, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_other_token_has_no_proxy() {
        let mut tokens = manager();
        let mut graph = SceneGraph::new();
        let mut ctx = HeadlessRenderer::new(800, 600);
        let mut token = Token::monster("npc", 100.0, 100.0, SizeCategory::Large, "");
        token.kind = TokenKind::Other;
        tokens.create(token, &mut graph, &mut ctx);
        assert_eq!(graph.count(NodeKind::TokenProxy), 0);
    }

    #[test]
    fn test_update_position_moves_sprite_only() {
        let mut tokens = manager();
        let mut graph = SceneGraph::new();
        let mut ctx = HeadlessRenderer::new(800, 600);
        let sprite = tokens.create(Token::monster("g1", 500.0, 500.0, SizeCategory::Huge, ""), &mut graph, &mut ctx);

        assert!(tokens.update_position("g1", 750.0, 250.0, &mut graph));
        let node = graph.get(sprite).unwrap();
        assert_eq!(node.transform.translation, Vec3::new(5.0, 6.0, -5.0));
        // The floor proxy stays where the token was created
        let (_, proxy) = graph.of_kind(NodeKind::TokenProxy).next().unwrap();
        assert_eq!(proxy.transform.translation, Vec3::new(0.0, 0.05, 0.0));

        assert!(!tokens.update_position("missing", 0.0, 0.0, &mut graph));
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut tokens = manager();
        let mut graph = SceneGraph::new();
        let mut ctx = HeadlessRenderer::new(800, 600);
        tokens.create(Token::monster("g1", 500.0, 500.0, SizeCategory::Medium, ""), &mut graph, &mut ctx);

        assert!(tokens.remove("g1", &mut graph, &mut ctx));
        assert!(!tokens.remove("g1", &mut graph, &mut ctx));
        assert_eq!(graph.count(NodeKind::TokenSprite), 0);
        assert_eq!(graph.count(NodeKind::TokenProxy), 1);
        assert_eq!(ctx.live_meshes(), 1);
    }

    #[test]
    fn test_duplicate_id_replaces() {
        let mut tokens = manager();
        let mut graph = SceneGraph::new();
        let mut ctx = HeadlessRenderer::new(800, 600);
        tokens.create(Token::monster("g1", 500.0, 500.0, SizeCategory::Medium, ""), &mut graph, &mut ctx);
        tokens.create(Token::monster("g1", 100.0, 100.0, SizeCategory::Medium, ""), &mut graph, &mut ctx);
        assert_eq!(tokens.len(), 1);
        assert_eq!(graph.count(NodeKind::TokenSprite), 1);
        // Each creation drops its own proxy
        assert_eq!(graph.count(NodeKind::TokenProxy), 2);
        assert_eq!(ctx.live_meshes(), 3);
    }

    #[test]
    fn test_loaded_art_applies_aspect() {
        let mut tokens = manager();
        let mut graph = SceneGraph::new();
        let mut ctx = HeadlessRenderer::new(800, 600);
        let sprite = tokens.create(
            Token::monster("g1", 500.0, 500.0, SizeCategory::Medium, png_data_url(8, 4)),
            &mut graph,
            &mut ctx,
        );

        for _ in 0..200 {
            tokens.poll_textures(&mut graph, &mut ctx);
            if !tokens.has_pending() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let node = graph.get(sprite).unwrap();
        assert!(node.material.is_textured());
        assert_eq!(node.transform.scale.x, 4.0);
        assert_eq!(node.transform.scale.y, 2.0);
        assert_eq!(ctx.live_textures(), 1);
    }
}
