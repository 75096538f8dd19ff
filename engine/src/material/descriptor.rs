//! Material descriptors shared by the binder, the scene graph and renderers.

use crate::config::viewer_config::unpack_rgb;
use crate::render::TextureHandle;

/// Which faces are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    Front,
    #[default]
    Double,
}

/// Surface appearance of one scene node.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Base colour, multiplied with the texture when one is bound
    pub color: [f32; 3],
    /// Bound bitmap; `None` draws the flat colour
    pub texture: Option<TextureHandle>,
    pub opacity: f32,
    pub transparent: bool,
    pub roughness: f32,
    pub metalness: f32,
    pub side: Side,
    pub depth_write: bool,
    /// Pull the surface towards the camera to win depth ties with a wall
    pub polygon_offset: bool,
    pub wireframe: bool,
    /// Skip lighting (sprites)
    pub unlit: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            texture: None,
            opacity: 1.0,
            transparent: false,
            roughness: 0.7,
            metalness: 0.2,
            side: Side::Double,
            depth_write: true,
            polygon_offset: false,
            wireframe: false,
            unlit: false,
        }
    }
}

impl Material {
    /// Untextured material of a packed 0xRRGGBB colour.
    pub fn flat(color: u32) -> Self {
        Self {
            color: unpack_rgb(color),
            ..Self::default()
        }
    }

    /// Floor plane showing the base map.
    pub fn floor() -> Self {
        Self::default()
    }

    /// Dark metal frame around a door opening.
    pub fn door_frame() -> Self {
        Self {
            roughness: 0.7,
            metalness: 0.3,
            ..Self::flat(0x4a4a4a)
        }
    }

    /// Textured door slab; drawn in front of the wall it sits in.
    pub fn door_panel() -> Self {
        Self {
            transparent: true,
            polygon_offset: true,
            ..Self::default()
        }
    }

    /// Camera-facing token art.
    pub fn sprite() -> Self {
        Self {
            transparent: true,
            depth_write: false,
            unlit: true,
            ..Self::default()
        }
    }

    /// Floor marker under a monster. Never drawn unless made visible.
    pub fn collision_proxy() -> Self {
        Self {
            opacity: 0.2,
            transparent: true,
            unlit: true,
            ..Self::flat(0xff0000)
        }
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    /// Swap in a loaded bitmap, keeping every other setting.
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_material_is_untextured() {
        let material = Material::flat(0xcccccc);
        assert!(!material.is_textured());
        assert!((material.color[0] - 0.8).abs() < 0.001);
        assert_eq!(material.side, Side::Double);
    }

    #[test]
    fn test_sprite_does_not_write_depth() {
        let material = Material::sprite();
        assert!(material.transparent);
        assert!(!material.depth_write);
    }

    #[test]
    fn test_with_texture_keeps_policy() {
        let material = Material::door_panel().with_texture(TextureHandle(3));
        assert_eq!(material.texture, Some(TextureHandle(3)));
        assert!(material.polygon_offset);
    }
}
