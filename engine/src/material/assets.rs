//! Texture lookup service consumed by the material binder.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;

use super::category::TextureCategory;
use crate::floorplan::SurfaceKind;
use crate::texture::TextureSlot;

/// Where the pixels of a texture come from.
#[derive(Clone, Debug)]
pub enum TextureSource {
    Bitmap(Arc<RgbaImage>),
    /// Data URL or file path
    Encoded(String),
}

impl TextureSource {
    /// Start resolving the bitmap. Decoded bitmaps are ready immediately.
    pub fn open(&self) -> TextureSlot {
        match self {
            TextureSource::Bitmap(image) => TextureSlot::Ready(Arc::clone(image)),
            TextureSource::Encoded(source) => TextureSlot::load(source.clone()),
        }
    }
}

/// A texture known to the asset store.
#[derive(Clone, Debug)]
pub struct TextureAsset {
    pub id: String,
    pub name: String,
    pub category: TextureCategory,
    pub source: TextureSource,
}

impl TextureAsset {
    pub fn new(id: impl Into<String>, category: TextureCategory, source: TextureSource) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category,
            source,
        }
    }
}

/// Texture storage as seen by the viewer.
pub trait AssetSource {
    /// Texture `id` within `category`.
    fn get_texture(&self, id: &str, category: TextureCategory) -> Option<TextureAsset>;

    /// Default texture for surfaces of `kind` without an explicit assignment.
    fn default_texture(&self, kind: SurfaceKind) -> Option<TextureAsset>;
}

/// Asset source with nothing in it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn get_texture(&self, _id: &str, _category: TextureCategory) -> Option<TextureAsset> {
        None
    }

    fn default_texture(&self, _kind: SurfaceKind) -> Option<TextureAsset> {
        None
    }
}

/// In-memory asset store.
#[derive(Clone, Debug, Default)]
pub struct StaticAssets {
    textures: HashMap<(TextureCategory, String), TextureAsset>,
    default_wall: Option<String>,
    default_floor: Option<String>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: TextureAsset) {
        self.textures.insert((asset.category, asset.id.clone()), asset);
    }

    pub fn with_texture(mut self, asset: TextureAsset) -> Self {
        self.insert(asset);
        self
    }

    /// Use texture `id` (in the walls or floors category) as the default
    /// for surfaces of `kind`.
    pub fn set_default(&mut self, kind: SurfaceKind, id: impl Into<String>) {
        match kind {
            SurfaceKind::Wall => self.default_wall = Some(id.into()),
            SurfaceKind::Room => self.default_floor = Some(id.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl AssetSource for StaticAssets {
    fn get_texture(&self, id: &str, category: TextureCategory) -> Option<TextureAsset> {
        self.textures.get(&(category, id.to_string())).cloned()
    }

    fn default_texture(&self, kind: SurfaceKind) -> Option<TextureAsset> {
        let id = match kind {
            SurfaceKind::Wall => self.default_wall.as_deref()?,
            SurfaceKind::Room => self.default_floor.as_deref()?,
        };
        self.get_texture(id, TextureCategory::for_surface(kind))
    }
}
