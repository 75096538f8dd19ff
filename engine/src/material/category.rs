//! Texture categories and the rendering policy each one implies.

use serde::{Deserialize, Serialize};

use super::descriptor::{Material, Side};
use crate::floorplan::SurfaceKind;

/// Resource-pack category a texture belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureCategory {
    #[default]
    Walls,
    Floors,
    Rooms,
    Doors,
    Windows,
    Props,
    #[serde(other)]
    Other,
}

impl TextureCategory {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "walls" => TextureCategory::Walls,
            "floors" => TextureCategory::Floors,
            "rooms" => TextureCategory::Rooms,
            "doors" => TextureCategory::Doors,
            "windows" => TextureCategory::Windows,
            "props" => TextureCategory::Props,
            _ => TextureCategory::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextureCategory::Walls => "walls",
            TextureCategory::Floors => "floors",
            TextureCategory::Rooms => "rooms",
            TextureCategory::Doors => "doors",
            TextureCategory::Windows => "windows",
            TextureCategory::Props => "props",
            TextureCategory::Other => "other",
        }
    }

    /// Category that explicit assignments for a surface are looked up in.
    pub fn for_surface(kind: SurfaceKind) -> Self {
        match kind {
            SurfaceKind::Wall => TextureCategory::Walls,
            SurfaceKind::Room => TextureCategory::Floors,
        }
    }

    /// Material for a texture of this category, before the bitmap is bound.
    pub fn policy(self) -> Material {
        match self {
            TextureCategory::Windows => Material {
                opacity: 0.3,
                transparent: true,
                roughness: 0.2,
                metalness: 0.5,
                side: Side::Double,
                ..Material::default()
            },
            TextureCategory::Floors | TextureCategory::Rooms => Material {
                roughness: 0.9,
                metalness: 0.1,
                side: Side::Front,
                ..Material::default()
            },
            _ => Material {
                roughness: 0.8,
                metalness: 0.2,
                side: Side::Double,
                ..Material::default()
            },
        }
    }
}

/// Material used for a texture cropped from the floor bitmap.
pub fn legacy_policy() -> Material {
    Material {
        roughness: 0.8,
        metalness: 0.1,
        side: Side::Double,
        ..Material::default()
    }
}

/// Flat colour used when no texture resolves.
pub fn flat_fallback(kind: SurfaceKind) -> Material {
    let color = match kind {
        SurfaceKind::Wall => 0xcccccc,
        SurfaceKind::Room => 0x666666,
    };
    Material {
        roughness: 0.7,
        metalness: 0.2,
        side: Side::Double,
        ..Material::flat(color)
    }
}
