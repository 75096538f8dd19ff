//! Creature tokens placed on the map.

use serde::{Deserialize, Serialize};

/// Creature size classification.
///
/// Editor files spell sizes in any case, so labels are read through
/// [`SizeCategory::parse`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SizeCategory {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl SizeCategory {
    /// Parse a size label case-insensitively. Unknown labels are medium.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "tiny" => SizeCategory::Tiny,
            "small" => SizeCategory::Small,
            "medium" => SizeCategory::Medium,
            "large" => SizeCategory::Large,
            "huge" => SizeCategory::Huge,
            "gargantuan" => SizeCategory::Gargantuan,
            _ => SizeCategory::Medium,
        }
    }

    /// Footprint edge length in grid squares.
    pub fn squares(self) -> f32 {
        match self {
            SizeCategory::Tiny => 0.5,
            SizeCategory::Small | SizeCategory::Medium => 1.0,
            SizeCategory::Large => 2.0,
            SizeCategory::Huge => 3.0,
            SizeCategory::Gargantuan => 4.0,
        }
    }
}

impl From<String> for SizeCategory {
    fn from(label: String) -> Self {
        SizeCategory::parse(&label)
    }
}

/// Grid squares for an optional size label; missing labels are medium.
pub fn size_in_squares(label: Option<&str>) -> f32 {
    label.map(SizeCategory::parse).unwrap_or_default().squares()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[default]
    Monster,
    #[serde(other)]
    Other,
}

/// A creature marker to be shown as a billboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    /// Floorplan pixel position
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub size_category: SizeCategory,
    /// Data URL, file path or asset id of the token art
    pub image_ref: String,
    #[serde(default)]
    pub kind: TokenKind,
}

impl Token {
    pub fn monster(id: impl Into<String>, x: f32, y: f32, size: SizeCategory, image_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            size_category: size,
            image_ref: image_ref.into(),
            kind: TokenKind::Monster,
        }
    }
}
