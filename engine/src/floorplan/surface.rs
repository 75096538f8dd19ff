//! Surfaces: rooms and walls drawn on the floorplan.

use serde::{Deserialize, Deserializer, Serialize};

/// Name of the region whose pixels become the legacy wall texture.
pub const WALL_TEXTURE_REGION: &str = "WallTexture";
/// Name of the region whose pixels become the legacy room texture.
pub const ROOM_TEXTURE_REGION: &str = "RoomTexture";

/// A point in floorplan pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned footprint in floorplan pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when the footprint encloses no area.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// What a surface represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Wall,
    #[default]
    #[serde(other)]
    Room,
}

/// Footprint shape. Polygon points are offsets from the bounds origin.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Box,
    Circle,
    Polygon(Vec<PixelPoint>),
}

impl Shape {
    fn tag(&self) -> &'static str {
        match self {
            Shape::Box => "rectangle",
            Shape::Circle => "circle",
            Shape::Polygon(_) => "polygon",
        }
    }
}

/// A room or wall footprint to be turned into a mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "SurfaceRecord", into = "SurfaceRecord")]
pub struct Surface {
    pub id: String,
    pub name: Option<String>,
    pub kind: SurfaceKind,
    pub shape: Shape,
    pub bounds: Bounds,
    /// Extrusion height; `None` uses the configured wall height
    pub height: Option<f32>,
}

impl Surface {
    pub fn new(id: impl Into<String>, kind: SurfaceKind, shape: Shape, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            shape,
            bounds,
            height: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_wall(&self) -> bool {
        self.kind == SurfaceKind::Wall
    }

    /// Regions reserved as texture sources are never extruded.
    pub fn is_texture_region(&self) -> bool {
        matches!(
            self.name.as_deref(),
            Some(WALL_TEXTURE_REGION) | Some(ROOM_TEXTURE_REGION)
        )
    }

    pub fn height_or(&self, default: f32) -> f32 {
        self.height.unwrap_or(default)
    }
}

/// On-disk form of a surface, as written by the floorplan editor.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct SurfaceRecord {
    #[serde(deserialize_with = "id_from_any")]
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: SurfaceKind,
    #[serde(default)]
    shape: Option<String>,
    bounds: Bounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<Vec<PixelPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f32>,
}

impl From<SurfaceRecord> for Surface {
    fn from(record: SurfaceRecord) -> Self {
        let shape = match record.shape.as_deref() {
            Some("circle") => Shape::Circle,
            Some("polygon") => Shape::Polygon(record.points.unwrap_or_default()),
            _ => Shape::Box,
        };
        Self {
            id: record.id,
            name: record.name,
            kind: record.kind,
            shape,
            bounds: record.bounds,
            height: record.height,
        }
    }
}

impl From<Surface> for SurfaceRecord {
    fn from(surface: Surface) -> Self {
        let tag = surface.shape.tag().to_string();
        let points = match surface.shape {
            Shape::Polygon(points) => Some(points),
            _ => None,
        };
        Self {
            id: surface.id,
            name: surface.name,
            kind: surface.kind,
            shape: Some(tag),
            bounds: surface.bounds,
            points,
            height: surface.height,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Integer(n) => n.to_string(),
            RawId::Float(f) if f.fract() == 0.0 => format!("{}", f as i64),
            RawId::Float(f) => f.to_string(),
        }
    }
}

/// Editor ids are timestamps (numbers) in older maps and strings in newer ones.
pub(crate) fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub(crate) fn id_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Some(RawId::Integer(i).into()),
            None => n.as_f64().map(|f| RawId::Float(f).into()),
        },
        _ => None,
    }
}
