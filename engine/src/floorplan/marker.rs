//! Markers: doors attached to walls and encounter markers carrying monsters.
//!
//! Markers are stored by the editor as `{ id, type, x, y, data }` where the
//! shape of `data` depends on `type`. Unknown marker types are kept as
//! `Marker::Other` so a scene with newer marker kinds still loads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::surface::{PixelPoint, id_from_value};
use super::token::{SizeCategory, Token, TokenKind};

/// A door placed on a wall.
#[derive(Clone, Debug, PartialEq)]
pub struct DoorMarker {
    pub id: String,
    /// Door centre in floorplan pixels
    pub position: PixelPoint,
    /// Id of the wall surface this door is cut into
    pub parent_wall_id: Option<String>,
    /// Image for the door panel (data URL, path or asset id)
    pub texture_ref: Option<String>,
}

/// Monster record attached to an encounter marker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub basic: MonsterBasics,
    #[serde(default)]
    pub token: MonsterArt,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterBasics {
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterArt {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl MonsterArt {
    /// Embedded image data wins over a remote url.
    pub fn source(&self) -> Option<&str> {
        self.data
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.url.as_deref().filter(|s| !s.is_empty()))
    }
}

/// An encounter marker with its monster.
#[derive(Clone, Debug, PartialEq)]
pub struct EncounterMarker {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub monster: Option<MonsterRecord>,
}

impl EncounterMarker {
    /// Build the token shown for this encounter. The marker supplies the
    /// position; the monster record supplies size and art.
    pub fn to_token(&self) -> Option<Token> {
        let monster = self.monster.as_ref()?;
        let size = monster
            .basic
            .size
            .as_deref()
            .map(SizeCategory::parse)
            .unwrap_or_default();
        Some(Token {
            id: self.id.clone(),
            x: self.x,
            y: self.y,
            size_category: size,
            image_ref: monster.token.source().unwrap_or_default().to_string(),
            kind: TokenKind::Monster,
        })
    }

    pub fn monster_name(&self) -> &str {
        self.monster
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or("Unknown Monster")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Marker {
    Door(DoorMarker),
    Encounter(EncounterMarker),
    Other { id: String, kind: String, x: f32, y: f32 },
}

impl Marker {
    pub fn id(&self) -> &str {
        match self {
            Marker::Door(door) => &door.id,
            Marker::Encounter(encounter) => &encounter.id,
            Marker::Other { id, .. } => id,
        }
    }

    pub fn as_door(&self) -> Option<&DoorMarker> {
        match self {
            Marker::Door(door) => Some(door),
            _ => None,
        }
    }

    pub fn as_encounter(&self) -> Option<&EncounterMarker> {
        match self {
            Marker::Encounter(encounter) => Some(encounter),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct MarkerRecord {
    #[serde(default)]
    id: Value,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    data: Value,
}

impl MarkerRecord {
    fn door(&self, id: String) -> DoorMarker {
        let position = self
            .data
            .pointer("/door/position")
            .and_then(|p| serde_json::from_value::<PixelPoint>(p.clone()).ok())
            .unwrap_or(PixelPoint::new(self.x, self.y));
        let parent_wall_id = self.data.pointer("/parentWall/id").and_then(id_from_value);
        let texture_ref = self
            .data
            .pointer("/texture/data")
            .or_else(|| self.data.pointer("/texture/id"))
            .and_then(Value::as_str)
            .map(str::to_string);
        DoorMarker {
            id,
            position,
            parent_wall_id,
            texture_ref,
        }
    }

    fn encounter(&self, id: String) -> EncounterMarker {
        let monster = self
            .data
            .get("monster")
            .filter(|m| !m.is_null())
            .and_then(|m| match serde_json::from_value::<MonsterRecord>(m.clone()) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!("[Floorplan] encounter {} has unreadable monster data: {}", id, err);
                    None
                }
            });
        EncounterMarker {
            id,
            x: self.x,
            y: self.y,
            monster,
        }
    }
}

impl From<MarkerRecord> for Marker {
    fn from(record: MarkerRecord) -> Self {
        let id = id_from_value(&record.id).unwrap_or_default();
        match record.kind.as_str() {
            "door" => Marker::Door(record.door(id)),
            "encounter" => Marker::Encounter(record.encounter(id)),
            _ => Marker::Other {
                id,
                kind: record.kind,
                x: record.x,
                y: record.y,
            },
        }
    }
}

impl From<Marker> for MarkerRecord {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Door(door) => {
                let mut data = serde_json::json!({
                    "door": { "position": { "x": door.position.x, "y": door.position.y } },
                });
                if let Some(wall) = door.parent_wall_id {
                    data["parentWall"] = serde_json::json!({ "id": wall });
                }
                if let Some(texture) = door.texture_ref {
                    data["texture"] = serde_json::json!({ "data": texture });
                }
                MarkerRecord {
                    id: Value::String(door.id),
                    kind: "door".into(),
                    x: door.position.x,
                    y: door.position.y,
                    data,
                }
            }
            Marker::Encounter(encounter) => MarkerRecord {
                id: Value::String(encounter.id),
                kind: "encounter".into(),
                x: encounter.x,
                y: encounter.y,
                data: serde_json::json!({ "monster": encounter.monster }),
            },
            Marker::Other { id, kind, x, y } => MarkerRecord {
                id: Value::String(id),
                kind,
                x,
                y,
                data: Value::Null,
            },
        }
    }
}

impl Serialize for Marker {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MarkerRecord::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Marker {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        MarkerRecord::deserialize(deserializer).map(Marker::from)
    }
}
