//! Texture Assignments
//!
//! Per-surface texture choices made in the editor. The table is persisted
//! as a JSON array of `{ elementId, textureId, category, dateAssigned }`.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::category::TextureCategory;
use crate::error::SceneError;

/// Texture chosen for one surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub texture_id: String,
    pub category: TextureCategory,
    /// Free-form timestamp; older maps store ISO-8601 text
    pub date_assigned: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentRecord {
    element_id: String,
    texture_id: String,
    #[serde(default, alias = "type")]
    category: TextureCategory,
    #[serde(default)]
    date_assigned: String,
}

/// Surface id to texture assignment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssignmentTable {
    entries: HashMap<String, Assignment>,
}

impl AssignmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a texture to a surface, replacing any earlier choice.
    pub fn assign(
        &mut self,
        element_id: impl Into<String>,
        texture_id: impl Into<String>,
        category: TextureCategory,
    ) {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.entries.insert(
            element_id.into(),
            Assignment {
                texture_id: texture_id.into(),
                category,
                date_assigned: stamp.to_string(),
            },
        );
    }

    pub fn get(&self, element_id: &str) -> Option<&Assignment> {
        self.entries.get(element_id)
    }

    pub fn remove(&mut self, element_id: &str) -> Option<Assignment> {
        self.entries.remove(element_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize as a JSON array, sorted by element id for stable output.
    pub fn to_json(&self) -> Result<String, SceneError> {
        let mut records: Vec<AssignmentRecord> = self
            .entries
            .iter()
            .map(|(element_id, a)| AssignmentRecord {
                element_id: element_id.clone(),
                texture_id: a.texture_id.clone(),
                category: a.category,
                date_assigned: a.date_assigned.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.element_id.cmp(&b.element_id));
        Ok(serde_json::to_string(&records)?)
    }

    /// Replace the table with the records in `json`.
    pub fn load_json(&mut self, json: &str) -> Result<(), SceneError> {
        let records: Vec<AssignmentRecord> = serde_json::from_str(json)?;
        self.entries = records
            .into_iter()
            .map(|r| {
                (
                    r.element_id,
                    Assignment {
                        texture_id: r.texture_id,
                        category: r.category,
                        date_assigned: r.date_assigned,
                    },
                )
            })
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_replaces() {
        let mut table = AssignmentTable::new();
        table.assign("w1", "brick", TextureCategory::Walls);
        table.assign("w1", "stone", TextureCategory::Walls);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("w1").unwrap().texture_id, "stone");
        assert!(!table.get("w1").unwrap().date_assigned.is_empty());
    }

    #[test]
    fn test_json_round_trip_keeps_records() {
        let mut table = AssignmentTable::new();
        table.assign("w1", "brick", TextureCategory::Walls);
        table.assign("r1", "planks", TextureCategory::Floors);
        let json = table.to_json().unwrap();
        assert!(json.contains("\"elementId\":\"r1\""));
        assert!(json.contains("\"dateAssigned\""));

        let mut loaded = AssignmentTable::new();
        loaded.load_json(&json).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_load_editor_records() {
        let mut table = AssignmentTable::new();
        table.assign("stale", "x", TextureCategory::Walls);
        table
            .load_json(
                r#"[{ "elementId": "w9", "textureId": "walls_1700", "type": "walls",
                      "dateAssigned": "2024-01-01T00:00:00.000Z" }]"#,
            )
            .unwrap();
        assert!(table.get("stale").is_none());
        let a = table.get("w9").unwrap();
        assert_eq!(a.category, TextureCategory::Walls);
        assert_eq!(a.date_assigned, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_bad_json_is_error() {
        let mut table = AssignmentTable::new();
        assert!(table.load_json("{").is_err());
    }
}
