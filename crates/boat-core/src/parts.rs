//! Part registry - maps scene node names to camera framing and descriptive text
//!
//! The registry is an edit-time table (see `data/parts.toml`). Each entry names
//! a node in the loaded boat asset; clicking that node (or any of its
//! descendants) focuses the camera on the entry's pose and shows its text.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Part table compiled into the viewer
const BUILTIN_PARTS: &str = include_str!("../data/parts.toml");

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to parse part table: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Duplicate part identifier: {0}")]
    DuplicateId(String),
    #[error("Part identifier must not be empty")]
    EmptyId,
    #[error("Part {id} has a non-finite {field}")]
    NonFinite { id: String, field: &'static str },
}

/// A single clickable part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartEntry {
    /// Node name in the asset (exact, case-sensitive match)
    pub id: String,
    /// Camera position when the part is focused
    pub camera_position: [f32; 3],
    /// Orbit pivot / look-at target when the part is focused
    pub look_at: [f32; 3],
    pub title: String,
    pub description: String,
}

/// On-disk layout of the part table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PartTable {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    part: Vec<PartEntry>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Immutable lookup of part entries by identifier
#[derive(Debug, Clone, Default)]
pub struct PartRegistry {
    entries: Vec<PartEntry>,
    by_id: HashMap<String, usize>,
}

impl PartRegistry {
    /// Build a registry from entries, rejecting duplicates and malformed values
    pub fn new(entries: Vec<PartEntry>) -> Result<Self, RegistryError> {
        let mut by_id = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            if entry.id.is_empty() {
                return Err(RegistryError::EmptyId);
            }
            check_finite(&entry.id, "camera_position", entry.camera_position)?;
            check_finite(&entry.id, "look_at", entry.look_at)?;

            if by_id.insert(entry.id.clone(), index).is_some() {
                return Err(RegistryError::DuplicateId(entry.id.clone()));
            }
        }

        Ok(Self { entries, by_id })
    }

    /// Parse a part table from TOML
    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        let table: PartTable = toml::from_str(content)?;
        tracing::debug!("Part table v{} with {} entries", table.version, table.part.len());
        Self::new(table.part)
    }

    /// The part table shipped with the viewer
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_toml(BUILTIN_PARTS)
    }

    pub fn get(&self, id: &str) -> Option<&PartEntry> {
        self.by_id.get(id).map(|&index| &self.entries[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Entries in table order
    pub fn iter(&self) -> impl Iterator<Item = &PartEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_finite(id: &str, field: &'static str, v: [f32; 3]) -> Result<(), RegistryError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(RegistryError::NonFinite {
            id: id.to_string(),
            field,
        })
    }
}
