//! Level description files
//!
//! A level lists its boundary axes, its loose items and the order the player
//! has to assemble. Levels are stored in RON (Rusty Object Notation) or JSON.

use std::fs;
use std::path::Path;

use glam::Vec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::level::Level;
use crate::gifts::catalog::{BASE1, LIGHTBULB};
use crate::gifts::{Constraint, GiftCatalog};
use crate::physics::{CollisionAxis, VisualExtent};

/// A loose item placed by the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Optional debug name
    #[serde(default)]
    pub name: Option<String>,
    pub position: Vec2,
    /// Visual size, from which the collision rectangle is derived
    pub size: Vec2,
    /// Anchor relative to the bottom-left corner
    #[serde(default)]
    pub anchor: Vec2,
    /// Gift part tag
    #[serde(default)]
    pub part: Option<String>,
    /// Initial velocity, making the item free-moving
    #[serde(default)]
    pub velocity: Option<Vec2>,
}

impl ItemDef {
    fn extent(&self) -> VisualExtent {
        VisualExtent {
            size: self.size,
            anchor: self.anchor,
        }
    }
}

/// The order a level asks for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderDef {
    /// A constraint tree written in the level file
    Inline(Constraint),
    /// A gift from the catalog, by name
    Catalog(String),
}

/// A level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelScene {
    /// Level name
    pub name: String,
    /// Format version for compatibility
    pub version: u32,
    /// Static boundaries
    #[serde(default)]
    pub axes: Vec<CollisionAxis>,
    /// Loose items, spawned bottom to top
    #[serde(default)]
    pub items: Vec<ItemDef>,
    /// Pending order, if the level starts with one
    #[serde(default)]
    pub order: Option<OrderDef>,
}

impl LevelScene {
    /// Create a new empty level
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            axes: Vec::new(),
            items: Vec::new(),
            order: None,
        }
    }

    /// The workshop table: a shelf separated from the workbench, a bulb
    /// bouncing around and a base waiting on the bench
    #[must_use]
    pub fn workshop() -> Self {
        Self {
            name: "workshop".to_string(),
            version: 1,
            axes: vec![
                CollisionAxis::horizontal(200.0),
                CollisionAxis::vertical(1200.0),
                CollisionAxis::horizontal(0.0),
                CollisionAxis::vertical(0.0),
                CollisionAxis::vertical(1920.0),
            ],
            items: vec![
                ItemDef {
                    name: Some("bulb".to_string()),
                    position: Vec2::new(1500.0, 500.0),
                    size: Vec2::new(64.0, 96.0),
                    anchor: Vec2::ZERO,
                    part: Some(LIGHTBULB.to_string()),
                    velocity: Some(Vec2::new(-300.0, -300.0)),
                },
                ItemDef {
                    name: Some("base".to_string()),
                    position: Vec2::new(1600.0, 300.0),
                    size: Vec2::new(128.0, 64.0),
                    anchor: Vec2::ZERO,
                    part: Some(BASE1.to_string()),
                    velocity: None,
                },
            ],
            order: Some(OrderDef::Catalog("test".to_string())),
        }
    }

    /// Spawn the level's content. Returns the item entities in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order names a gift missing from the catalog
    pub fn populate(&self, level: &mut Level, catalog: &GiftCatalog) -> Result<Vec<Entity>, LoadError> {
        let order = match &self.order {
            Some(OrderDef::Inline(constraint)) => Some(constraint.clone()),
            Some(OrderDef::Catalog(name)) => Some(
                catalog
                    .get(name)
                    .cloned()
                    .ok_or_else(|| LoadError::UnknownGift(name.clone()))?,
            ),
            None => None,
        };

        for &axis in &self.axes {
            level.spawn_axis(axis);
        }
        let items = self
            .items
            .iter()
            .map(|def| {
                level.spawn_item(
                    def.position,
                    def.extent(),
                    def.part.as_deref(),
                    def.velocity,
                    def.name.as_deref(),
                )
            })
            .collect();
        if let Some(order) = order {
            level.install_order(order);
        }
        level.derive_bounding_boxes();

        log::info!(
            "Populated level '{}': {} axes, {} items",
            self.name,
            self.axes.len(),
            self.items.len()
        );
        Ok(items)
    }

    /// Save the level to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| LoadError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| LoadError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a level from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Parse a level from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    pub fn from_ron_str(content: &str) -> Result<Self, LoadError> {
        ron::from_str(content).map_err(|e| LoadError::DeserializeError(e.to_string()))
    }

    /// Load a level from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| LoadError::DeserializeError(e.to_string()))
    }
}

impl Default for LevelScene {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Errors that can occur while loading levels and configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// The level refers to a gift the catalog does not know
    UnknownGift(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::UnknownGift(name) => write!(f, "Unknown gift '{name}'"),
        }
    }
}

impl std::error::Error for LoadError {}
