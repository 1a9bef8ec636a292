//! Common ECS components

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Transform component for a position in scene space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    /// Position in scene space
    pub position: Vec2,
}

impl Transform {
    /// Create a transform at a position
    pub fn from_position(position: Vec2) -> Self {
        Self { position }
    }

    /// Create a transform from coordinates
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec2::new(x, y))
    }

    /// Translate by a delta
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

/// Linear velocity in scene units per second.
///
/// Its presence marks an entity as free-moving.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Name component for debugging
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Layering key used for drawing and for "what is on top" hit tests.
///
/// Values are minted by [`PaintOrderCounter`](crate::logic::PaintOrderCounter)
/// and never reused, so two entities never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaintOrder(pub u64);
