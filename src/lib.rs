//! Interactive core of a gift assembly puzzle
//!
//! This crate provides:
//! - Dragging loose parts and hooking them into chains
//! - Boundary bouncing with iterative de-penetration
//! - Chain aggregation and declarative gift validation
//! - Entity Component System storage built on hecs

pub mod core;
pub mod ecs;
pub mod gifts;
pub mod input;
pub mod logic;
pub mod physics;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{
        EventDispatcher, EventKind, EventQueue, GameConfig, GameEvent, Level, LevelScene,
    };
    pub use crate::ecs::{Item, Name, PaintOrder, Transform, Velocity, World};
    pub use crate::gifts::{Comparator, Constraint, GiftCatalog, GiftPart, PartMultiset};
    pub use crate::input::{PointerButton, PointerEvent, Viewport};
    pub use crate::logic::{DragManager, ReleaseOutcome};
    pub use crate::physics::{CollisionAxis, CollisionRectangle, Orientation, VisualExtent};
    pub use glam::Vec2;
}
