//! Entity Component System module
//!
//! Built on top of the hecs ECS library

mod components;
pub mod hierarchy;
mod world;

pub use components::{Name, PaintOrder, Transform, Velocity};
pub use hierarchy::{HierarchyError, Item};
pub use world::World;
