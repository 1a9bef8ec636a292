//! Axis-aligned collision shapes and spatial predicates
//!
//! All predicates are strict: touching edges never count as contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ecs::{Transform, World};

/// Which way an infinite boundary line runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// A line `x = position`
    Vertical,
    /// A line `y = position`
    Horizontal,
}

impl Orientation {
    /// Index of the coordinate the line constrains (0 for x, 1 for y)
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Vertical => 0,
            Self::Horizontal => 1,
        }
    }
}

/// Rectangle used for collision detection.
///
/// The rectangle spans `[position - offset, position - offset + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionRectangle {
    pub size: Vec2,
    /// Anchor of the rectangle, relative to its bottom-left corner
    pub offset: Vec2,
}

impl CollisionRectangle {
    #[must_use]
    pub const fn new(size: Vec2, offset: Vec2) -> Self {
        Self { size, offset }
    }

    /// Rectangle anchored at its bottom-left corner
    #[must_use]
    pub const fn from_size(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
        }
    }

    /// Scene-space bounds as (min, max) for an entity at `position`
    #[must_use]
    pub fn bounds(&self, position: Vec2) -> (Vec2, Vec2) {
        let start = position - self.offset;
        (start, start + self.size)
    }
}

/// An infinite static boundary line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionAxis {
    pub position: f32,
    pub orientation: Orientation,
}

impl CollisionAxis {
    #[must_use]
    pub const fn vertical(x: f32) -> Self {
        Self {
            position: x,
            orientation: Orientation::Vertical,
        }
    }

    #[must_use]
    pub const fn horizontal(y: f32) -> Self {
        Self {
            position: y,
            orientation: Orientation::Horizontal,
        }
    }
}

/// Visual extent of a sprite-like entity, from which the collision
/// rectangle is derived once
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualExtent {
    pub size: Vec2,
    pub anchor: Vec2,
}

/// Check if a point lies strictly inside an entity's rectangle
#[must_use]
pub fn point_in_rect(point: Vec2, rect: &CollisionRectangle, transform: &Transform) -> bool {
    let (start, end) = rect.bounds(transform.position);
    point.x > start.x && point.x < end.x && point.y > start.y && point.y < end.y
}

/// Check if two entity rectangles overlap
#[must_use]
pub fn rect_overlap(
    a: &CollisionRectangle,
    a_transform: &Transform,
    b: &CollisionRectangle,
    b_transform: &Transform,
) -> bool {
    let (a_start, a_end) = a.bounds(a_transform.position);
    let (b_start, b_end) = b.bounds(b_transform.position);
    a_start.x < b_end.x && b_start.x < a_end.x && a_start.y < b_end.y && b_start.y < a_end.y
}

/// Check if a boundary line cuts through an entity's rectangle
#[must_use]
pub fn axis_overlap(axis: &CollisionAxis, rect: &CollisionRectangle, transform: &Transform) -> bool {
    let (start, end) = rect.bounds(transform.position);
    let index = axis.orientation.index();
    start[index] < axis.position && axis.position < end[index]
}

/// Check a rectangle against every boundary axis in the world
#[must_use]
pub fn overlaps_any_axis(world: &World, rect: &CollisionRectangle, transform: &Transform) -> bool {
    world
        .query::<&CollisionAxis>()
        .iter()
        .any(|(_, axis)| axis_overlap(axis, rect, transform))
}

/// Give every entity with a [`VisualExtent`] a cached collision rectangle.
///
/// Entities that already carry a rectangle are left untouched. Returns the
/// number of rectangles created.
pub fn derive_bounding_boxes(world: &mut World) -> usize {
    let pending: Vec<_> = world
        .query::<&VisualExtent>()
        .iter()
        .filter(|&(entity, _)| !world.has::<CollisionRectangle>(entity))
        .map(|(entity, extent)| {
            (
                entity,
                CollisionRectangle::new(extent.size, extent.anchor),
            )
        })
        .collect();

    for &(entity, rect) in &pending {
        if world.insert_one(entity, rect).is_ok() {
            log::trace!("Derived collision rectangle {:?} for {:?}", rect.size, entity);
        }
    }
    pending.len()
}
