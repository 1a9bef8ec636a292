//! Hook hierarchy between items
//!
//! Items form a parent-pointer forest: each [`Item`] optionally names the
//! entity it is hooked onto. Every walk over the parent links is bounded by an
//! explicit depth cap, so corrupted data can never hang a frame.

use std::fmt;

use glam::Vec2;
use hecs::Entity;

use super::{Transform, World};

/// A draggable, hookable entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Item {
    /// Entity this item is rigidly attached to (`None` for a chain root)
    pub hooked_parent: Option<Entity>,
    /// `parent.position - self.position` at hook time
    pub hook_offset: Vec2,
}

impl Item {
    /// Create a free (root) item
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hooked_parent: None,
            hook_offset: Vec2::ZERO,
        }
    }

    /// Whether the item is a chain root
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.hooked_parent.is_none()
    }

    /// Drop the link to the parent
    pub fn detach(&mut self) {
        self.hooked_parent = None;
        self.hook_offset = Vec2::ZERO;
    }
}

/// Errors raised when a parent walk does not terminate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyError {
    /// The walk came back to its starting entity
    CycleDetected { start: Entity },
    /// The walk exceeded the configured depth cap
    DepthExceeded { start: Entity },
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleDetected { start } => write!(f, "hook cycle through entity {start:?}"),
            Self::DepthExceeded { start } => {
                write!(f, "hook chain from entity {start:?} exceeds depth cap")
            }
        }
    }
}

impl std::error::Error for HierarchyError {}

fn parent_of(world: &World, entity: Entity) -> Option<Entity> {
    world
        .copied::<Item>(entity)
        .and_then(|item| item.hooked_parent)
        .filter(|&parent| world.contains(parent))
}

/// Walk `hooked_parent` links up to the chain root.
///
/// A link to an entity that no longer exists ends the walk: the last
/// existing entity is reported as the root until hook maintenance removes
/// the orphan.
pub fn find_root(world: &World, start: Entity, max_depth: usize) -> Result<Entity, HierarchyError> {
    let mut current = start;
    for _ in 0..=max_depth {
        match parent_of(world, current) {
            Some(parent) if parent == start => {
                return Err(HierarchyError::CycleDetected { start });
            }
            Some(parent) => current = parent,
            None => return Ok(current),
        }
    }
    Err(HierarchyError::DepthExceeded { start })
}

/// Number of links between `start` and its root
pub fn depth(world: &World, start: Entity, max_depth: usize) -> Result<usize, HierarchyError> {
    let mut current = start;
    for depth in 0..=max_depth {
        match parent_of(world, current) {
            Some(parent) if parent == start => {
                return Err(HierarchyError::CycleDetected { start });
            }
            Some(parent) => current = parent,
            None => return Ok(depth),
        }
    }
    Err(HierarchyError::DepthExceeded { start })
}

/// Check whether `target` is `start` or one of its ancestors.
///
/// A walk that hits the depth cap answers `true`, so callers treat a
/// suspicious chain as unsafe to attach to.
pub fn chain_contains(world: &World, start: Entity, target: Entity, max_depth: usize) -> bool {
    let mut current = start;
    for _ in 0..=max_depth {
        if current == target {
            return true;
        }
        match parent_of(world, current) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
    true
}

/// Hook `child` onto `parent` unless that would close a cycle.
///
/// Returns whether the attachment happened. The offset is taken from the
/// current transforms of both entities.
pub fn try_attach(world: &mut World, child: Entity, parent: Entity, max_depth: usize) -> bool {
    if chain_contains(world, parent, child, max_depth) {
        return false;
    }
    let (Some(child_transform), Some(parent_transform)) = (
        world.copied::<Transform>(child),
        world.copied::<Transform>(parent),
    ) else {
        return false;
    };
    let Ok(mut item) = world.get_mut::<Item>(child) else {
        return false;
    };
    item.hooked_parent = Some(parent);
    item.hook_offset = parent_transform.position - child_transform.position;
    true
}
