//! Per-frame maintenance of hooked items
//!
//! Hooked items mirror their parent's position at a fixed offset and are
//! always painted above it. An item whose parent no longer exists is removed;
//! its own children notice on a later frame, so a deleted chain disappears
//! one level per frame.

use hecs::Entity;

use super::drag::PaintOrderCounter;
use crate::ecs::{Item, PaintOrder, Transform, World, hierarchy};

/// What one maintenance pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookReport {
    /// Orphans removed this pass
    pub despawned: Vec<Entity>,
    /// Items that received a new paint order
    pub reordered: Vec<Entity>,
}

/// Run one maintenance pass.
pub fn maintain_hooks(
    world: &mut World,
    paint_orders: &mut PaintOrderCounter,
    max_depth: usize,
) -> HookReport {
    let mut report = HookReport::default();

    let hooked: Vec<(Entity, Entity)> = world
        .query::<&Item>()
        .iter()
        .filter_map(|(entity, item)| item.hooked_parent.map(|parent| (entity, parent)))
        .collect();

    // Orphans are judged against the store as it was when the pass started
    let (orphans, mut attached): (Vec<_>, Vec<_>) = hooked
        .into_iter()
        .partition(|&(_, parent)| !world.contains(parent));

    for (entity, _) in orphans {
        if world.despawn(entity).is_ok() {
            log::debug!("Removed {entity:?}: its parent is gone");
            report.despawned.push(entity);
        }
    }

    // Parents first, so a whole chain moves rigidly within one pass
    attached.sort_by_key(|&(entity, _)| {
        hierarchy::depth(world, entity, max_depth).unwrap_or(usize::MAX)
    });

    for (entity, parent) in attached {
        if !world.contains(entity) || !world.contains(parent) {
            continue;
        }
        let Some(parent_transform) = world.copied::<Transform>(parent) else {
            continue;
        };
        let Some(item) = world.copied::<Item>(entity) else {
            continue;
        };
        if let Ok(mut transform) = world.get_mut::<Transform>(entity) {
            transform.position = parent_transform.position - item.hook_offset;
        }

        let order = world.copied::<PaintOrder>(entity);
        let parent_order = world.copied::<PaintOrder>(parent);
        if order <= parent_order && world.insert_one(entity, paint_orders.mint()).is_ok() {
            report.reordered.push(entity);
        }
    }

    report
}
