//! Chain aggregation
//!
//! Groups every item into the chain it belongs to (by shared root) and
//! totals the gift parts per chain. The chain with the most parts is the
//! "major gift", the candidate for delivery.

use hecs::Entity;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::ecs::{Item, World, hierarchy};
use crate::gifts::{GiftPart, PartMultiset};

/// A maximal set of items connected through hook links
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub root: Entity,
    /// Members in discovery order, root included
    pub members: SmallVec<[Entity; 8]>,
    /// Gift parts carried by the members
    pub parts: PartMultiset,
}

impl Chain {
    fn new(root: Entity) -> Self {
        Self {
            root,
            members: SmallVec::new(),
            parts: PartMultiset::new(),
        }
    }

    /// Number of gift parts in the chain
    #[must_use]
    pub fn part_count(&self) -> u32 {
        self.parts.total()
    }
}

/// Item entities in a fixed order (by entity index)
fn ordered_items(world: &World) -> Vec<Entity> {
    let mut items: Vec<Entity> = world.query::<&Item>().iter().map(|(e, _)| e).collect();
    items.sort_by_key(|entity| entity.id());
    items
}

/// Group every item into its chain, in order of first discovery.
///
/// Each item is counted exactly once. Items whose parent walk fails are
/// logged and left out.
pub fn collect_chains(world: &World, max_depth: usize) -> Vec<Chain> {
    let mut chains: Vec<Chain> = Vec::new();
    let mut by_root: FxHashMap<Entity, usize> = FxHashMap::default();

    for entity in ordered_items(world) {
        let root = match hierarchy::find_root(world, entity, max_depth) {
            Ok(root) => root,
            Err(err) => {
                log::error!("Skipping item during aggregation: {err}");
                continue;
            }
        };

        let index = *by_root.entry(root).or_insert_with(|| {
            chains.push(Chain::new(root));
            chains.len() - 1
        });
        let chain = &mut chains[index];
        chain.members.push(entity);
        if let Ok(part) = world.get::<GiftPart>(entity) {
            chain.parts.insert(part.name.as_str());
        }
    }

    chains
}

/// Find the chain with the strictly largest number of gift parts.
///
/// Ties go to the chain discovered first. Returns `None` when the world
/// holds no items.
pub fn find_major_gift(world: &World, max_depth: usize) -> Option<Chain> {
    let mut best: Option<Chain> = None;
    for chain in collect_chains(world, max_depth) {
        let better = best
            .as_ref()
            .is_none_or(|current| chain.part_count() > current.part_count());
        if better {
            best = Some(chain);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Transform;

    const CAP: usize = 64;

    fn spawn_chain(world: &mut World, size: usize, part: &str) -> Vec<Entity> {
        let members: Vec<Entity> = (0..size)
            .map(|_| world.spawn((Item::new(), Transform::default(), GiftPart::new(part))))
            .collect();
        for pair in members.windows(2) {
            assert!(hierarchy::try_attach(world, pair[1], pair[0], CAP));
        }
        members
    }

    #[test]
    fn test_major_gift_is_largest_chain() {
        let mut world = World::new();
        spawn_chain(&mut world, 2, "a");
        let five = spawn_chain(&mut world, 5, "b");
        spawn_chain(&mut world, 3, "c");

        let major = find_major_gift(&world, CAP).unwrap();
        assert_eq!(major.root, five[0]);
        assert_eq!(major.part_count(), 5);
        assert_eq!(major.parts.count("b"), 5);
    }

    #[test]
    fn test_tie_goes_to_first_discovered() {
        let mut world = World::new();
        let first = spawn_chain(&mut world, 3, "a");
        spawn_chain(&mut world, 3, "b");

        let major = find_major_gift(&world, CAP).unwrap();
        assert_eq!(major.root, first[0]);
    }

    #[test]
    fn test_branching_chain_counted_once() {
        let mut world = World::new();
        let trunk = spawn_chain(&mut world, 2, "base1");
        let leaf = world.spawn((Item::new(), Transform::default(), GiftPart::new("lightbulb")));
        assert!(hierarchy::try_attach(&mut world, leaf, trunk[0], CAP));

        let chains = collect_chains(&world, CAP);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].members.len(), 3);
        assert_eq!(chains[0].parts.count("base1"), 2);
        assert_eq!(chains[0].parts.count("lightbulb"), 1);
    }

    #[test]
    fn test_items_without_parts_do_not_count() {
        let mut world = World::new();
        let plain: Vec<Entity> = (0..4)
            .map(|_| world.spawn((Item::new(), Transform::default())))
            .collect();
        for pair in plain.windows(2) {
            hierarchy::try_attach(&mut world, pair[1], pair[0], CAP);
        }
        let tagged = spawn_chain(&mut world, 1, "ribbon");

        let major = find_major_gift(&world, CAP).unwrap();
        assert_eq!(major.root, tagged[0]);
    }

    #[test]
    fn test_no_items() {
        let world = World::new();
        assert!(find_major_gift(&world, CAP).is_none());
    }
}
