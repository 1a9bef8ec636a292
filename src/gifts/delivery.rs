//! Delivery of an assembled gift against the pending order

use hecs::Entity;

use super::constraint::{Constraint, PartMultiset};
use crate::core::{EventQueue, GameEvent};
use crate::ecs::World;
use crate::logic::find_major_gift;

/// The order a level currently expects. At most one exists per level and it
/// is consumed by a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftConstraint(pub Constraint);

/// Result of a delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub error_count: u32,
    pub reasons: Vec<Constraint>,
    /// Root of the delivered chain
    pub root: Option<Entity>,
}

impl DeliveryOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.error_count == 0
    }
}

fn pending_order_entity(world: &World) -> Option<Entity> {
    world
        .query::<&GiftConstraint>()
        .iter()
        .map(|(entity, _)| entity)
        .min_by_key(|entity| entity.id())
}

/// Install the order to validate the next delivery against, replacing any
/// order still pending.
pub fn install_order(world: &mut World, constraint: Constraint) -> Entity {
    if let Some(entity) = pending_order_entity(world) {
        log::debug!("Replacing pending order on {entity:?}");
        if world.insert_one(entity, GiftConstraint(constraint.clone())).is_ok() {
            return entity;
        }
    }
    world.spawn((GiftConstraint(constraint),))
}

/// Whether an order is waiting for a delivery
#[must_use]
pub fn has_pending_order(world: &World) -> bool {
    pending_order_entity(world).is_some()
}

/// Validate the major gift against the pending order and publish the result.
///
/// The order is consumed whatever the outcome. Returns `None` (and emits
/// nothing) when no order is pending.
pub fn deliver(world: &mut World, max_depth: usize, events: &mut EventQueue) -> Option<DeliveryOutcome> {
    let Some(order_entity) = pending_order_entity(world) else {
        log::warn!("Delivery requested with no pending order");
        return None;
    };
    let GiftConstraint(order) = world.remove_one::<GiftConstraint>(order_entity).ok()?;

    let major = find_major_gift(world, max_depth);
    let empty = PartMultiset::new();
    let parts = major.as_ref().map_or(&empty, |chain| &chain.parts);

    let report = order.check(parts);
    let outcome = DeliveryOutcome {
        error_count: report.error_count,
        reasons: report.owned_reasons(),
        root: major.as_ref().map(|chain| chain.root),
    };

    log::info!(
        "Delivered {} part(s): {} unmet requirement(s)",
        parts.total(),
        outcome.error_count
    );
    for reason in &outcome.reasons {
        log::debug!("  unmet: {reason}");
    }

    events.push(GameEvent::Delivery {
        error_count: outcome.error_count,
        reasons: outcome.reasons.clone(),
        root: outcome.root,
    });
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Item, Transform, hierarchy};
    use crate::gifts::GiftPart;
    use crate::gifts::catalog::{BASE1, LIGHTBULB};

    fn spawn_part(world: &mut World, name: &str) -> Entity {
        world.spawn((Item::new(), Transform::default(), GiftPart::new(name)))
    }

    #[test]
    fn test_successful_delivery_consumes_order() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let base = spawn_part(&mut world, BASE1);
        let bulb = spawn_part(&mut world, LIGHTBULB);
        assert!(hierarchy::try_attach(&mut world, bulb, base, 16));
        install_order(
            &mut world,
            Constraint::joint([Constraint::single(BASE1), Constraint::single(LIGHTBULB)]),
        );

        let outcome = deliver(&mut world, 16, &mut events).unwrap();

        assert!(outcome.is_accepted());
        assert_eq!(outcome.root, Some(base));
        assert!(!has_pending_order(&world));

        events.swap();
        assert!(matches!(
            events.iter().next(),
            Some(GameEvent::Delivery { error_count: 0, .. })
        ));
    }

    #[test]
    fn test_failed_delivery_lists_all_reasons() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        spawn_part(&mut world, "ribbon");
        let order = Constraint::joint([Constraint::single(BASE1), Constraint::single(LIGHTBULB)]);
        install_order(&mut world, order);

        let outcome = deliver(&mut world, 16, &mut events).unwrap();

        assert_eq!(outcome.error_count, 2);
        assert_eq!(
            outcome.reasons,
            vec![Constraint::single(BASE1), Constraint::single(LIGHTBULB)]
        );
    }

    #[test]
    fn test_delivery_without_order() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        spawn_part(&mut world, BASE1);

        assert!(deliver(&mut world, 16, &mut events).is_none());
        events.swap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_delivery_with_no_items() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        install_order(&mut world, Constraint::single(BASE1));

        let outcome = deliver(&mut world, 16, &mut events).unwrap();
        assert_eq!(outcome.error_count, 1);
        assert_eq!(outcome.root, None);
    }

    #[test]
    fn test_install_replaces_pending_order() {
        let mut world = World::new();
        let first = install_order(&mut world, Constraint::single(BASE1));
        let second = install_order(&mut world, Constraint::single(LIGHTBULB));

        assert_eq!(first, second);
        assert_eq!(world.query::<&GiftConstraint>().iter().count(), 1);
        assert_eq!(
            world.get::<GiftConstraint>(first).unwrap().0,
            Constraint::single(LIGHTBULB)
        );
    }
}
