//! Drag & hook state machine
//!
//! The manager owns the pick / drag / release lifecycle:
//!
//! - `Idle + pick`: the topmost item under the pointer is grabbed (the whole
//!   chain with the primary button, the single item with the secondary one),
//!   detached from its parent, stopped and brought to the top.
//! - `Dragging + move`: the grabbed entity follows the pointer.
//! - `Dragging + release`: the drop is rejected (snap back) if it cuts a
//!   boundary or leaves the canvas, otherwise the entity is hooked onto an
//!   overlapping entity or left free with the pointer's inertia.
//!
//! The manager also owns the paint-order counter, so every layering value
//! in a level comes from one place.

use glam::Vec2;
use hecs::Entity;

use crate::core::{EventQueue, GameConfig, GameEvent};
use crate::ecs::{Item, PaintOrder, Transform, Velocity, World, hierarchy};
use crate::input::{PointerButton, PointerEvent};
use crate::physics::{CollisionRectangle, overlaps_any_axis, point_in_rect, rect_overlap};

/// Monotonic source of paint orders. Values are never reused.
#[derive(Debug, Clone)]
pub struct PaintOrderCounter {
    next: u64,
}

impl PaintOrderCounter {
    #[must_use]
    pub const fn new(first: u64) -> Self {
        Self { next: first }
    }

    /// Hand out the next top value
    pub fn mint(&mut self) -> PaintOrder {
        let order = PaintOrder(self.next);
        self.next += 1;
        order
    }

    /// Value the next call to `mint` will return
    #[must_use]
    pub const fn peek(&self) -> PaintOrder {
        PaintOrder(self.next)
    }
}

/// Current drag state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        target: Entity,
        /// Button that started the drag; only its release ends it
        button: PointerButton,
        /// `pointer - target.position` at pick time
        pointer_offset: Vec2,
        /// Where the target was picked up
        pickup_position: Vec2,
    },
}

/// How a drag ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseOutcome {
    /// Snapped back to the pickup position
    Rejected,
    /// Attached to another entity
    Hooked { parent: Entity },
    /// Left free, possibly thrown
    Dropped { velocity: Option<Vec2> },
}

/// Drag & hook manager
#[derive(Debug, Clone)]
pub struct DragManager {
    state: DragState,
    paint_orders: PaintOrderCounter,
    /// Pointer delta seen during the current frame
    last_delta: Vec2,
    /// Clamped timestep of the current frame
    last_dt: f32,
}

impl DragManager {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            state: DragState::Idle,
            paint_orders: PaintOrderCounter::new(config.first_paint_order),
            last_delta: Vec2::ZERO,
            last_dt: 1.0,
        }
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Entity currently being dragged
    #[must_use]
    pub fn dragged(&self) -> Option<Entity> {
        match self.state {
            DragState::Dragging { target, .. } => Some(target),
            DragState::Idle => None,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragged().is_some()
    }

    /// Mint a fresh top paint order
    pub fn mint_paint_order(&mut self) -> PaintOrder {
        self.paint_orders.mint()
    }

    pub fn paint_orders_mut(&mut self) -> &mut PaintOrderCounter {
        &mut self.paint_orders
    }

    /// Record the timestep used for release inertia
    pub fn begin_frame(&mut self, dt: f32) {
        self.last_dt = dt;
    }

    /// Forget the pointer delta once the frame is over
    pub fn end_frame(&mut self) {
        self.last_delta = Vec2::ZERO;
    }

    /// Feed one pointer event through the state machine
    pub fn handle(
        &mut self,
        world: &mut World,
        event: PointerEvent,
        config: &GameConfig,
        events: &mut EventQueue,
    ) {
        match event {
            PointerEvent::Pick { point, button } => {
                self.pick(world, point, button, config, events);
            }
            PointerEvent::Move { point, delta } => self.move_to(world, point, delta),
            PointerEvent::Release { point, button } => {
                self.release(world, point, button, config, events);
            }
        }
    }

    /// Topmost item whose rectangle contains `point`
    fn hit_test(world: &World, point: Vec2) -> Option<Entity> {
        world
            .query::<(&Item, &Transform, &CollisionRectangle, Option<&PaintOrder>)>()
            .iter()
            .filter(|(_, (_, transform, rect, _))| point_in_rect(point, rect, transform))
            .max_by_key(|(entity, (_, _, _, order))| (order.copied(), entity.id()))
            .map(|(entity, _)| entity)
    }

    /// Start dragging the item under `point`.
    ///
    /// Ignored while a drag is already in progress. Returns the grabbed
    /// entity.
    pub fn pick(
        &mut self,
        world: &mut World,
        point: Vec2,
        button: PointerButton,
        config: &GameConfig,
        events: &mut EventQueue,
    ) -> Option<Entity> {
        if self.is_dragging() {
            log::trace!("Pick ignored while dragging");
            return None;
        }

        let hit = Self::hit_test(world, point)?;
        let target = match button {
            PointerButton::Primary => {
                match hierarchy::find_root(world, hit, config.max_hierarchy_depth) {
                    Ok(root) => root,
                    Err(err) => {
                        log::error!("Cannot pick chain: {err}");
                        return None;
                    }
                }
            }
            PointerButton::Secondary => hit,
            PointerButton::Other(_) => return None,
        };

        let pickup_position = world.copied::<Transform>(target)?.position;
        if let Ok(mut item) = world.get_mut::<Item>(target) {
            item.detach();
        }
        let _ = world.remove_one::<Velocity>(target);
        let order = self.paint_orders.mint();
        world.insert_one(target, order).ok()?;

        self.state = DragState::Dragging {
            target,
            button,
            pointer_offset: point - pickup_position,
            pickup_position,
        };
        log::debug!(
            "Picked up {} with {button:?} (order {})",
            world.label(target),
            order.0
        );
        events.push(GameEvent::Pickup { entity: target });
        Some(target)
    }

    /// Make the dragged entity follow the pointer
    pub fn move_to(&mut self, world: &mut World, point: Vec2, delta: Vec2) {
        let DragState::Dragging {
            target,
            pointer_offset,
            ..
        } = self.state
        else {
            return;
        };

        match world.get_mut::<Transform>(target) {
            Ok(mut transform) => {
                transform.position = point - pointer_offset;
                self.last_delta = delta;
            }
            Err(_) => {
                log::debug!("Dragged entity {target:?} vanished");
                self.state = DragState::Idle;
            }
        }
    }

    /// Finish the drag started with `button`.
    ///
    /// Releases of other buttons, and releases while idle, are ignored and
    /// return `None`.
    pub fn release(
        &mut self,
        world: &mut World,
        point: Vec2,
        button: PointerButton,
        config: &GameConfig,
        events: &mut EventQueue,
    ) -> Option<ReleaseOutcome> {
        let DragState::Dragging {
            target,
            button: drag_button,
            pointer_offset,
            pickup_position,
        } = self.state
        else {
            return None;
        };
        if button != drag_button {
            return None;
        }
        self.state = DragState::Idle;

        let position = point - pointer_offset;
        world.get_mut::<Transform>(target).ok()?.position = position;
        let transform = Transform::from_position(position);
        let rect = world.copied::<CollisionRectangle>(target);

        let crosses_boundary = rect.is_some_and(|rect| overlaps_any_axis(world, &rect, &transform));
        if crosses_boundary || !config.contains(position) {
            if let Ok(mut transform) = world.get_mut::<Transform>(target) {
                transform.position = pickup_position;
            }
            log::debug!(
                "Drop of {} rejected, back to {pickup_position}",
                world.label(target)
            );
            events.push(GameEvent::Drop {
                entity: target,
                accepted: false,
            });
            return Some(ReleaseOutcome::Rejected);
        }

        let outcome = match rect.and_then(|rect| {
            Self::hook_candidate(world, target, &rect, &transform, config.max_hierarchy_depth)
        }) {
            Some(parent)
                if hierarchy::try_attach(world, target, parent, config.max_hierarchy_depth) =>
            {
                log::debug!(
                    "Hooked {} onto {}",
                    world.label(target),
                    world.label(parent)
                );
                events.push(GameEvent::Hook {
                    child: target,
                    parent,
                });
                ReleaseOutcome::Hooked { parent }
            }
            _ => {
                let velocity = (self.last_delta.length() > config.inertia_threshold).then(|| {
                    (self.last_delta / self.last_dt).clamp_length_max(config.max_inertia_speed)
                });
                if let Some(velocity) = velocity {
                    world.insert_one(target, Velocity(velocity)).ok()?;
                    log::debug!("Threw {} at {velocity}", world.label(target));
                }
                ReleaseOutcome::Dropped { velocity }
            }
        };

        events.push(GameEvent::Drop {
            entity: target,
            accepted: true,
        });
        Some(outcome)
    }

    /// Topmost entity overlapping the dragged one that it may hook onto.
    ///
    /// Entities in the dragged entity's own subtree are skipped, which keeps
    /// the hook graph a forest.
    fn hook_candidate(
        world: &World,
        target: Entity,
        rect: &CollisionRectangle,
        transform: &Transform,
        max_depth: usize,
    ) -> Option<Entity> {
        world
            .query::<(&CollisionRectangle, &Transform, Option<&PaintOrder>)>()
            .iter()
            .filter(|&(entity, (other_rect, other_transform, _))| {
                entity != target && rect_overlap(rect, transform, other_rect, other_transform)
            })
            .filter(|&(entity, _)| !hierarchy::chain_contains(world, entity, target, max_depth))
            .max_by_key(|(entity, (_, _, order))| (order.copied(), entity.id()))
            .map(|(entity, _)| entity)
    }
}
