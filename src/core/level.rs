//! A playable level and its frame loop

use std::collections::VecDeque;

use glam::Vec2;
use hecs::Entity;

use super::{EventQueue, GameConfig, Scheduler, Time};
use crate::ecs::{Item, Name, Transform, Velocity, World};
use crate::gifts::{self, Constraint, DeliveryOutcome, GiftPart};
use crate::input::PointerEvent;
use crate::logic::{self, Chain, DragManager, HookReport};
use crate::physics::{self, BounceProcessor, CollisionAxis, VisualExtent};

/// Store, processors and queues of one level.
///
/// Every frame runs in a fixed order: pointer input and dragging, bounce
/// physics, hook maintenance, then scheduled callbacks. Events produced
/// during a frame are readable from `events` once `step` returns.
pub struct Level {
    /// Entity/component store
    pub world: World,
    pub config: GameConfig,
    pub time: Time,
    /// Events for external subscribers
    pub events: EventQueue,
    /// Deferred callbacks, polled once per frame
    pub scheduler: Scheduler<EventQueue>,
    drag: DragManager,
    bounce: BounceProcessor,
    input: VecDeque<PointerEvent>,
}

impl Level {
    pub fn new(config: GameConfig) -> Self {
        Self {
            world: World::new(),
            drag: DragManager::new(&config),
            config,
            time: Time::new(),
            events: EventQueue::new(),
            scheduler: Scheduler::new(),
            bounce: BounceProcessor::new(),
            input: VecDeque::new(),
        }
    }

    pub fn drag(&self) -> &DragManager {
        &self.drag
    }

    /// Spawn a loose item on top of everything spawned before
    pub fn spawn_item(
        &mut self,
        position: Vec2,
        extent: VisualExtent,
        part: Option<&str>,
        velocity: Option<Vec2>,
        name: Option<&str>,
    ) -> Entity {
        let order = self.drag.mint_paint_order();
        let entity = self
            .world
            .spawn((Item::new(), Transform::from_position(position), extent, order));
        if let Some(part) = part {
            let _ = self.world.insert_one(entity, GiftPart::new(part));
        }
        if let Some(velocity) = velocity {
            let _ = self.world.insert_one(entity, Velocity(velocity));
        }
        if let Some(name) = name {
            let _ = self.world.insert_one(entity, Name::new(name));
        }
        entity
    }

    /// Spawn a static boundary line
    pub fn spawn_axis(&mut self, axis: CollisionAxis) -> Entity {
        self.world.spawn((axis,))
    }

    /// Install the order the next delivery is checked against
    pub fn install_order(&mut self, constraint: Constraint) -> Entity {
        gifts::install_order(&mut self.world, constraint)
    }

    /// Cache collision rectangles for items that only have a visual extent
    pub fn derive_bounding_boxes(&mut self) -> usize {
        physics::derive_bounding_boxes(&mut self.world)
    }

    /// Queue a pointer event for the next frame
    pub fn queue_input(&mut self, event: PointerEvent) {
        self.input.push_back(event);
    }

    /// Feed a pointer event to the drag manager right away
    pub fn handle_input(&mut self, event: PointerEvent) {
        self.drag
            .handle(&mut self.world, event, &self.config, &mut self.events);
    }

    /// Advance the level by one frame. Returns the clamped timestep.
    pub fn step(&mut self, raw_dt: f32) -> f32 {
        let dt = self.config.clamp_dt(raw_dt);
        self.time.advance(dt);

        self.derive_bounding_boxes();

        self.drag.begin_frame(dt);
        while let Some(event) = self.input.pop_front() {
            self.handle_input(event);
        }

        self.bounce
            .run(&mut self.world, dt, &self.config, &mut self.events);

        let hooks = self.maintain_hooks();
        if !hooks.despawned.is_empty() {
            log::debug!("Frame {}: removed {} orphan(s)", self.time.frame(), hooks.despawned.len());
        }

        self.scheduler.poll(self.time.elapsed(), &mut self.events);

        self.drag.end_frame();
        self.events.swap();
        dt
    }

    fn maintain_hooks(&mut self) -> HookReport {
        logic::maintain_hooks(
            &mut self.world,
            self.drag.paint_orders_mut(),
            self.config.max_hierarchy_depth,
        )
    }

    /// The chain with the most gift parts
    pub fn major_gift(&self) -> Option<Chain> {
        logic::find_major_gift(&self.world, self.config.max_hierarchy_depth)
    }

    /// Check the major gift against the pending order and publish the result
    pub fn deliver(&mut self) -> Option<DeliveryOutcome> {
        gifts::deliver(
            &mut self.world,
            self.config.max_hierarchy_depth,
            &mut self.events,
        )
    }

    /// Remove a delivered chain. Its hooked members follow on later frames.
    pub fn launch(&mut self, root: Entity) -> bool {
        let launched = self.world.despawn(root).is_ok();
        if launched {
            log::info!("Launched chain rooted at {root:?}");
        }
        launched
    }

    /// Run `callback` on the event queue `delay` seconds from now
    pub fn schedule(&mut self, delay: f64, callback: impl FnOnce(&mut EventQueue) + 'static) {
        self.scheduler.schedule(self.time.elapsed(), delay, callback);
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
