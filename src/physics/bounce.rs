//! Boundary bouncing for free-moving entities
//!
//! Each frame a candidate position is predicted from the velocity. When the
//! candidate cuts through a boundary axis it is stepped back one unit of the
//! travel direction at a time until it is clear, and the velocity component
//! across that boundary is reflected. Entities that hit nothing are moved by
//! plain integration.

use glam::Vec2;
use hecs::Entity;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::collision::{CollisionAxis, CollisionRectangle, Orientation, axis_overlap};
use crate::core::{EventQueue, GameConfig, GameEvent};
use crate::ecs::{Transform, Velocity, World};

/// Outcome of resolving one entity against the boundaries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceResolution {
    /// De-penetrated position to commit
    pub position: Vec2,
    /// Velocity after reflection
    pub velocity: Vec2,
    /// Accumulated collision signal per coordinate (x, y)
    pub signal: Vec2,
}

impl BounceResolution {
    /// Whether any reflection happened
    #[must_use]
    pub fn collided(&self, threshold: f32) -> bool {
        self.signal.x > threshold || self.signal.y > threshold
    }
}

/// Resolve a single moving rectangle against a set of boundary axes.
///
/// Returns `None` when the velocity is zero or the candidate does not cross
/// any axis.
#[must_use]
pub fn resolve(
    position: Vec2,
    velocity: Vec2,
    rect: &CollisionRectangle,
    axes: &[CollisionAxis],
    dt: f32,
    config: &GameConfig,
) -> Option<BounceResolution> {
    let direction = velocity.normalize_or_zero();
    if direction == Vec2::ZERO {
        return None;
    }

    let mut candidate = Transform::from_position(position + velocity * dt);
    let mut signal = Vec2::ZERO;

    for axis in axes {
        let index = axis.orientation.index();
        // Stepping back parallel to the axis can never clear it
        if direction[index] == 0.0 || !axis_overlap(axis, rect, &candidate) {
            continue;
        }

        let before = candidate;
        let mut steps = 0;
        while axis_overlap(axis, rect, &candidate) && steps < config.max_depenetration_steps {
            candidate.translate(-direction);
            steps += 1;
        }
        if axis_overlap(axis, rect, &candidate) {
            log::trace!("Axis at {} not cleared after {steps} steps", axis.position);
            candidate = before;
            continue;
        }
        signal[index] = 1.0;
    }

    let mut reflected = velocity;
    if signal.x > config.bounce_threshold {
        reflected.x = -reflected.x;
    }
    if signal.y > config.bounce_threshold {
        reflected.y = -reflected.y;
    }

    let resolution = BounceResolution {
        position: candidate.position,
        velocity: reflected,
        signal,
    };
    resolution
        .collided(config.bounce_threshold)
        .then_some(resolution)
}

/// Per-frame bounce physics processor
#[derive(Debug, Default)]
pub struct BounceProcessor {
    /// Entities resolved against a boundary during the current frame
    resolved: FxHashSet<Entity>,
}

impl BounceProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run boundary resolution followed by velocity integration
    pub fn run(&mut self, world: &mut World, dt: f32, config: &GameConfig, events: &mut EventQueue) {
        self.resolve_boundaries(world, dt, config, events);
        self.integrate(world, dt);
    }

    /// Reflect entities whose next step would cross a boundary
    pub fn resolve_boundaries(
        &mut self,
        world: &mut World,
        dt: f32,
        config: &GameConfig,
        events: &mut EventQueue,
    ) {
        self.resolved.clear();

        let axes: Vec<CollisionAxis> = world
            .query::<&CollisionAxis>()
            .iter()
            .map(|(_, axis)| *axis)
            .collect();
        if axes.is_empty() {
            return;
        }

        for (entity, (transform, velocity, rect)) in
            world.query_mut::<(&mut Transform, &mut Velocity, &CollisionRectangle)>()
        {
            let Some(resolution) = resolve(transform.position, velocity.0, rect, &axes, dt, config)
            else {
                continue;
            };

            transform.position = resolution.position;
            velocity.0 = resolution.velocity;
            self.resolved.insert(entity);

            let mut flipped: SmallVec<[Orientation; 2]> = SmallVec::new();
            if resolution.signal.x > config.bounce_threshold {
                flipped.push(Orientation::Vertical);
            }
            if resolution.signal.y > config.bounce_threshold {
                flipped.push(Orientation::Horizontal);
            }
            for orientation in flipped {
                log::trace!("{entity:?} bounced off a {orientation:?} boundary");
                events.push(GameEvent::Bounce {
                    entity,
                    orientation,
                });
            }
        }
    }

    /// Move every free entity that was not resolved this frame
    pub fn integrate(&mut self, world: &mut World, dt: f32) {
        for (entity, (transform, velocity)) in world.query_mut::<(&mut Transform, &Velocity)>() {
            if self.resolved.contains(&entity) {
                continue;
            }
            transform.translate(velocity.0 * dt);
        }
    }

    /// Entities that bounced during the last run
    pub fn resolved(&self) -> &FxHashSet<Entity> {
        &self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventKind;

    fn square() -> CollisionRectangle {
        CollisionRectangle::from_size(Vec2::new(10.0, 10.0))
    }

    #[test]
    fn test_horizontal_boundary_negates_vertical_velocity() {
        let config = GameConfig::default();
        let axes = [CollisionAxis::horizontal(0.0)];

        let resolution = resolve(
            Vec2::new(50.0, 5.0),
            Vec2::new(30.0, -120.0),
            &square(),
            &axes,
            0.1,
            &config,
        )
        .expect("should collide with the floor");

        assert_eq!(resolution.velocity, Vec2::new(30.0, 120.0));
        assert!(!axis_overlap(
            &axes[0],
            &square(),
            &Transform::from_position(resolution.position)
        ));
    }

    #[test]
    fn test_vertical_boundary_negates_horizontal_velocity() {
        let config = GameConfig::default();
        let axes = [CollisionAxis::vertical(100.0)];

        let resolution = resolve(
            Vec2::new(88.0, 50.0),
            Vec2::new(100.0, 0.0),
            &square(),
            &axes,
            0.1,
            &config,
        )
        .unwrap();

        assert_eq!(resolution.velocity, Vec2::new(-100.0, 0.0));
        assert!(resolution.position.x + 10.0 <= 100.0);
    }

    #[test]
    fn test_clear_path_does_not_resolve() {
        let config = GameConfig::default();
        let axes = [CollisionAxis::horizontal(0.0)];

        assert!(
            resolve(
                Vec2::new(50.0, 50.0),
                Vec2::new(10.0, -10.0),
                &square(),
                &axes,
                0.1,
                &config
            )
            .is_none()
        );
        assert!(resolve(Vec2::new(50.0, 1.0), Vec2::ZERO, &square(), &axes, 0.1, &config).is_none());
    }

    #[test]
    fn test_parallel_motion_across_axis_is_not_resolved() {
        let config = GameConfig::default();
        let axes = [CollisionAxis::horizontal(0.0)];

        assert!(
            resolve(
                Vec2::new(50.0, -5.0),
                Vec2::new(100.0, 0.0),
                &square(),
                &axes,
                0.1,
                &config
            )
            .is_none()
        );
    }

    #[test]
    fn test_uncleared_axis_keeps_candidate() {
        let config = GameConfig {
            max_depenetration_steps: 2,
            ..GameConfig::default()
        };
        let axes = [CollisionAxis::horizontal(0.0)];

        // Clearing the floor takes five steps
        assert!(
            resolve(
                Vec2::new(50.0, -4.0),
                Vec2::new(0.0, -10.0),
                &square(),
                &axes,
                0.1,
                &config
            )
            .is_none()
        );
    }

    #[test]
    fn test_item_straddling_axis_slides_along_it() {
        let config = GameConfig::default();
        let mut world = World::new();
        let mut events = EventQueue::new();
        world.spawn((CollisionAxis::horizontal(0.0),));
        let sliding = world.spawn((
            Transform::from_xy(50.0, -5.0),
            Velocity::new(100.0, 0.0),
            square(),
        ));

        BounceProcessor::new().run(&mut world, 0.1, &config, &mut events);

        assert_eq!(
            world.copied::<Transform>(sliding).unwrap().position,
            Vec2::new(60.0, -5.0)
        );
        assert_eq!(world.copied::<Velocity>(sliding).unwrap().0, Vec2::new(100.0, 0.0));
        events.swap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_processor_bounces_and_integrates() {
        let config = GameConfig::default();
        let mut world = World::new();
        let mut events = EventQueue::new();
        world.spawn((CollisionAxis::horizontal(0.0),));

        let falling = world.spawn((
            Transform::from_xy(50.0, 1.0),
            Velocity::new(0.0, -100.0),
            square(),
        ));
        let drifting = world.spawn((
            Transform::from_xy(200.0, 200.0),
            Velocity::new(10.0, 0.0),
            square(),
        ));

        let mut processor = BounceProcessor::new();
        processor.run(&mut world, 0.1, &config, &mut events);

        assert_eq!(processor.resolved().len(), 1);
        assert!(processor.resolved().contains(&falling));
        assert_eq!(world.copied::<Velocity>(falling).unwrap().0, Vec2::new(0.0, 100.0));
        assert_eq!(
            world.copied::<Transform>(drifting).unwrap().position,
            Vec2::new(201.0, 200.0)
        );

        events.swap();
        assert_eq!(events.iter().filter(|e| e.kind() == EventKind::Bounce).count(), 1);
    }

    #[test]
    fn test_velocity_without_rectangle_still_moves() {
        let config = GameConfig::default();
        let mut world = World::new();
        let mut events = EventQueue::new();
        world.spawn((CollisionAxis::vertical(0.0),));
        let letter = world.spawn((Transform::from_xy(-5.0, 0.0), Velocity::new(300.0, 0.0)));

        BounceProcessor::new().run(&mut world, 0.5, &config, &mut events);

        assert_eq!(
            world.copied::<Transform>(letter).unwrap().position,
            Vec2::new(145.0, 0.0)
        );
    }
}
