//! Headless demo: plays one scripted round of the workshop level

use giftbench::gifts::catalog::{BASE1, LIGHTBULB};
use giftbench::hecs::Entity;
use giftbench::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

/// Center of an item's collision rectangle
fn center(level: &Level, entity: Entity) -> Option<Vec2> {
    let transform = level.world.copied::<Transform>(entity)?;
    let rect = level.world.copied::<CollisionRectangle>(entity)?;
    let (start, end) = rect.bounds(transform.position);
    Some((start + end) / 2.0)
}

fn find_part(level: &Level, name: &str) -> Option<Entity> {
    level
        .world
        .query::<&GiftPart>()
        .iter()
        .find(|(_, part)| part.name == name)
        .map(|(entity, _)| entity)
}

fn subscribe_logging(dispatcher: &mut EventDispatcher) {
    dispatcher.subscribe(EventKind::Hook, |event| {
        if let GameEvent::Hook { child, parent } = event {
            log::info!("click: {child:?} hooked onto {parent:?}");
        }
    });
    dispatcher.subscribe(EventKind::Drop, |event| {
        if let GameEvent::Drop { accepted: false, .. } = event {
            log::info!("thud: drop rejected");
        }
    });
    dispatcher.subscribe(EventKind::Delivery, |event| {
        if let GameEvent::Delivery {
            error_count,
            reasons,
            ..
        } = event
        {
            if *error_count == 0 {
                log::info!("Order fulfilled!");
            } else {
                for reason in reasons {
                    log::info!("Still missing: {reason}");
                }
            }
        }
    });
    dispatcher.subscribe(EventKind::Cue, |event| {
        if let GameEvent::Cue { name } = event {
            log::info!("cue: {name}");
        }
    });
}

fn run_frames(level: &mut Level, dispatcher: &mut EventDispatcher, frames: usize) {
    for _ in 0..frames {
        level.step(FRAME);
        dispatcher.dispatch(&level.events);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let scene = match args.next() {
        Some(path) => LevelScene::load_ron(path)?,
        None => LevelScene::workshop(),
    };
    let config = match args.next() {
        Some(path) => GameConfig::load_ron(path)?,
        None => GameConfig::default(),
    };

    let mut level = Level::new(config);
    scene.populate(&mut level, &GiftCatalog::builtin())?;

    let mut dispatcher = EventDispatcher::new();
    subscribe_logging(&mut dispatcher);

    // Let the bulb bounce around for a second
    run_frames(&mut level, &mut dispatcher, 60);

    let (Some(bulb), Some(base)) = (find_part(&level, LIGHTBULB), find_part(&level, BASE1)) else {
        log::warn!("Level has no bulb and base to assemble");
        return Ok(());
    };

    if let (Some(from), Some(to)) = (center(&level, bulb), center(&level, base)) {
        level.queue_input(PointerEvent::Pick {
            point: from,
            button: PointerButton::Secondary,
        });
        level.queue_input(PointerEvent::Move {
            point: to,
            delta: Vec2::ZERO,
        });
        level.queue_input(PointerEvent::Release {
            point: to,
            button: PointerButton::Secondary,
        });
        run_frames(&mut level, &mut dispatcher, 1);
    }

    level.schedule(0.0, |events| {
        events.push(GameEvent::Cue {
            name: "media/button".to_string(),
        });
    });
    level.schedule(0.1, |events| {
        events.push(GameEvent::Cue {
            name: "media/steps_in".to_string(),
        });
    });

    if let Some(outcome) = level.deliver() {
        if outcome.is_accepted() {
            if let Some(root) = outcome.root {
                level.launch(root);
            }
        }
    }
    run_frames(&mut level, &mut dispatcher, 12);

    log::info!(
        "Finished after {} frames, {} entities left",
        level.time.frame(),
        level.world.len()
    );
    Ok(())
}
