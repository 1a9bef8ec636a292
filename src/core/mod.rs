//! Core module
//!
//! Configuration, frame clock, events, deferred callbacks, level files and
//! the level frame loop

mod config;
mod events;
mod level;
mod scene;
mod schedule;
mod time;

pub use config::GameConfig;
pub use events::{EventDispatcher, EventKind, EventQueue, GameEvent};
pub use level::Level;
pub use scene::{ItemDef, LevelScene, LoadError, OrderDef};
pub use schedule::Scheduler;
pub use time::Time;
