//! Input handling module
//!
//! Pointer events in scene space, plus the mapping from window space.

mod pointer;
mod viewport;

pub use pointer::{PointerButton, PointerEvent};
pub use viewport::Viewport;
