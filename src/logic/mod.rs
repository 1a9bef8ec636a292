//! Gameplay logic: dragging, hooking and chain aggregation

mod chain;
mod drag;
mod hooks;

pub use chain::{Chain, collect_chains, find_major_gift};
pub use drag::{DragManager, DragState, PaintOrderCounter, ReleaseOutcome};
pub use hooks::{HookReport, maintain_hooks};
