//! 2D boundary physics
//!
//! Axis-aligned rectangles against infinite axis lines, resolved per frame
//! by iterative de-penetration.

mod bounce;
pub mod collision;

pub use bounce::{BounceProcessor, BounceResolution, resolve};
pub use collision::{
    CollisionAxis, CollisionRectangle, Orientation, VisualExtent, axis_overlap,
    derive_bounding_boxes, overlaps_any_axis, point_in_rect, rect_overlap,
};
