//! Pointer events in scene coordinates

use glam::Vec2;

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Grabs the whole chain under the pointer
    Primary,
    /// Grabs only the single item under the pointer
    Secondary,
    /// Any other button; ignored by dragging
    Other(u16),
}

/// A pointer event already mapped into scene space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pick { point: Vec2, button: PointerButton },
    Move { point: Vec2, delta: Vec2 },
    Release { point: Vec2, button: PointerButton },
}

impl PointerEvent {
    /// Scene position carried by the event
    #[must_use]
    pub fn point(&self) -> Vec2 {
        match *self {
            Self::Pick { point, .. } | Self::Move { point, .. } | Self::Release { point, .. } => {
                point
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_event_carries_a_point() {
        let point = Vec2::new(3.0, 4.0);
        let events = [
            PointerEvent::Pick {
                point,
                button: PointerButton::Primary,
            },
            PointerEvent::Move {
                point,
                delta: Vec2::X,
            },
            PointerEvent::Release {
                point,
                button: PointerButton::Other(4),
            },
        ];

        assert!(events.iter().all(|event| event.point() == point));
    }
}
