//! Event Queue System for Decoupled Communication
//!
//! The core never calls into presentation, audio or narrative code. It pushes
//! [`GameEvent`]s into a double-buffered [`EventQueue`]; outside systems read
//! them after the frame, either by iterating the queue directly or through an
//! [`EventDispatcher`] keyed on [`EventKind`].
//!
//! # Example
//!
//! ```ignore
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.subscribe(EventKind::Hook, |event| {
//!     if let GameEvent::Hook { child, parent } = event {
//!         play_click(*child, *parent);
//!     }
//! });
//!
//! level.step(dt);
//! dispatcher.dispatch(&level.events);
//! ```

use std::collections::VecDeque;

use hecs::Entity;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::gifts::Constraint;
use crate::physics::Orientation;

// ============================================================================
// Event Types
// ============================================================================

/// Events emitted by the core for external subscribers.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    /// An entity was picked up by the pointer.
    Pickup {
        /// The dragged entity
        entity: Entity,
    },

    /// A drag ended.
    Drop {
        /// The released entity
        entity: Entity,
        /// `false` when the entity was snapped back to its pickup position
        accepted: bool,
    },

    /// An entity was hooked onto another one.
    Hook {
        /// The attached entity
        child: Entity,
        /// The entity it now follows
        parent: Entity,
    },

    /// A free entity bounced off a boundary.
    Bounce {
        entity: Entity,
        /// Orientation of the boundary that was hit
        orientation: Orientation,
    },

    /// A delivery attempt was evaluated.
    Delivery {
        /// Number of unmet requirements (0 means the order is satisfied)
        error_count: u32,
        /// Every unmet requirement node
        reasons: Vec<Constraint>,
        /// Root of the delivered chain, if any chain existed
        root: Option<Entity>,
    },

    /// Presentation cue raised by scheduled follow-ups.
    Cue {
        name: String,
    },
}

/// Fieldless tag of a [`GameEvent`], used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Pickup,
    Drop,
    Hook,
    Bounce,
    Delivery,
    Cue,
}

impl GameEvent {
    /// Tag of this event
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Pickup { .. } => EventKind::Pickup,
            Self::Drop { .. } => EventKind::Drop,
            Self::Hook { .. } => EventKind::Hook,
            Self::Bounce { .. } => EventKind::Bounce,
            Self::Delivery { .. } => EventKind::Delivery,
            Self::Cue { .. } => EventKind::Cue,
        }
    }
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for frame-consistent event processing.
///
/// Events pushed during a frame become readable after `swap()`, which the
/// level calls once at the end of every frame.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<GameEvent>,
    /// Events from the previous frame, ready for processing
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be read after the next swap.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over readable events.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Drain all readable events.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any readable events.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of readable events.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events waiting for the next swap.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all events (both pending and processing).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Dispatch table from event tags to subscriber callbacks.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: FxHashMap<EventKind, SmallVec<[Handler; 2]>>,
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one kind of event.
    pub fn subscribe(&mut self, kind: EventKind, handler: impl FnMut(&GameEvent) + 'static) {
        self.handlers
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
    }

    /// Number of handlers registered for a kind.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, SmallVec::len)
    }

    /// Deliver a single event to its subscribers.
    pub fn emit(&mut self, event: &GameEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers.iter_mut() {
                handler(event);
            }
        }
    }

    /// Deliver every readable event of a queue, in order.
    pub fn dispatch(&mut self, queue: &EventQueue) {
        for event in queue.iter() {
            self.emit(event);
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("kinds", &self.handlers.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
