//! Deferred callbacks keyed by elapsed time
//!
//! Replaces "wait N seconds then continue" sequencing with an explicit queue
//! that the frame loop polls once per frame.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

type Callback<C> = Box<dyn FnOnce(&mut C)>;

struct Scheduled<C> {
    due: f64,
    seq: u64,
    callback: Callback<C>,
}

impl<C> PartialEq for Scheduled<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C> Eq for Scheduled<C> {}

impl<C> PartialOrd for Scheduled<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> Ord for Scheduled<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Queue of callbacks that run once the clock reaches their due time.
///
/// Callbacks with equal due times run in the order they were scheduled.
pub struct Scheduler<C> {
    queue: BinaryHeap<Reverse<Scheduled<C>>>,
    next_seq: u64,
}

impl<C> Scheduler<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Run `callback` once `delay` seconds have elapsed after `now`.
    pub fn schedule(&mut self, now: f64, delay: f64, callback: impl FnOnce(&mut C) + 'static) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Scheduled {
            due: now + delay.max(0.0),
            seq,
            callback: Box::new(callback),
        }));
    }

    /// Run every callback due at or before `now`. Returns how many ran.
    pub fn poll(&mut self, now: f64, ctx: &mut C) -> usize {
        let mut ran = 0;
        while self
            .queue
            .peek()
            .is_some_and(|Reverse(next)| next.due <= now)
        {
            if let Some(Reverse(next)) = self.queue.pop() {
                (next.callback)(ctx);
                ran += 1;
            }
        }
        ran
    }

    /// Number of callbacks still waiting
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every waiting callback
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.queue.len())
            .finish()
    }
}
