//! Debounced save scheduling.
//!
//! Mutations only mark the state dirty. A save is due once the oldest unsaved
//! change is at least `debounce` old, which collapses bursts of edits into one
//! file rewrite. The scheduler holds no timers; callers poll
//! [`SaveScheduler::should_flush`] from their own loop and always flush on exit.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SaveScheduler {
    debounce: Duration,
    dirty_since: Option<Instant>,
}

impl SaveScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            dirty_since: None,
        }
    }

    /// Record an unsaved change. Keeps the earliest timestamp.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty_since.get_or_insert(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// True when dirty and the debounce window has elapsed.
    pub fn should_flush(&self, now: Instant) -> bool {
        self.dirty_since
            .is_some_and(|since| now.saturating_duration_since(since) >= self.debounce)
    }

    /// Call after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty_since = None;
    }
}
