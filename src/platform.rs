//! Injected platform capabilities and the trailing-edge debouncer
//!
//! The composer never reaches for a global clock or window object. The host
//! passes a [`Platform`] at construction; tests and script replays use
//! [`ManualPlatform`] so time only moves when told to.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// What the composer needs from its environment
pub trait Platform {
    /// Monotonic time since the platform was created
    fn now(&self) -> Duration;

    /// Whether the surface exposes caret/selection primitives. Without them
    /// every insertion appends at the end of the document.
    fn supports_selection(&self) -> bool;
}

/// Wall-clock platform
#[derive(Debug, Clone)]
pub struct SystemPlatform {
    started: Instant,
}

impl Default for SystemPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPlatform {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Platform for SystemPlatform {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn supports_selection(&self) -> bool {
        true
    }
}

/// Virtual clock for tests and deterministic replays
#[derive(Debug)]
pub struct ManualPlatform {
    now: Cell<Duration>,
    selection: Cell<bool>,
}

impl Default for ManualPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualPlatform {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            selection: Cell::new(true),
        }
    }

    /// A surface without selection support
    pub fn without_selection() -> Self {
        let platform = Self::new();
        platform.selection.set(false);
        platform
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set_supports_selection(&self, supported: bool) {
        self.selection.set(supported);
    }
}

impl Platform for ManualPlatform {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn supports_selection(&self) -> bool {
        self.selection.get()
    }
}

/// Single pending trailing-edge task.
///
/// Scheduling while a task is pending replaces it, so a burst of schedules
/// fires once, `delay` after the last one.
#[derive(Debug)]
pub struct Debouncer<T> {
    pending: Option<(Duration, T)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire at `now + delay`, replacing any pending task
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: T) {
        self.pending = Some((now + delay, task));
    }

    /// Take the pending task if its deadline has passed
    pub fn fire_due(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.pending.take().map(|(_, task)| task),
            _ => None,
        }
    }

    /// Drop the pending task
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, task)| task)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_fires_after_deadline_only() {
        let mut d = Debouncer::new();
        d.schedule(ms(0), ms(25), 1);
        assert_eq!(d.fire_due(ms(24)), None);
        assert_eq!(d.fire_due(ms(25)), Some(1));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_reschedule_replaces_pending_task() {
        let mut d = Debouncer::new();
        d.schedule(ms(0), ms(25), 1);
        d.schedule(ms(10), ms(25), 2);
        assert_eq!(d.deadline(), Some(ms(35)));
        assert_eq!(d.fire_due(ms(30)), None);
        assert_eq!(d.fire_due(ms(35)), Some(2));
        assert_eq!(d.fire_due(ms(100)), None);
    }

    #[test]
    fn test_manual_platform_clock() {
        let p = ManualPlatform::new();
        p.advance_ms(5);
        p.advance_ms(7);
        assert_eq!(p.now(), ms(12));
        assert!(p.supports_selection());
        assert!(!ManualPlatform::without_selection().supports_selection());
    }

    #[test]
    fn test_system_platform_is_monotonic() {
        let p = SystemPlatform::new();
        let a = p.now();
        let b = p.now();
        assert!(b >= a);
        assert!(p.supports_selection());
    }
}
