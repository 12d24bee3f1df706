//! Deferred work and stale-result detection.
//!
//! Two primitives cover every timed or asynchronous operation in the
//! presentation core:
//! - [`Scheduler`] hands out cancellable [`TimerHandle`]s for deferred events.
//!   It has no clock of its own; the owner advances it with the tick time.
//! - [`Generation`] tags async work so a superseded result can be recognised
//!   and discarded when it finally resolves.

/// Handle to a scheduled timer. Cancelling a fired or unknown handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    pub handle: TimerHandle,
    /// The deadline the timer was scheduled for (not the tick that observed it).
    pub deadline_ms: f64,
    pub event: E,
}

#[derive(Debug, Clone)]
struct Entry<E> {
    handle: TimerHandle,
    deadline_ms: f64,
    event: E,
}

/// Deterministic timer queue driven by presentation time.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    entries: Vec<Entry<E>>,
    next_id: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire at `now_ms + delay_ms`.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, event: E) -> TimerHandle {
        self.schedule_at(now_ms + delay_ms.max(0.0), event)
    }

    /// Schedule `event` at an absolute deadline.
    pub fn schedule_at(&mut self, deadline_ms: f64, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        // Keep entries ordered by deadline, FIFO among equal deadlines
        let index = self
            .entries
            .iter()
            .position(|e| e.deadline_ms > deadline_ms)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            index,
            Entry {
                handle,
                deadline_ms,
                event,
            },
        );
        handle
    }

    /// Cancel a pending timer. Returns true if it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove and return the earliest timer due at `now_ms`, if any.
    ///
    /// Callers loop on this so that timers scheduled while handling a fired
    /// timer are also delivered when they are already due.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Fired<E>> {
        let first = self.entries.first()?;
        if first.deadline_ms > now_ms {
            return None;
        }
        let entry = self.entries.remove(0);
        Some(Fired {
            handle: entry.handle,
            deadline_ms: entry.deadline_ms,
            event: entry.event,
        })
    }

    /// Remove and return every timer due at `now_ms`, in deadline order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<Fired<E>> {
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(now_ms) {
            fired.push(f);
        }
        fired
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Deadline of the next pending timer.
    pub fn next_deadline(&self) -> Option<f64> {
        self.entries.first().map(|e| e.deadline_ms)
    }
}

/// Monotonic tag for async work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// The generation that supersedes this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues generations and tells whether a given one is still current.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate all outstanding work and return the new current generation.
    pub fn bump(&mut self) -> Generation {
        self.current = self.current.next();
        self.current
    }

    pub fn current(&self) -> Generation {
        self.current
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 300.0, "c");
        scheduler.schedule(0.0, 100.0, "a");
        scheduler.schedule(0.0, 200.0, "b");

        let fired: Vec<_> = scheduler.drain_due(250.0).into_iter().map(|f| f.event).collect();
        assert_eq!(fired, vec!["a", "b"]);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.next_deadline(), Some(300.0));
    }

    #[test]
    fn test_equal_deadlines_are_fifo() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_at(10.0, 1);
        scheduler.schedule_at(10.0, 2);
        scheduler.schedule_at(10.0, 3);
        let fired: Vec<_> = scheduler.drain_due(10.0).into_iter().map(|f| f.event).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let keep = scheduler.schedule(0.0, 50.0, "keep");
        let dropped = scheduler.schedule(0.0, 50.0, "drop");

        assert!(scheduler.cancel(dropped));
        assert!(!scheduler.cancel(dropped));
        assert!(scheduler.is_pending(keep));

        let fired = scheduler.drain_due(1_000.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].event, "keep");
        assert_eq!(fired[0].deadline_ms, 50.0);
        assert!(!scheduler.is_pending(keep));
    }

    #[test]
    fn test_not_due_yet() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100.0, 50.0, ());
        assert!(scheduler.pop_due(149.9).is_none());
        assert!(scheduler.pop_due(150.0).is_some());
    }

    #[test]
    fn test_generation_counter() {
        let mut counter = GenerationCounter::new();
        let first = counter.bump();
        assert!(counter.is_current(first));
        let second = counter.bump();
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
        assert!(second > first);
    }
}
