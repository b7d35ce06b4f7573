//! Deferred tasks with deterministic ordering and cancellation.
//!
//! Tasks are ordered by due time, ties broken by insertion order. Time
//! only moves when the owner says so (`pop_due` / `set_now`), which keeps
//! every delayed reveal reproducible in tests.

use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies one scheduled task; pass it to [`Scheduler::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle {
    due: Duration,
    sequence: u64,
}

impl TaskHandle {
    pub fn due(&self) -> Duration {
        self.due
    }
}

#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BTreeMap<TaskHandle, T>,
    now: Duration,
    sequence: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            queue: BTreeMap::new(),
            now: Duration::ZERO,
            sequence: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Schedules `task` to run `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle {
            due: self.now.saturating_add(delay),
            sequence: self.sequence,
        };
        self.sequence += 1;
        self.queue.insert(handle, task);
        handle
    }

    /// Returns `false` if the task already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.queue.remove(&handle).is_some()
    }

    /// Drops every pending task.
    pub fn clear(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Removes the earliest task due at or before `deadline` and moves the
    /// clock to its due time, so anything it schedules is relative to when
    /// it fired.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        let (&handle, _) = self.queue.first_key_value()?;
        if handle.due > deadline {
            return None;
        }
        self.now = self.now.max(handle.due);
        self.queue.remove(&handle)
    }

    /// Moves the clock forward. Never moves it backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(s: &mut Scheduler<&'static str>, deadline: Duration) -> Vec<&'static str> {
        let mut fired = Vec::new();
        while let Some(task) = s.pop_due(deadline) {
            fired.push(task);
        }
        s.set_now(deadline);
        fired
    }

    #[test]
    fn fires_in_time_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(300), "late");
        s.schedule(ms(100), "early");
        s.schedule(ms(200), "middle");

        assert_eq!(drain(&mut s, ms(1000)), vec!["early", "middle", "late"]);
        assert!(s.is_empty());
    }

    #[test]
    fn huge_delays_saturate() {
        let mut s = Scheduler::new();
        s.set_now(ms(1000));
        let handle = s.schedule(Duration::MAX, "never");
        assert_eq!(handle.due(), Duration::MAX);
        assert_eq!(s.pop_due(ms(5000)), None);
    }

    #[test]
    fn ties_fire_in_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(100), "first");
        s.schedule(ms(100), "second");
        s.schedule(ms(100), "third");

        assert_eq!(drain(&mut s, ms(100)), vec!["first", "second", "third"]);
    }

    #[test]
    fn respects_deadline() {
        let mut s = Scheduler::new();
        s.schedule(ms(100), "a");
        s.schedule(ms(250), "b");

        assert_eq!(drain(&mut s, ms(200)), vec!["a"]);
        assert_eq!(s.now(), ms(200));
        assert_eq!(drain(&mut s, ms(250)), vec!["b"]);
    }

    #[test]
    fn delays_are_relative_to_now() {
        let mut s = Scheduler::new();
        s.set_now(ms(1000));
        let handle = s.schedule(ms(50), "x");
        assert_eq!(handle.due(), ms(1050));
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut s = Scheduler::new();
        let a = s.schedule(ms(100), "a");
        s.schedule(ms(200), "b");

        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert_eq!(drain(&mut s, ms(500)), vec!["b"]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut s = Scheduler::new();
        s.schedule(ms(100), "a");
        s.schedule(ms(200), "b");

        assert_eq!(s.clear(), 2);
        assert!(drain(&mut s, ms(500)).is_empty());
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut s: Scheduler<()> = Scheduler::new();
        s.set_now(ms(500));
        s.set_now(ms(100));
        assert_eq!(s.now(), ms(500));
    }
}
