/// Deferred re-opening of undecided pairs.
///
/// A skipped pair must not come straight back. Instead of a free-floating
/// timer, each skip schedules a re-open task on a schedule owned by the
/// ranker. Tasks are deadline-tagged and fire when the ranker polls the
/// schedule after the deadline; they can be cancelled one by one or all at
/// once (reset / drop), so a discarded ranker never gets mutated late.
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::types::ComparisonKey;

/// Source of wall-clock time for deadlines.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cancellation handle for one scheduled re-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct ScheduledReopen {
    handle: TaskHandle,
    key: ComparisonKey,
    due: Instant,
}

#[derive(Debug, Default)]
pub struct CooldownSchedule {
    next_handle: u64,
    pending: Vec<ScheduledReopen>,
}

impl CooldownSchedule {
    pub fn new() -> Self {
        CooldownSchedule::default()
    }

    /// Schedule `key` to be re-opened at `due`. A pair already waiting is
    /// re-armed with the later deadline rather than queued twice.
    pub fn schedule(&mut self, key: ComparisonKey, due: Instant) -> TaskHandle {
        self.pending.retain(|task| task.key != key);
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(ScheduledReopen { handle, key, due });
        handle
    }

    /// Returns false if the task already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.handle != handle);
        self.pending.len() != before
    }

    /// Cancel whatever is pending for `key`.
    pub fn cancel_key(&mut self, key: ComparisonKey) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.key != key);
        self.pending.len() != before
    }

    /// Cancel everything still pending. Returns how many tasks were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Remove and return the keys whose deadline has passed, oldest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<ComparisonKey> {
        let mut due: Vec<ScheduledReopen> = Vec::new();
        let mut waiting = Vec::with_capacity(self.pending.len());
        for task in self.pending.drain(..) {
            if task.due <= now {
                due.push(task);
            } else {
                waiting.push(task);
            }
        }
        self.pending = waiting;
        due.sort_by_key(|task| task.due);
        due.into_iter().map(|task| task.key).collect()
    }

    pub fn is_pending(&self, key: ComparisonKey) -> bool {
        self.pending.iter().any(|task| task.key == key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_fires_only_after_deadline() {
        let clock = ManualClock::new();
        let mut schedule = CooldownSchedule::new();
        let key = ComparisonKey::new(1, 2);
        schedule.schedule(key, clock.now() + Duration::from_secs(5));

        clock.advance(Duration::from_secs(4));
        assert!(schedule.take_due(clock.now()).is_empty());
        assert!(schedule.is_pending(key));

        clock.advance(Duration::from_secs(1));
        assert_eq!(schedule.take_due(clock.now()), vec![key]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_cancel_single_task() {
        let clock = ManualClock::new();
        let mut schedule = CooldownSchedule::new();
        let a = schedule.schedule(ComparisonKey::new(1, 2), clock.now());
        let _b = schedule.schedule(ComparisonKey::new(3, 4), clock.now());

        assert!(schedule.cancel(a));
        assert!(!schedule.cancel(a));
        assert!(!schedule.cancel_key(ComparisonKey::new(1, 2)));
        assert_eq!(schedule.take_due(clock.now()), vec![ComparisonKey::new(3, 4)]);
    }

    #[test]
    fn test_cancel_all() {
        let clock = ManualClock::new();
        let mut schedule = CooldownSchedule::new();
        schedule.schedule(ComparisonKey::new(1, 2), clock.now());
        schedule.schedule(ComparisonKey::new(2, 3), clock.now());
        assert_eq!(schedule.cancel_all(), 2);
        assert!(schedule.take_due(clock.now() + Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn test_rescheduling_same_pair_rearms() {
        let clock = ManualClock::new();
        let mut schedule = CooldownSchedule::new();
        let key = ComparisonKey::new(5, 6);
        schedule.schedule(key, clock.now() + Duration::from_secs(1));
        schedule.schedule(key, clock.now() + Duration::from_secs(10));
        assert_eq!(schedule.len(), 1);

        clock.advance(Duration::from_secs(2));
        assert!(schedule.take_due(clock.now()).is_empty());
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();
        clock.advance(Duration::from_secs(3));
        assert_eq!(other.now() - start, Duration::from_secs(3));
    }
}
