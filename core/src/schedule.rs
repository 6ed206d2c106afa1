use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

/// Tasks are cancelled together by group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskGroup {
    Row(RowId),
    Round,
}

#[derive(Clone, Debug)]
struct Pending<T> {
    id: TaskId,
    group: TaskGroup,
    start: Duration,
    due: Duration,
    payload: T,
}

/// Frame-driven timer queue.
///
/// Nothing runs on its own: the owner calls [`Scheduler::advance`] once per tick and then drains
/// [`Scheduler::pop_due`], so a task cancelled by an earlier task in the same tick never fires.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
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
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, group: TaskGroup, delay: Duration, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            group,
            start: self.now,
            due: self.now.saturating_add(delay),
            payload,
        });
        id
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|task| task.id == id)
    }

    /// How far along a pending task is, from `0.0` when scheduled to `1.0` when due.
    pub fn progress(&self, id: TaskId) -> Option<f32> {
        let task = self.pending.iter().find(|task| task.id == id)?;
        let total = task.due.saturating_sub(task.start);
        if total.is_zero() {
            return Some(1.0);
        }
        let elapsed = self.now.saturating_sub(task.start);
        Some((elapsed.as_secs_f32() / total.as_secs_f32()).min(1.0))
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.id != id);
        self.pending.len() != before
    }

    pub fn cancel_group(&mut self, group: TaskGroup) -> usize {
        let before = self.pending.len();
        self.pending.retain(|task| task.group != group);
        let cancelled = before - self.pending.len();
        if cancelled > 0 {
            log::debug!("cancelled {cancelled} task(s) in {group:?}");
        }
        cancelled
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Removes and returns the earliest due task, ties broken by scheduling order.
    pub fn pop_due(&mut self) -> Option<T> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= self.now)
            .min_by_key(|(_, task)| (task.due, task.id))
            .map(|(index, _)| index)?;
        Some(self.pending.remove(index).payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn tasks_fire_once_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TaskGroup::Round, 2 * SECOND, "late");
        scheduler.schedule(TaskGroup::Round, SECOND, "early");
        scheduler.schedule(TaskGroup::Round, SECOND, "early-second");

        scheduler.advance(SECOND / 2);
        assert_eq!(scheduler.pop_due(), None);

        scheduler.advance(SECOND);
        assert_eq!(scheduler.pop_due(), Some("early"));
        assert_eq!(scheduler.pop_due(), Some("early-second"));
        assert_eq!(scheduler.pop_due(), None);

        scheduler.advance(SECOND);
        assert_eq!(scheduler.pop_due(), Some("late"));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn progress_tracks_elapsed_time() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(TaskGroup::Round, 2 * SECOND, ());

        assert_eq!(scheduler.progress(id), Some(0.0));
        scheduler.advance(SECOND);
        assert_eq!(scheduler.progress(id), Some(0.5));
        scheduler.advance(5 * SECOND);
        assert_eq!(scheduler.progress(id), Some(1.0));

        scheduler.pop_due();
        assert_eq!(scheduler.progress(id), None);
    }

    #[test]
    fn cancel_group_only_touches_that_group() {
        let mut scheduler = Scheduler::new();
        let row = TaskGroup::Row(RowId(1));
        scheduler.schedule(row, SECOND, 1);
        scheduler.schedule(row, SECOND, 2);
        let other = scheduler.schedule(TaskGroup::Row(RowId(2)), SECOND, 3);

        assert_eq!(scheduler.cancel_group(row), 2);
        assert!(scheduler.is_pending(other));

        scheduler.advance(SECOND);
        assert_eq!(scheduler.pop_due(), Some(3));
        assert_eq!(scheduler.pop_due(), None);
    }

    #[test]
    fn cancel_single_task() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(TaskGroup::Round, Duration::ZERO, ());

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.pop_due(), None);
    }
}
