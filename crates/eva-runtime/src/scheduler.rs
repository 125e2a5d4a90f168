//! Timer queue
//!
//! Virtual-time scheduler. Nothing fires on its own: the embedder (or a
//! test) advances the clock and due timers run in order of due time, ties
//! broken by scheduling order.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use eva_dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimerEntry {
    pub id: u64,
    pub owner: NodeId,
    pub name: &'static str,
    pub due: u64,
    pub interval: Option<u64>,
}

#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    next_id: u64,
    timers: Vec<TimerEntry>,
}

impl TimerQueue {
    pub fn schedule(&mut self, owner: NodeId, name: &'static str, due: u64, interval: Option<u64>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        // A zero period would never let the clock move past it
        let interval = interval.map(|ms| ms.max(1));
        self.timers.push(TimerEntry { id, owner, name, due, interval });
        id
    }

    pub fn cancel(&mut self, id: u64) {
        self.timers.retain(|t| t.id != id);
    }

    pub fn cancel_owner(&mut self, owner: NodeId) {
        self.timers.retain(|t| t.owner != owner);
    }

    /// Take the earliest timer due at or before `until`.
    ///
    /// Intervals stay queued, re-armed one period later.
    pub fn pop_due(&mut self, until: u64) -> Option<TimerEntry> {
        let index = self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        let entry = self.timers[index];
        match entry.interval {
            // An interval that can no longer move forward fires one last time
            Some(period) if entry.due.saturating_add(period) > entry.due => {
                self.timers[index].due = entry.due.saturating_add(period);
            }
            _ => {
                self.timers.remove(index);
            }
        }
        Some(entry)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }
}

/// Pending timeout or interval; cancelled when dropped
#[must_use = "dropping a TimerGuard cancels the timer immediately"]
#[derive(Debug)]
pub struct TimerGuard {
    id: u64,
    queue: Weak<RefCell<TimerQueue>>,
}

impl TimerGuard {
    pub(crate) fn new(id: u64, queue: &Rc<RefCell<TimerQueue>>) -> Self {
        Self {
            id,
            queue: Rc::downgrade(queue),
        }
    }

    /// Cancel now
    pub fn cancel(self) {}
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.borrow_mut().cancel(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_order() {
        let mut queue = TimerQueue::default();
        let owner = NodeId::ROOT;
        queue.schedule(owner, "late", 200, None);
        queue.schedule(owner, "early", 100, None);
        queue.schedule(owner, "tie", 100, None);

        assert_eq!(queue.pop_due(50), None);
        assert_eq!(queue.pop_due(300).map(|t| t.name), Some("early"));
        assert_eq!(queue.pop_due(300).map(|t| t.name), Some("tie"));
        assert_eq!(queue.pop_due(300).map(|t| t.name), Some("late"));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_interval_rearms() {
        let mut queue = TimerQueue::default();
        queue.schedule(NodeId::ROOT, "tick", 100, Some(100));

        let mut fired = 0;
        while queue.pop_due(350).is_some() {
            fired += 1;
        }
        assert_eq!(fired, 3);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_huge_interval_saturates() {
        let mut queue = TimerQueue::default();
        queue.schedule(NodeId::ROOT, "slow", 10, Some(u64::MAX - 5));

        assert_eq!(queue.pop_due(10).map(|t| t.due), Some(10));
        assert_eq!(queue.pop_due(u64::MAX).map(|t| t.due), Some(u64::MAX));
        assert_eq!(queue.pop_due(u64::MAX), None);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_guard_cancels() {
        let queue = Rc::new(RefCell::new(TimerQueue::default()));
        let id = queue.borrow_mut().schedule(NodeId::ROOT, "t", 10, None);
        let guard = TimerGuard::new(id, &queue);
        assert_eq!(queue.borrow().len(), 1);
        guard.cancel();
        assert_eq!(queue.borrow().len(), 0);
    }
}
