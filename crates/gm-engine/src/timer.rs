//! One-shot timers for delayed transitions.
//!
//! Every mounted component owns exactly one [`TimerQueue`]. Entries fire in
//! deadline order, ties broken by scheduling order, and can be cancelled
//! individually or all at once when the owner is torn down.

use std::collections::BTreeMap;

use crate::clock::Timestamp;

/// Handle to a scheduled timer. Ordered by (deadline, scheduling order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId {
    deadline: Timestamp,
    seq: u64,
}

impl TimerId {
    /// When this timer is due.
    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }
}

/// Pending one-shot timers carrying payloads of type `E`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerQueue<E> {
    pending: BTreeMap<TimerId, E>,
    next_seq: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `event` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Timestamp, event: E) -> TimerId {
        let id = TimerId {
            deadline,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(id, event);
        id
    }

    /// Cancel a timer. Returns its payload if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> Option<E> {
        self.pending.remove(&id)
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Whether `id` is still pending.
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.pending.keys().next().map(TimerId::deadline)
    }

    /// Remove and return the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(Timestamp, E)> {
        if self.next_deadline()? > now {
            return None;
        }
        self.pending
            .pop_first()
            .map(|(id, event)| (id.deadline, event))
    }

    /// Iterate pending timers in firing order.
    pub fn iter(&self) -> impl Iterator<Item = (TimerId, &E)> {
        self.pending.iter().map(|(id, e)| (*id, e))
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(at(300), "late");
        q.schedule(at(100), "early");
        q.schedule(at(200), "middle");

        assert_eq!(q.next_deadline(), Some(at(100)));
        assert_eq!(q.pop_due(at(1000)), Some((at(100), "early")));
        assert_eq!(q.pop_due(at(1000)), Some((at(200), "middle")));
        assert_eq!(q.pop_due(at(1000)), Some((at(300), "late")));
        assert_eq!(q.pop_due(at(1000)), None);
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule(at(100), 1);
        q.schedule(at(100), 2);
        q.schedule(at(100), 3);
        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(at(100)))
            .map(|(_, e)| e)
            .collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn not_due_yet() {
        let mut q = TimerQueue::new();
        q.schedule(at(500), ());
        assert_eq!(q.pop_due(at(499)), None);
        assert_eq!(q.len(), 1);
        assert!(q.pop_due(at(500)).is_some());
    }

    #[test]
    fn cancel_single() {
        let mut q = TimerQueue::new();
        let a = q.schedule(at(100), "a");
        q.schedule(at(200), "b");
        assert!(q.is_scheduled(a));
        assert_eq!(q.cancel(a), Some("a"));
        assert!(!q.is_scheduled(a));
        assert_eq!(q.cancel(a), None);
        assert_eq!(q.next_deadline(), Some(at(200)));
    }

    #[test]
    fn cancel_all_empties() {
        let mut q = TimerQueue::new();
        q.schedule(at(100), ());
        q.schedule(at(200), ());
        assert_eq!(q.cancel_all(), 2);
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
    }
}
