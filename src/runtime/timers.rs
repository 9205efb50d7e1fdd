use std::collections::BTreeMap;
use std::time::Duration;

use crate::controller::driver::Scheduler;
use crate::foundation::core::TimerId;

/// Deterministic timer wheel driven by an explicit clock.
///
/// Each timer records the owner `K` it fires for. Timers due at the same instant fire in
/// scheduling order.
#[derive(Clone, Debug)]
pub struct VirtualTimers<K> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, TimerId), K>,
    due_at: BTreeMap<TimerId, Duration>,
}

impl<K> Default for VirtualTimers<K> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            due_at: BTreeMap::new(),
        }
    }
}

impl<K: Copy> VirtualTimers<K> {
    /// Empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.first_key_value().map(|(&(at, _), _)| at)
    }

    /// Schedule a timer for `owner`, due `after` from now.
    pub fn schedule(&mut self, owner: K, after: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let at = self.now.saturating_add(after);
        self.queue.insert((at, id), owner);
        self.due_at.insert(id, at);
        id
    }

    /// Drop a pending timer. Unknown ids are ignored.
    pub fn cancel(&mut self, id: TimerId) {
        if let Some(at) = self.due_at.remove(&id) {
            self.queue.remove(&(at, id));
        }
    }

    /// Pop the earliest timer due no later than `until`, moving the clock to its deadline.
    ///
    /// Returns `None` once nothing is due; the clock is then left at `until`.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, K)> {
        let (&(at, id), _) = self.queue.first_key_value()?;
        if at > until {
            self.now = self.now.max(until);
            return None;
        }
        let owner = self.queue.remove(&(at, id))?;
        self.due_at.remove(&id);
        self.now = self.now.max(at);
        Some((id, owner))
    }

    /// Borrow the wheel as a [`Scheduler`] that tags new timers with `owner`.
    pub fn owned(&mut self, owner: K) -> OwnedTimers<'_, K> {
        OwnedTimers {
            timers: self,
            owner,
        }
    }
}

/// Scheduling view of [`VirtualTimers`] for one owner.
pub struct OwnedTimers<'a, K> {
    timers: &'a mut VirtualTimers<K>,
    owner: K,
}

impl<K: Copy> Scheduler for OwnedTimers<'_, K> {
    fn schedule(&mut self, after: Duration) -> TimerId {
        self.timers.schedule(self.owner, after)
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.cancel(id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/timers.rs"]
mod tests;
