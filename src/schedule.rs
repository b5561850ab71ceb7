//! Deferred transitions on a per-session virtual clock
//!
//! Every session owns a `Timers<K>` where `K` names the transition to run.
//! The host moves the clock forward with `pop_due`/`settle`; nothing here
//! sleeps, so sessions stay deterministic under test and a tokio driver can
//! map the deadlines onto real time.

use std::time::Duration;

/// Cancellation handle for a scheduled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<K> {
    pub id: TimerId,
    pub deadline: Duration,
    pub kind: K,
}

#[derive(Debug, Clone)]
pub struct Timers<K> {
    now: Duration,
    next_id: u64,
    pending: Vec<Fired<K>>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<K> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this clock since the owner was created
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(Fired {
            id,
            deadline: self.now + delay,
            kind,
        });
        id
    }

    /// Returns false when the timer already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.deadline).min()
    }

    /// Removes the earliest timer due at or before `until` and moves the clock
    /// to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<K>> {
        let pos = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(pos, _)| pos)?;

        let fired = self.pending.remove(pos);
        if fired.deadline > self.now {
            self.now = fired.deadline;
        }
        Some(fired)
    }

    /// Moves the clock to `until` once no more timers are due
    pub fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }
}
