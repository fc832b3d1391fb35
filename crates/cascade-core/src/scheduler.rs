//! Deterministic virtual-clock timer queue.
//!
//! Timers are one-shot and fire-and-forget from the caller's point of view:
//! `schedule` returns immediately and the message is handed back by
//! [`Scheduler::advance`] once the virtual clock passes its due time. The
//! host owns the clock, so tests advance time explicitly instead of sleeping.
//!
//! ```
//! use cascade_core::Scheduler;
//!
//! let mut timers = Scheduler::new();
//! timers.schedule(310, "clear previous");
//! timers.schedule(10, "end transition");
//!
//! assert_eq!(timers.advance(10), vec!["end transition"]);
//! assert_eq!(timers.advance(300), vec!["clear previous"]);
//! assert!(timers.is_idle());
//! ```

use crate::state::Command;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Pending<M> {
    id: TimerId,
    due_ms: u64,
    message: M,
}

/// One-shot timer queue driven by a virtual millisecond clock.
#[derive(Debug)]
pub struct Scheduler<M> {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Pending<M>>,
}

impl<M> Default for Scheduler<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Scheduler<M> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Deliver `message` once `after_ms` milliseconds have elapsed.
    pub fn schedule(&mut self, after_ms: u32, message: M) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due_ms = self.now_ms + u64::from(after_ms);
        log::trace!("timer {} scheduled for t={due_ms}ms", id.0);
        self.pending.push(Pending {
            id,
            due_ms,
            message,
        });
        id
    }

    /// Schedule every delay carried by `command`.
    pub fn enqueue(&mut self, command: Command<M>) -> Vec<TimerId> {
        command
            .into_delays()
            .into_iter()
            .map(|(after_ms, message)| self.schedule(after_ms, message))
            .collect()
    }

    /// Cancel a single timer. Returns `false` if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        before != self.pending.len()
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::trace!("cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    /// Number of timers that have not fired yet.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Milliseconds until the next timer fires.
    #[must_use]
    pub fn next_due_in(&self) -> Option<u64> {
        self.pending
            .iter()
            .map(|p| p.due_ms.saturating_sub(self.now_ms))
            .min()
    }

    /// Move the clock forward and return the messages that came due.
    ///
    /// Messages are ordered by due time; timers due at the same instant fire
    /// in the order they were scheduled.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<M> {
        self.now_ms += delta_ms;
        let now = self.now_ms;

        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_ms <= now);
        self.pending = rest;

        due.sort_by_key(|p| (p.due_ms, p.id));
        due.into_iter()
            .map(|p| {
                log::trace!("timer {} fired at t={}ms", p.id.0, p.due_ms);
                p.message
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_starts_idle() {
        let s: Scheduler<u8> = Scheduler::new();
        assert!(s.is_idle());
        assert_eq!(s.now_ms(), 0);
        assert_eq!(s.next_due_in(), None);
    }

    #[test]
    fn test_scheduler_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(310, 'b');
        s.schedule(10, 'a');
        assert_eq!(s.next_due_in(), Some(10));
        assert_eq!(s.advance(1000), vec!['a', 'b']);
    }

    #[test]
    fn test_scheduler_ties_fire_in_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(5, 1);
        s.schedule(5, 2);
        s.schedule(5, 3);
        assert_eq!(s.advance(5), vec![1, 2, 3]);
    }

    #[test]
    fn test_scheduler_not_due_yet() {
        let mut s = Scheduler::new();
        s.schedule(10, ());
        assert!(s.advance(9).is_empty());
        assert_eq!(s.pending_count(), 1);
        assert_eq!(s.next_due_in(), Some(1));
        assert_eq!(s.advance(1).len(), 1);
    }

    #[test]
    fn test_scheduler_delay_relative_to_now() {
        let mut s = Scheduler::new();
        s.advance(100);
        s.schedule(10, "late");
        assert!(s.advance(5).is_empty());
        assert_eq!(s.advance(5), vec!["late"]);
        assert_eq!(s.now_ms(), 110);
    }

    #[test]
    fn test_scheduler_cancel() {
        let mut s = Scheduler::new();
        let a = s.schedule(10, 'a');
        s.schedule(10, 'b');
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert_eq!(s.advance(10), vec!['b']);
    }

    #[test]
    fn test_scheduler_cancel_all() {
        let mut s = Scheduler::new();
        s.schedule(10, 'a');
        s.schedule(310, 'b');
        s.cancel_all();
        assert!(s.is_idle());
        assert!(s.advance(1000).is_empty());
    }

    #[test]
    fn test_scheduler_enqueue_command() {
        let mut s = Scheduler::new();
        let ids = s.enqueue(Command::batch([
            Command::delay(10, "end"),
            Command::delay(310, "clear"),
        ]));
        assert_eq!(ids.len(), 2);
        assert_eq!(s.advance(310), vec!["end", "clear"]);
        assert!(s.enqueue(Command::None).is_empty());
    }
}
