//! Self-timer bookkeeping
//!
//! The event-scheduling substrate (host timer wheel, simulation kernel) is
//! external; the engine only tracks which of its own timers are armed so that
//! shutdown and crash can cancel every outstanding one. A timer that fires
//! after it was canceled is reported as stale, never acted on.

use std::collections::HashMap;

/// Handle to an armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

impl TimerId {
    /// Get the raw handle value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Kind of self-timer the interface arms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Bring-up work scheduled during the start sequence
    Startup,
    /// Waiting for an acknowledgment to a transmitted frame
    AckTimeout,
    /// Periodic housekeeping
    Housekeeping,
}

impl TimerKind {
    /// Whether this kind may be armed while the interface is still starting
    pub fn allowed_while_starting(&self) -> bool {
        matches!(self, TimerKind::Startup)
    }
}

/// The set of currently-armed timers, keyed by handle
#[derive(Debug, Default)]
pub(crate) struct TimerSet {
    next_id: u64,
    armed: HashMap<TimerId, TimerKind>,
}

impl TimerSet {
    pub(crate) fn arm(&mut self, kind: TimerKind) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.armed.insert(id, kind);
        id
    }

    /// Cancel one timer; returns its kind if it was still armed
    pub(crate) fn cancel(&mut self, id: TimerId) -> Option<TimerKind> {
        self.armed.remove(&id)
    }

    /// Cancel everything; returns how many timers were pending
    pub(crate) fn cancel_all(&mut self) -> usize {
        let count = self.armed.len();
        self.armed.clear();
        count
    }

    /// Consume a firing timer; `None` means the timer was canceled or never armed
    pub(crate) fn take(&mut self, id: TimerId) -> Option<TimerKind> {
        self.armed.remove(&id)
    }

    pub(crate) fn pending(&self) -> usize {
        self.armed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_fire_cancel() {
        let mut timers = TimerSet::default();
        let a = timers.arm(TimerKind::AckTimeout);
        let b = timers.arm(TimerKind::Housekeeping);
        assert_ne!(a, b);
        assert_eq!(timers.pending(), 2);

        assert_eq!(timers.take(a), Some(TimerKind::AckTimeout));
        // Firing consumes: a second fire of the same handle is stale
        assert_eq!(timers.take(a), None);

        assert_eq!(timers.cancel(b), Some(TimerKind::Housekeeping));
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn cancel_all_reports_count() {
        let mut timers = TimerSet::default();
        timers.arm(TimerKind::Startup);
        timers.arm(TimerKind::AckTimeout);
        assert_eq!(timers.cancel_all(), 2);
        assert_eq!(timers.cancel_all(), 0);
    }
}
