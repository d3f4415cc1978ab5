use std::time::Duration;

/// One cancellable deadline.
///
/// The engine never spawns real timers. Every session owns a `Timer`
/// and the host passes the current time into `poll` style calls, so a
/// cancelled or dropped session has nothing left that could fire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Duration>,
}

impl Timer {
    /// Arms the timer `delay` after `now`, replacing any earlier deadline.
    /// Deadlines past the end of time saturate to `Duration::MAX`
    pub fn schedule(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now.saturating_add(delay));
    }

    /// Returns whether a deadline was pending
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Disarms the timer and hands back its deadline once `now` reached it
    pub fn fire_if_due(&mut self, now: Duration) -> Option<Duration> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.deadline.take(),
            _ => None,
        }
    }
}
