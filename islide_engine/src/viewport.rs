use std::time::Duration;

use islide_layout::Viewport;

use crate::timer::Timer;

/// Holds back viewport changes until the window stopped resizing.
///
/// Every resize replaces the pending size and restarts the wait, so only
/// the last size of a burst is ever applied.
#[derive(Debug)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<Viewport>,
    timer: Timer,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            timer: Timer::default(),
        }
    }

    pub fn resize(&mut self, viewport: Viewport, now: Duration) {
        self.pending = Some(viewport);
        self.timer.schedule(now, self.delay);
    }

    /// The settled viewport, once the wait is over
    pub fn poll(&mut self, now: Duration) -> Option<Viewport> {
        self.timer.fire_if_due(now)?;
        self.pending.take()
    }

    pub const fn pending(&self) -> Option<Viewport> {
        self.pending
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.pending = None;
    }
}
