use std::time::Duration;

use super::debounce::Delay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Open,
    Suppressed,
}

/// Keeps a programmatic query update from reopening the list it just closed.
#[derive(Debug)]
pub struct SelectionGuard {
    window: Duration,
    state: GuardState,
    timer: Delay,
}

impl SelectionGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: GuardState::Open,
            timer: Delay::new(),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn is_suppressed(&self) -> bool {
        self.state == GuardState::Suppressed
    }

    /// Enters `Suppressed`; `release` is called with the returned generation once the window ends.
    /// Engaging again while suppressed restarts the window.
    pub fn engage<F>(&mut self, release: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.state = GuardState::Suppressed;
        self.timer.arm(self.window, release)
    }

    /// Back to `Open` if `generation` is the live window. Returns whether it was.
    pub fn release(&mut self, generation: u64) -> bool {
        if self.timer.take_if_current(generation) {
            self.state = GuardState::Open;
            true
        } else {
            false
        }
    }

    /// Drops the pending release timer; used on teardown.
    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.state = GuardState::Open;
    }
}
