use std::time::Duration;
use tokio::task::JoinHandle;

/// One-shot timer task. Re-arming or dropping it aborts the previous task.
///
/// Every arm gets a generation number that is handed to the callback, so a
/// firing that was already queued when the timer got cancelled can be told
/// apart from the live one with [`Delay::take_if_current`].
#[derive(Debug, Default)]
pub struct Delay {
    pending: Option<JoinHandle<()>>,
    generation: u64,
}

impl Delay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must be called from within a tokio runtime. `fire` never runs before this returns.
    pub fn arm<F>(&mut self, after: Duration, fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            fire(generation);
        }));
        generation
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// Consumes the pending arm if `generation` is the live one.
    pub fn take_if_current(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Delay {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Delays work until keystrokes pause. At most one invocation is pending.
#[derive(Debug)]
pub struct DebounceScheduler {
    quiet_period: Duration,
    timer: Delay,
}

impl DebounceScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            timer: Delay::new(),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Cancels whatever is pending and arms `fire` after the quiet period.
    pub fn schedule<F>(&mut self, fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.timer.arm(self.quiet_period, fire)
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    /// Whether a firing with this generation should still act.
    pub fn accept(&mut self, generation: u64) -> bool {
        self.timer.take_if_current(generation)
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }
}
