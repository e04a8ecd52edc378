//! Re-entrancy guard for asynchronous history extension.

use std::time::{Duration, Instant};

/// History extension is the one genuinely asynchronous external operation:
/// at most one request may be in flight, and a fresh trigger during the
/// in-flight window or the post-completion cooldown is a no-op rather than
/// a duplicate request.
#[derive(Debug)]
pub struct HistoryGuard {
    in_flight: bool,
    cooldown: Duration,
    ready_at: Option<Instant>,
}

impl HistoryGuard {
    pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

    pub fn new(cooldown: Duration) -> Self {
        Self {
            in_flight: false,
            cooldown,
            ready_at: None,
        }
    }

    /// Try to start a request. `false` means one is already pending or the
    /// cooldown has not elapsed.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        if let Some(ready_at) = self.ready_at {
            if Instant::now() < ready_at {
                return false;
            }
        }
        self.in_flight = true;
        true
    }

    /// Mark the pending request finished (applied or aborted) and start the
    /// cooldown window.
    pub fn finish(&mut self) {
        self.in_flight = false;
        self.ready_at = Some(Instant::now() + self.cooldown);
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

impl Default for HistoryGuard {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COOLDOWN)
    }
}
