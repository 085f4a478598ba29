//! Upstream-link watchdog.
//!
//! Tracks the time since the last received byte and forces the safe
//! (ALERTING) state when the vision pipeline goes silent.  The question it
//! answers is "is the link alive", not "was the last command valid" — an
//! unrecognised byte still feeds it.
//!
//! ## Firing discipline
//!
//! A fire clears `last_signal_ms` to the unset sentinel, so one contiguous
//! silence period produces exactly one fire no matter how many ticks elapse
//! afterwards.  The next received byte re-arms it.

use log::warn;

pub struct LinkWatchdog {
    /// Timestamp of the last received byte; `None` = disarmed.
    last_signal_ms: Option<u64>,
    timeout_ms: u32,
}

impl LinkWatchdog {
    /// A fresh watchdog starts disarmed: it cannot fire before the first
    /// byte ever arrives, so a host that is slow to boot does not trip it.
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            last_signal_ms: None,
            timeout_ms,
        }
    }

    /// Record upstream activity.  Called for every received byte,
    /// recognised or not.
    pub fn on_signal(&mut self, now_ms: u64) {
        self.last_signal_ms = Some(now_ms);
    }

    /// Evaluate the deadline.  Returns `true` at most once per silence
    /// episode; firing disarms until the next `on_signal`.
    pub fn check(&mut self, now_ms: u64) -> bool {
        match self.last_signal_ms {
            Some(last) if now_ms.saturating_sub(last) > u64::from(self.timeout_ms) => {
                warn!(
                    "watchdog: no upstream signal for {} ms (limit {} ms)",
                    now_ms.saturating_sub(last),
                    self.timeout_ms
                );
                self.last_signal_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a signal has been seen and the deadline is being tracked.
    pub fn is_armed(&self) -> bool {
        self.last_signal_ms.is_some()
    }
}
