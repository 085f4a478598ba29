//! Simple periodic beep channel.
//!
//! Square-wave approximation of a beep: the buzzer is driven on for one
//! interval, off for the next, for as long as the channel is active.

pub struct BeepChannel {
    active: bool,
    /// `true` = tone phase, `false` = silent phase.
    phase: bool,
    elapsed_ms: u32,
    interval_ms: u32,
    freq_hz: u16,
}

impl BeepChannel {
    pub fn new(interval_ms: u32, freq_hz: u16) -> Self {
        Self {
            active: false,
            phase: false,
            elapsed_ms: 0,
            interval_ms,
            freq_hz,
        }
    }

    /// Activate the channel; the first tone phase starts immediately.
    /// No-op when already active.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.phase = true;
        self.elapsed_ms = 0;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.phase = false;
        self.elapsed_ms = 0;
    }

    /// Advance the oscillation and return the tone to sound, if any.
    ///
    /// `enabled` gates the phase flip: when the current mode no longer
    /// selects this channel, the channel shuts itself off at the next
    /// toggle boundary instead of mid-phase.
    pub fn tick(&mut self, delta_ms: u32, enabled: bool) -> Option<u16> {
        if !self.active {
            return None;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            if enabled {
                self.phase = !self.phase;
            } else {
                self.deactivate();
                return None;
            }
        }

        self.phase.then_some(self.freq_hz)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
