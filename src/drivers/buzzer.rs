//! Passive piezo buzzer driver.
//!
//! The buzzer hangs off a dedicated LEDC timer whose frequency is retuned
//! per tone; 50% duty gives the loudest square wave.  One physical buzzer
//! serves both alert channels — arbitration happens upstream, this driver
//! just plays whatever tone it is told.

use crate::drivers::hw_init;

pub struct BuzzerDriver {
    /// Frequency currently sounding, if any.
    current: Option<u16>,
}

impl BuzzerDriver {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Sound `freq_hz`.  Re-requesting the active frequency is a no-op.
    pub fn tone(&mut self, freq_hz: u16) {
        if self.current == Some(freq_hz) {
            return;
        }
        hw_init::buzzer_tone(freq_hz);
        self.current = Some(freq_hz);
    }

    /// Stop sounding.  Idempotent.
    pub fn off(&mut self) {
        if self.current.is_none() {
            return;
        }
        hw_init::buzzer_off();
        self.current = None;
    }

    pub fn is_sounding(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_tone(&self) -> Option<u16> {
        self.current
    }
}

impl Default for BuzzerDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_then_off() {
        let mut b = BuzzerDriver::new();
        b.tone(2000);
        assert!(b.is_sounding());
        assert_eq!(b.current_tone(), Some(2000));
        b.off();
        assert!(!b.is_sounding());
    }

    #[test]
    fn off_when_silent_is_noop() {
        let mut b = BuzzerDriver::new();
        b.off();
        assert!(!b.is_sounding());
    }

    #[test]
    fn retune_changes_current() {
        let mut b = BuzzerDriver::new();
        b.tone(659);
        b.tone(880);
        assert_eq!(b.current_tone(), Some(880));
    }
}
