//! Alert channel coordination.
//!
//! Two independently-timed alert mechanisms share one physical buzzer:
//! the periodic simple beep and the sequenced pattern channel.  The
//! [`AlertController`] owns both, selects which are active per the current
//! [`AlertMode`], and arbitrates the tone output — a pattern utterance in
//! flight has exclusive ownership of the buzzer and suppresses the beep
//! for its duration.

pub mod beep;
pub mod pattern;

use serde::{Deserialize, Serialize};

use crate::config::SystemConfig;
use beep::BeepChannel;
use pattern::PatternSequencer;

/// Which alert channel(s) an ALERT_ON activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertMode {
    SimpleBeep,
    SequencedPattern,
    Both,
}

impl AlertMode {
    fn selects_beep(self) -> bool {
        matches!(self, Self::SimpleBeep | Self::Both)
    }

    fn selects_pattern(self) -> bool {
        matches!(self, Self::SequencedPattern | Self::Both)
    }
}

/// Owns the alert channels and the active [`AlertMode`].
pub struct AlertController {
    mode: AlertMode,
    /// An alert episode is in progress (between ALERT_ON and ALERT_OFF).
    /// While engaged, the selected channel(s) are kept active across mode
    /// switches — ALERTING must never go permanently silent.
    engaged: bool,
    beep: BeepChannel,
    voice: PatternSequencer,
}

impl AlertController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            mode: config.default_mode,
            engaged: false,
            beep: BeepChannel::new(config.beep_interval_ms, config.beep_freq_hz),
            voice: PatternSequencer::new(config.voice_interval_ms),
        }
    }

    /// Start an alert episode: activate the channel(s) selected by the
    /// current mode.  Each channel triggers immediately rather than waiting
    /// a full interval; channels that are already active are untouched.
    pub fn activate(&mut self) {
        self.engaged = true;
        self.sync_channels();
    }

    /// End the episode and deactivate both channels regardless of their
    /// bookkeeping state.  The caller silences the tone output
    /// unconditionally on top of this.
    pub fn deactivate(&mut self) {
        self.engaged = false;
        self.beep.deactivate();
        self.voice.deactivate();
    }

    /// Switch the selection.  Mutation only — the channels re-synchronize
    /// on the next tick while an episode is engaged: deselected channels
    /// stop at their next toggle boundary, newly selected ones start.
    /// Outside an episode nothing starts.
    pub fn set_mode(&mut self, mode: AlertMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> AlertMode {
        self.mode
    }

    /// Start any selected-but-idle channels.  Idempotent per channel.
    fn sync_channels(&mut self) {
        if self.mode.selects_beep() {
            self.beep.activate();
        }
        if self.mode.selects_pattern() {
            self.voice.activate();
        }
    }

    /// Advance both channels by one tick and return the tone that owns the
    /// buzzer right now, if any.
    pub fn tick(&mut self, delta_ms: u32) -> Option<u16> {
        if self.engaged {
            self.sync_channels();
        }

        let voice_out = self.voice.tick(delta_ms, self.mode.selects_pattern());
        let beep_out = self.beep.tick(delta_ms, self.mode.selects_beep());

        // Exclusive ownership: an utterance in flight silences the beep
        // toggle (including its gaps — the gap is part of the pattern).
        if self.voice.is_playing() {
            voice_out
        } else {
            beep_out
        }
    }

    pub fn any_active(&self) -> bool {
        self.beep.is_active() || self.voice.is_active()
    }

    pub fn beep_active(&self) -> bool {
        self.beep.is_active()
    }

    pub fn voice_active(&self) -> bool {
        self.voice.is_active()
    }

    /// Rotation index of the next utterance (test observability).
    pub fn voice_next_index(&self) -> usize {
        self.voice.next_index()
    }
}
