//! Utterance library and non-blocking pattern playback.
//!
//! Each utterance is a fixed sequence of (tone, duration, gap) steps.
//! Playback is a small step machine advanced once per tick rather than a
//! blocking tone+delay loop, so an incoming stop command takes effect on
//! the very next tick while the audible cadence stays the same.

// ---------------------------------------------------------------------------
// Library data
// ---------------------------------------------------------------------------

/// One tone step: play `freq_hz` for `tone_ms`, then stay silent `gap_ms`.
#[derive(Debug, Clone, Copy)]
pub struct ToneStep {
    pub freq_hz: u16,
    pub tone_ms: u32,
    pub gap_ms: u32,
}

const fn step(freq_hz: u16, tone_ms: u32, gap_ms: u32) -> ToneStep {
    ToneStep {
        freq_hz,
        tone_ms,
        gap_ms,
    }
}

/// A labelled wake-up utterance.
#[derive(Debug, Clone, Copy)]
pub struct Utterance {
    pub name: &'static str,
    pub steps: &'static [ToneStep],
}

/// Three rising notes — "hey, wake up".
pub const HEY_WAKE_UP: Utterance = Utterance {
    name: "hey-wake-up",
    steps: &[step(659, 180, 60), step(784, 180, 60), step(988, 320, 0)],
};

/// Two short calls and a held high note — "stay alert".
pub const STAY_ALERT: Utterance = Utterance {
    name: "stay-alert",
    steps: &[step(880, 150, 80), step(880, 150, 200), step(1175, 250, 0)],
};

/// Low-high-low hail — "driver!".
pub const DRIVER: Utterance = Utterance {
    name: "driver",
    steps: &[step(523, 220, 90), step(1047, 220, 90), step(523, 220, 0)],
};

/// Monotonically rising frequency sweep — "open your eyes".
pub const OPEN_EYES: Utterance = Utterance {
    name: "open-eyes",
    steps: &[
        step(400, 90, 30),
        step(600, 90, 30),
        step(800, 90, 30),
        step(1000, 90, 30),
        step(1200, 150, 0),
    ],
};

/// Fast two-tone alternation — urgent alert.
pub const URGENT_ALERT: Utterance = Utterance {
    name: "urgent-alert",
    steps: &[
        step(2093, 70, 30),
        step(1568, 70, 30),
        step(2093, 70, 30),
        step(1568, 70, 30),
        step(2093, 120, 0),
    ],
};

/// The round-robin alert library, in rotation order.
pub const LIBRARY: &[Utterance] = &[HEY_WAKE_UP, STAY_ALERT, DRIVER, OPEN_EYES, URGENT_ALERT];

/// Short ascending chime played once at power-on.  Not part of the alert
/// rotation and never re-triggered.
pub const SYSTEM_READY: Utterance = Utterance {
    name: "system-ready",
    steps: &[step(523, 120, 40), step(659, 120, 40), step(784, 200, 0)],
};

// ---------------------------------------------------------------------------
// Playback step machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepPhase {
    Tone,
    Gap,
}

/// In-flight playback of one utterance, advanced by elapsed milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Playback {
    utterance: Utterance,
    step: usize,
    phase: StepPhase,
    remaining_ms: u32,
    done: bool,
}

impl Playback {
    pub fn start(utterance: Utterance) -> Self {
        // An empty utterance would be a library authoring bug; treat it as
        // already finished rather than indexing past the end.
        match utterance.steps.first() {
            Some(first) => Self {
                utterance,
                step: 0,
                phase: StepPhase::Tone,
                remaining_ms: first.tone_ms,
                done: false,
            },
            None => Self {
                utterance,
                step: 0,
                phase: StepPhase::Gap,
                remaining_ms: 0,
                done: true,
            },
        }
    }

    /// Advance by `delta_ms`.  Carries leftover time across phase and step
    /// boundaries so coarse ticks do not stretch the pattern.
    pub fn tick(&mut self, delta_ms: u32) {
        let mut left = delta_ms;
        while !self.done && left >= self.remaining_ms {
            left -= self.remaining_ms;
            self.advance_phase();
        }
        if !self.done {
            self.remaining_ms -= left;
        }
    }

    /// The tone that should be sounding right now; `None` during gaps and
    /// once the utterance has finished (the explicit trailing tone-off).
    pub fn output(&self) -> Option<u16> {
        if self.done || self.phase == StepPhase::Gap {
            None
        } else {
            Some(self.utterance.steps[self.step].freq_hz)
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn utterance_name(&self) -> &'static str {
        self.utterance.name
    }

    fn advance_phase(&mut self) {
        match self.phase {
            StepPhase::Tone => {
                self.phase = StepPhase::Gap;
                self.remaining_ms = self.utterance.steps[self.step].gap_ms;
            }
            StepPhase::Gap => {
                self.step += 1;
                match self.utterance.steps.get(self.step) {
                    Some(next) => {
                        self.phase = StepPhase::Tone;
                        self.remaining_ms = next.tone_ms;
                    }
                    None => {
                        self.done = true;
                        self.remaining_ms = 0;
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

use log::info;

/// Round-robins through [`LIBRARY`] while the pattern channel is active.
///
/// `trigger` fires once on activation and thereafter whenever
/// `interval_ms` elapses with no playback in flight.  The rotation index
/// survives deactivation, so consecutive alert episodes keep cycling
/// through fresh utterances.
pub struct PatternSequencer {
    active: bool,
    next_index: usize,
    since_trigger_ms: u32,
    interval_ms: u32,
    playback: Option<Playback>,
}

impl PatternSequencer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            active: false,
            next_index: 0,
            since_trigger_ms: 0,
            interval_ms,
            playback: None,
        }
    }

    /// Activate the channel and trigger the first utterance immediately.
    /// No-op when already active.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.trigger();
    }

    /// Deactivate and abandon any in-flight playback.  The caller is
    /// responsible for silencing the tone output unconditionally.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.playback = None;
        self.since_trigger_ms = 0;
    }

    /// Play the utterance at the rotation index and advance the index.
    pub fn trigger(&mut self) {
        let utterance = LIBRARY[self.next_index];
        info!("pattern: playing '{}'", utterance.name);
        self.playback = Some(Playback::start(utterance));
        self.next_index = (self.next_index + 1) % LIBRARY.len();
        self.since_trigger_ms = 0;
    }

    /// Advance timers and return the tone to sound, if any.
    ///
    /// `retrigger` gates the interval-based re-trigger; an in-flight
    /// playback always runs to its own end regardless.
    pub fn tick(&mut self, delta_ms: u32, retrigger: bool) -> Option<u16> {
        if !self.active {
            return None;
        }

        self.since_trigger_ms = self.since_trigger_ms.saturating_add(delta_ms);

        if let Some(pb) = &mut self.playback {
            pb.tick(delta_ms);
            if pb.is_done() {
                self.playback = None;
                return None;
            }
            return pb.output();
        }

        if retrigger && self.since_trigger_ms >= self.interval_ms {
            self.trigger();
            return self.playback.as_ref().and_then(Playback::output);
        }

        None
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// An utterance is currently sounding (it owns the tone output).
    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    /// Rotation index of the next utterance to play.
    pub fn next_index(&self) -> usize {
        self.next_index
    }
}
