//! Shared mutable context threaded through every FSM handler.
//!
//! `ControlContext` is the single struct that state handlers read from and
//! write to: actuator command outputs, the alert controller, configuration,
//! and timing.  All mutation happens from the one control-loop execution
//! context, so no locking is ever needed.

use crate::alert::AlertController;
use crate::alert::pattern::{LIBRARY, Playback};
use crate::config::SystemConfig;
use crate::error::ActuatorError;
use crate::fsm::StateId;

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Commands that state handlers write to request actuator actions.
/// The service diffs these against the last applied set each tick, so
/// holding a value steady costs nothing at the pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommands {
    /// Desired motor duty (0 = coast, 1–255 = run).
    pub motor_duty: u8,
    /// Desired motor direction: `true` = forward.
    pub motor_forward: bool,
    /// Tone to sound on the buzzer; `None` = silent.
    pub tone_hz: Option<u16>,
    /// Status LED colour (R, G, B) — each 0–255.
    pub led_rgb: (u8, u8, u8),
}

impl Default for ActuatorCommands {
    fn default() -> Self {
        Self::all_off()
    }
}

impl ActuatorCommands {
    /// All actuators off — safe default.
    pub fn all_off() -> Self {
        Self {
            motor_duty: 0,
            motor_forward: true,
            tone_hz: None,
            led_rgb: (0, 0, 0),
        }
    }
}

// ── Status colours ────────────────────────────────────────────

pub const COLOUR_RUNNING: (u8, u8, u8) = (0, 255, 50); // Green
pub const COLOUR_ALERTING: (u8, u8, u8) = (255, 0, 0); // Red
pub const COLOUR_ALERTING_DIM: (u8, u8, u8) = (40, 0, 0); // Blink trough
pub const COLOUR_SELFTEST: (u8, u8, u8) = (128, 0, 255); // Purple

// ---------------------------------------------------------------------------
// Self-test bookkeeping
// ---------------------------------------------------------------------------

/// Progress through the bounded all-patterns demonstration.
pub struct SelfTestRun {
    pub pattern_idx: usize,
    pub playback: Playback,
}

impl SelfTestRun {
    pub fn start() -> Self {
        Self {
            pattern_idx: 0,
            playback: Playback::start(LIBRARY[0]),
        }
    }

    /// Move to the next utterance; `false` when the library is exhausted.
    pub fn advance(&mut self) -> bool {
        self.pattern_idx += 1;
        match LIBRARY.get(self.pattern_idx) {
            Some(u) => {
                self.playback = Playback::start(*u);
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ControlContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct ControlContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// Duration of one tick in milliseconds.
    pub tick_ms: u32,

    // -- Actuator outputs --
    /// Commands to be applied after the FSM tick.
    pub commands: ActuatorCommands,

    // -- Alert channels --
    pub alert: AlertController,

    // -- Motor speed (applied duty while RUNNING) --
    motor_speed: u8,

    // -- Self-test --
    /// In-flight self-test demonstration, when in the SelfTest state.
    pub selftest: Option<SelfTestRun>,
    /// State to resume once the self-test completes.
    pub test_resume: StateId,

    // -- Configuration --
    pub config: SystemConfig,
}

impl ControlContext {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            tick_ms: config.control_loop_interval_ms,
            commands: ActuatorCommands::all_off(),
            alert: AlertController::new(&config),
            motor_speed: config.motor_speed,
            selftest: None,
            test_resume: StateId::Running,
            config,
        }
    }

    /// The duty the motor runs at while in RUNNING.
    pub fn motor_speed(&self) -> u8 {
        self.motor_speed
    }

    /// Change the running speed.  Values outside 0–255 are rejected and the
    /// prior value is retained.  If the motor is currently commanded on, the
    /// new speed applies immediately; otherwise on the next activation.
    pub fn set_motor_speed(&mut self, value: u16) -> crate::error::Result<()> {
        let Ok(speed) = u8::try_from(value) else {
            log::warn!("motor: rejected speed {value}, keeping {}", self.motor_speed);
            return Err(ActuatorError::SpeedOutOfRange(value).into());
        };
        self.motor_speed = speed;
        if self.commands.motor_duty > 0 {
            self.commands.motor_duty = speed;
        }
        log::info!("motor: speed set to {speed}");
        Ok(())
    }
}
