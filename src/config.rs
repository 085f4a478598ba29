//! System configuration parameters
//!
//! All tunable parameters for the WakeMate alert unit.  The values are
//! compiled-in defaults; changing them requires a rebuild and redeploy
//! (there is deliberately no runtime provisioning path on this board).

use serde::{Deserialize, Serialize};

use crate::alert::AlertMode;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Motor ---
    /// Drive motor PWM duty while running (0-255)
    pub motor_speed: u8,

    // --- Alert channels ---
    /// Alert mode selected at power-on
    pub default_mode: AlertMode,
    /// Simple-beep square-wave half period (milliseconds)
    pub beep_interval_ms: u32,
    /// Interval between utterance re-triggers while alerting (milliseconds)
    pub voice_interval_ms: u32,
    /// Simple-beep tone frequency (Hz)
    pub beep_freq_hz: u16,

    // --- Link watchdog ---
    /// Silence bound before the watchdog forces ALERTING (milliseconds)
    pub watchdog_timeout_ms: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Motor
            motor_speed: 200,

            // Alert channels
            default_mode: AlertMode::Both,
            beep_interval_ms: 500,
            voice_interval_ms: 3000, // matches the host pipeline's 3 s alert cadence
            beep_freq_hz: 2000,

            // Link watchdog
            watchdog_timeout_ms: 4000,

            // Timing
            control_loop_interval_ms: 50, // 20 Hz
        }
    }
}
