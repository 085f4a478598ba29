//! GPIO / peripheral pin assignments for the WakeMate actuator board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Drive motor (DRV8871 H-bridge)
// ---------------------------------------------------------------------------

/// LEDC PWM output for motor speed control (EN input of the H-bridge).
pub const MOTOR_PWM_GPIO: i32 = 1;
/// Digital output: H-bridge IN1.
pub const MOTOR_IN1_GPIO: i32 = 2;
/// Digital output: H-bridge IN2.  IN1 high / IN2 low = forward,
/// inverted = reverse, both low = coast.
pub const MOTOR_IN2_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Piezo buzzer (passive — driven by an LEDC tone channel)
// ---------------------------------------------------------------------------

/// LEDC output generating the tone square wave.
pub const BUZZER_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Status LED (discrete RGB, common cathode)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// UART link to the vision pipeline host
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;

/// UART peripheral number carrying the command stream.
pub const UART_PORT: i32 = 1;
/// Link baud rate — must match the vision pipeline's serial settings.
pub const UART_BAUD: u32 = 115_200;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the drive motor (25 kHz — inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;
/// LEDC frequency for the RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
/// Initial LEDC frequency for the buzzer channel; retuned per tone.
pub const BUZZER_BASE_FREQ_HZ: u32 = 1_000;
