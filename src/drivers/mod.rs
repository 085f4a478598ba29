//! Hardware drivers.
//!
//! Every driver here is dual-target: on ESP-IDF it drives real peripherals
//! through the raw-sys helpers in [`hw_init`]; on the host it tracks state
//! in-memory so the whole control stack is testable off-device.

pub mod buzzer;
pub mod hw_init;
pub mod motor;
pub mod status_led;
