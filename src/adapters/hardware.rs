//! Hardware adapter — bridges real actuators to the domain port traits.
//!
//! Owns the motor, buzzer and LED drivers, exposing them through
//! [`ActuatorPort`].  This is the only module besides the serial adapter
//! that touches actual hardware.  On non-espidf targets, the underlying
//! drivers use cfg-gated simulation stubs.

use crate::app::ports::ActuatorPort;
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::motor::{Direction, MotorDriver};
use crate::drivers::status_led::StatusLed;

/// Concrete adapter that combines all actuators behind the port trait.
pub struct HardwareAdapter {
    motor: MotorDriver,
    buzzer: BuzzerDriver,
    led: StatusLed,
}

impl HardwareAdapter {
    pub fn new(motor: MotorDriver, buzzer: BuzzerDriver, led: StatusLed) -> Self {
        Self { motor, buzzer, led }
    }
}

impl ActuatorPort for HardwareAdapter {
    fn set_motor(&mut self, duty: u8, forward: bool) {
        let dir = if forward {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        self.motor.set(duty, dir);
    }

    fn stop_motor(&mut self) {
        self.motor.stop();
    }

    fn tone(&mut self, freq_hz: u16) {
        self.buzzer.tone(freq_hz);
    }

    fn silence(&mut self) {
        self.buzzer.off();
    }

    fn set_led(&mut self, r: u8, g: u8, b: u8) {
        self.led.set(r, g, b);
    }

    fn all_off(&mut self) {
        self.motor.stop();
        self.buzzer.off();
        self.led.off();
    }
}
