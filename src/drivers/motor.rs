//! Drive motor driver (DRV8871 H-bridge).
//!
//! Variable-speed forward/reverse control via LEDC PWM (ch0) and two
//! digital direction lines (IN1/IN2).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM and GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Running { duty: u8, dir: Direction },
}

pub struct MotorDriver {
    state: MotorState,
}

impl MotorDriver {
    pub fn new() -> Self {
        Self {
            state: MotorState::Stopped,
        }
    }

    /// Run at `duty` (1–255) in the given direction.  A duty of zero stops.
    /// Repeating the current setting is a no-op at the pin level.
    pub fn set(&mut self, duty: u8, direction: Direction) {
        if duty == 0 {
            self.stop();
            return;
        }
        let next = MotorState::Running {
            duty,
            dir: direction,
        };
        if self.state == next {
            return;
        }

        self.set_direction_hw(direction);
        hw_init::ledc_set(hw_init::LEDC_CH_MOTOR, duty);
        self.state = next;
    }

    /// Stop the motor: duty zero, both H-bridge inputs low (coast).
    /// Idempotent.
    pub fn stop(&mut self) {
        if self.state == MotorState::Stopped {
            return;
        }
        hw_init::ledc_set(hw_init::LEDC_CH_MOTOR, 0);
        hw_init::gpio_write(pins::MOTOR_IN1_GPIO, false);
        hw_init::gpio_write(pins::MOTOR_IN2_GPIO, false);
        self.state = MotorState::Stopped;
    }

    /// Flip direction, keeping the current duty.  No-op while stopped.
    pub fn reverse(&mut self) {
        if let MotorState::Running { duty, dir } = self.state {
            let flipped = match dir {
                Direction::Forward => Direction::Reverse,
                Direction::Reverse => Direction::Forward,
            };
            self.set(duty, flipped);
        }
    }

    fn set_direction_hw(&self, dir: Direction) {
        let forward = matches!(dir, Direction::Forward);
        hw_init::gpio_write(pins::MOTOR_IN1_GPIO, forward);
        hw_init::gpio_write(pins::MOTOR_IN2_GPIO, !forward);
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }

    pub fn current_duty(&self) -> u8 {
        match self.state {
            MotorState::Stopped => 0,
            MotorState::Running { duty, .. } => duty,
        }
    }
}

impl Default for MotorDriver {
    fn default() -> Self {
        Self::new()
    }
}
