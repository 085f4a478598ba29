//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.

use std::collections::VecDeque;

use wakemate::app::events::AppEvent;
use wakemate::app::ports::{ActuatorPort, CommandPort, EventSink};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuatorCall {
    SetMotor { duty: u8, forward: bool },
    StopMotor,
    Tone { freq_hz: u16 },
    Silence,
    SetLed { r: u8, g: u8, b: u8 },
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    /// Whether the most recent motor-affecting call left the motor running.
    pub fn motor_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetMotor { duty, .. } => Some(*duty > 0),
                ActuatorCall::StopMotor | ActuatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// The tone currently sounding per the most recent buzzer call.
    pub fn current_tone(&self) -> Option<u16> {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Tone { freq_hz } => Some(Some(*freq_hz)),
                ActuatorCall::Silence | ActuatorCall::AllOff => Some(None),
                _ => None,
            })
            .unwrap_or(None)
    }

    pub fn stop_motor_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::StopMotor))
            .count()
    }

    pub fn set_motor_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::SetMotor { .. }))
            .count()
    }

    pub fn tone_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Tone { .. }))
            .count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_motor(&mut self, duty: u8, forward: bool) {
        self.calls.push(ActuatorCall::SetMotor { duty, forward });
    }

    fn stop_motor(&mut self) {
        self.calls.push(ActuatorCall::StopMotor);
    }

    fn tone(&mut self, freq_hz: u16) {
        self.calls.push(ActuatorCall::Tone { freq_hz });
    }

    fn silence(&mut self) {
        self.calls.push(ActuatorCall::Silence);
    }

    fn set_led(&mut self, r: u8, g: u8, b: u8) {
        self.calls.push(ActuatorCall::SetLed { r, g, b });
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── ScriptedLink ─────────────────────────────────────────────

/// Command port fed by the test instead of a UART.
pub struct ScriptedLink {
    queue: VecDeque<u8>,
}

#[allow(dead_code)]
impl ScriptedLink {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, byte: u8) {
        self.queue.push_back(byte);
    }

    pub fn push_all(&mut self, bytes: &[u8]) {
        self.queue.extend(bytes);
    }
}

impl Default for ScriptedLink {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandPort for ScriptedLink {
    fn poll_byte(&mut self) -> Option<u8> {
        self.queue.pop_front()
    }
}

// ── LogSink ──────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<String>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.events.iter().filter(|e| e.contains(needle)).count()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}
