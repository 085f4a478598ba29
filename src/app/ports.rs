//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (serial link, actuators, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly and the whole
//! control loop runs unmodified against mocks on the host.

// ───────────────────────────────────────────────────────────────
// Command port (driven adapter: transport → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain drains pending command bytes through this.
///
/// In-order, at-most-one-byte-per-command delivery is assumed; framing and
/// baud belong to the adapter.
pub trait CommandPort {
    /// Pop the next buffered byte, or `None` when the buffer is drained.
    fn poll_byte(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
///
/// The service only calls these on output *changes*, so implementations may
/// treat every call as a real pin write without further dedup.
pub trait ActuatorPort {
    /// Run the motor at `duty` (1–255) in the given direction.
    fn set_motor(&mut self, duty: u8, forward: bool);

    /// Stop the motor (duty zero, both direction lines low — coast).
    fn stop_motor(&mut self);

    /// Sound the buzzer at `freq_hz`.
    fn tone(&mut self, freq_hz: u16);

    /// Silence the buzzer.
    fn silence(&mut self);

    /// Set the RGB status LED colour.
    fn set_led(&mut self, r: u8, g: u8, b: u8);

    /// Kill all actuators (motor, buzzer, LED) — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, a future
/// telemetry channel, a test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
