//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  The stream is advisory —
//! no collaborator parses it, it exists for humans watching the serial log
//! and for test assertions.

use crate::alert::AlertMode;
use crate::command::Command;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A command byte was received and decoded (including `Unknown`).
    CommandReceived(Command),

    /// The active alert mode changed.
    ModeChanged(AlertMode),

    /// The upstream link went silent past the configured bound.
    WatchdogTimeout,
}
