//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The vision-pipeline operator watches this stream to confirm the
//! actuator saw each command.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::command::Command;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={state:?}");
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {from:?} -> {to:?}");
            }
            AppEvent::CommandReceived(cmd) => match cmd {
                Command::Unknown(b) => warn!("CMD   | unknown byte 0x{b:02X}"),
                other => info!("CMD   | {other:?}"),
            },
            AppEvent::ModeChanged(mode) => {
                info!("MODE  | {mode:?}");
            }
            AppEvent::WatchdogTimeout => {
                warn!("WDOG  | link silent past timeout, forcing alert");
            }
        }
    }
}
