//! Serial command adapter.
//!
//! Implements [`CommandPort`] over the command UART.  Each control-loop
//! iteration drains the hardware FIFO into a small local buffer; the
//! service then pops bytes one at a time.  Commands are single bytes,
//! so there is no framing to do here.

use heapless::Deque;
use log::warn;

use crate::app::ports::CommandPort;
use crate::drivers::hw_init;

/// Pending bytes kept between `poll_byte` calls.  Far larger than any
/// realistic command burst within one 50 ms tick.
const QUEUE_DEPTH: usize = 64;

pub struct SerialCommandAdapter {
    queue: Deque<u8, QUEUE_DEPTH>,
}

impl SerialCommandAdapter {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    /// Drain the UART FIFO into the local queue.  Call once per tick,
    /// before the service polls.
    pub fn pump(&mut self) {
        let mut buf = [0u8; QUEUE_DEPTH];
        let n = hw_init::uart_read(&mut buf);
        for &byte in &buf[..n] {
            self.enqueue(byte);
        }
    }

    /// Queue one received byte.  Everything is forwarded, even line-ending
    /// padding from ad-hoc terminals: any byte proves the link is alive,
    /// and classification is the dispatcher's job, not the transport's.
    fn enqueue(&mut self, byte: u8) {
        if self.queue.push_back(byte).is_err() {
            warn!("serial: command queue full, dropping 0x{byte:02X}");
        }
    }
}

impl Default for SerialCommandAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandPort for SerialCommandAdapter {
    fn poll_byte(&mut self) -> Option<u8> {
        self.queue.pop_front()
    }
}
