//! Wire command decoding.
//!
//! The vision pipeline host sends single ASCII characters, one command per
//! byte, with no framing.  Decoding is a fixed table; anything outside it
//! is [`Command::Unknown`] — logged upstream, never a state change.
//!
//! | char | meaning                                   |
//! |------|-------------------------------------------|
//! | `0`  | alert condition asserted (eyes closed)    |
//! | `1`  | alert condition cleared (eyes open)       |
//! | `b`  | select SimpleBeep mode                    |
//! | `v`  | select SequencedPattern mode              |
//! | `a`  | select Both mode                          |
//! | `t`  | run the bounded pattern self-test         |

use crate::alert::AlertMode;

/// A decoded command.  Produced fresh per received byte, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The upstream asserted the alert condition.
    AlertOn,
    /// The upstream cleared the alert condition.
    AlertOff,
    /// Switch the active alert mode.
    SetMode(AlertMode),
    /// Play every library utterance once, then resume.
    SelfTest,
    /// Unrecognised byte — reported, no state change.
    Unknown(u8),
}

impl Command {
    /// Decode one received byte.
    pub fn decode(byte: u8) -> Self {
        match byte {
            b'0' => Self::AlertOn,
            b'1' => Self::AlertOff,
            b'b' => Self::SetMode(AlertMode::SimpleBeep),
            b'v' => Self::SetMode(AlertMode::SequencedPattern),
            b'a' => Self::SetMode(AlertMode::Both),
            b't' => Self::SelfTest,
            other => Self::Unknown(other),
        }
    }
}
