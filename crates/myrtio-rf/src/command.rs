use heapless::String;

use crate::kaku::KakuFrame;

/// Maximum length of the protocol and device kind strings
pub const COMMAND_STRING_SIZE: usize = 16;

/// The only protocol the dispatcher transmits
pub const KAKU_PROTOCOL: &str = "kaku";

/// Device kind used when the submitter does not name one
pub const DEFAULT_DEVICE_KIND: &str = "dimmer";

/// Repetitions used when none (or a value below 1) is requested
pub const DEFAULT_REPETITIONS: u8 = 25;

/// Upper bound of repetitions per command
pub const MAX_REPETITIONS: u8 = 100;

/// Short protocol / device kind string
pub type CommandString = String<COMMAND_STRING_SIZE>;

/// Reduce a unit or dim value into 0-15.
///
/// Euclidean modulo, so negative input also lands in range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn reduce_nibble(value: i32) -> u8 {
    value.rem_euclid(16) as u8
}

/// Clamp a requested repetition count into 1-100.
///
/// Anything below 1 falls back to [`DEFAULT_REPETITIONS`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_lossless)]
pub const fn clamp_repetitions(requested: i32) -> u8 {
    if requested < 1 {
        DEFAULT_REPETITIONS
    } else if requested > MAX_REPETITIONS as i32 {
        MAX_REPETITIONS
    } else {
        requested as u8
    }
}

/// Copy `src` into a bounded string, cutting it at a char boundary
pub(crate) fn truncated(src: &str) -> CommandString {
    let mut out = CommandString::new();
    for ch in src.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// A single RF command as submitted by a client
///
/// Fields hold the submitted values as-is; range reduction happens when
/// the command is turned into a frame.
///
/// `value` selects the frame type. 0 sends a plain frame whose on/off bit
/// is always "off"; 1-15 sends a dim frame at that level. There is no way
/// to send a plain "on", so non-dimming receivers can only be switched off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Wire protocol, only `"kaku"` is transmitted
    pub protocol: CommandString,
    /// Receiver kind, informational only
    pub device_kind: CommandString,
    /// Receiver address
    pub address: u32,
    /// Unit within the address
    pub unit: i32,
    /// 0 for a plain "off" frame, 1-15 for a dim level
    pub value: i32,
    /// Requested number of transmissions
    pub repetitions: i32,
}

impl Command {
    /// Create a KAKU command with default device kind and repetitions
    pub fn kaku(address: u32, unit: i32, value: i32) -> Self {
        Self::new(KAKU_PROTOCOL, address, unit, value)
    }

    /// Create a command for an arbitrary protocol
    pub fn new(protocol: &str, address: u32, unit: i32, value: i32) -> Self {
        Self {
            protocol: truncated(protocol),
            device_kind: truncated(DEFAULT_DEVICE_KIND),
            address,
            unit,
            value,
            repetitions: i32::from(DEFAULT_REPETITIONS),
        }
    }

    /// Set the requested repetitions
    #[must_use]
    pub fn with_repetitions(mut self, repetitions: i32) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Set the device kind
    #[must_use]
    pub fn with_device_kind(mut self, device_kind: &str) -> Self {
        self.device_kind = truncated(device_kind);
        self
    }

    /// Whether the dispatcher should transmit this command
    pub fn is_kaku(&self) -> bool {
        self.protocol.as_str() == KAKU_PROTOCOL
    }

    /// Unit reduced into 0-15
    pub fn unit(&self) -> u8 {
        reduce_nibble(self.unit)
    }

    /// Value reduced into 0-15
    pub fn value(&self) -> u8 {
        reduce_nibble(self.value)
    }

    /// Repetitions clamped into 1-100
    pub fn repetitions(&self) -> u8 {
        clamp_repetitions(self.repetitions)
    }

    /// Frame parameters for the encoder
    pub fn frame(&self) -> KakuFrame {
        KakuFrame::new(self.address, self.unit(), self.value())
    }
}
