//! Bounded command queue
//!
//! Decouples command intake (network side) from transmission (RMT side).
//! Both ends wait for at most a caller-supplied timeout, so neither side
//! can be blocked forever by the other.

use core::fmt;

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};

use crate::command::Command;

/// Pending commands the queue can hold
pub const COMMAND_QUEUE_SIZE: usize = 10;

/// Enqueue failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// No slot freed up before the timeout; the command was dropped
    Full,
}

impl fmt::Display for EnqueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnqueueError::Full => write!(f, "command queue full"),
        }
    }
}

/// FIFO of commands waiting for transmission
///
/// Create it once and share it by reference between the intake and the
/// dispatcher.
pub struct CommandQueue {
    channel: Channel<CriticalSectionRawMutex, Command, COMMAND_QUEUE_SIZE>,
}

impl CommandQueue {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Append a command, waiting up to `timeout` for a free slot.
    ///
    /// On timeout the command is dropped and [`EnqueueError::Full`] is
    /// returned.
    pub async fn enqueue(&self, command: Command, timeout: Duration) -> Result<(), EnqueueError> {
        match select(self.channel.send(command), Timer::after(timeout)).await {
            Either::First(()) => Ok(()),
            Either::Second(()) => Err(EnqueueError::Full),
        }
    }

    /// Append a command without waiting
    pub fn try_enqueue(&self, command: Command) -> Result<(), EnqueueError> {
        self.channel
            .try_send(command)
            .map_err(|_| EnqueueError::Full)
    }

    /// Take the oldest command, waiting up to `timeout` for one to arrive
    pub async fn dequeue(&self, timeout: Duration) -> Option<Command> {
        match select(self.channel.receive(), Timer::after(timeout)).await {
            Either::First(command) => Some(command),
            Either::Second(()) => None,
        }
    }

    /// Take the oldest command if one is pending
    pub fn try_dequeue(&self) -> Option<Command> {
        self.channel.try_receive().ok()
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Whether no command is pending
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Whether the next enqueue would have to wait
    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
