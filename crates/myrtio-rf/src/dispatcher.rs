//! Transmission loop
//!
//! The dispatcher is the only consumer of the [`CommandQueue`] and the only
//! user of the pulse transmitter. It owns the transmitter, which is what
//! keeps the peripheral exclusive; anything else that needs to transmit
//! must go through the queue or share the transmitter behind a mutex.

use core::fmt::Debug;

use embassy_time::Duration;
use log::{debug, info, warn};

use crate::command::Command;
use crate::kaku::{Waveform, encode_frame};
use crate::queue::CommandQueue;

/// Pulse generation peripheral
///
/// Per repetition the dispatcher calls [`submit`](Self::submit) and then
/// [`wait_for_completion`](Self::wait_for_completion) before starting the
/// next one. No timeout is applied to the wait: a transmitter that never
/// completes blocks the dispatcher.
#[allow(async_fn_in_trait)]
pub trait PulseTransmitter {
    type Error: Debug;

    /// Hand a waveform to the peripheral
    fn submit(&mut self, waveform: &Waveform) -> Result<(), Self::Error>;

    /// Wait until the submitted waveform has been emitted
    async fn wait_for_completion(&mut self) -> Result<(), Self::Error>;
}

/// Result of handling one queue slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The dequeue timed out
    Idle,
    /// The command names an unsupported protocol and was dropped
    Discarded,
    /// Every repetition was emitted
    Transmitted { repetitions: u8 },
    /// The transmitter failed; remaining repetitions were skipped
    Aborted { completed: u8 },
}

/// Consumer side of the command pipeline
pub struct Dispatcher<'a, T: PulseTransmitter> {
    queue: &'a CommandQueue,
    transmitter: T,
    idle_timeout: Duration,
}

impl<'a, T: PulseTransmitter> Dispatcher<'a, T> {
    /// Create a dispatcher
    ///
    /// # Arguments
    /// * `queue` - Queue to consume
    /// * `transmitter` - Peripheral used for every burst
    /// * `idle_timeout` - Longest single wait for a command
    pub fn new(queue: &'a CommandQueue, transmitter: T, idle_timeout: Duration) -> Self {
        Self {
            queue,
            transmitter,
            idle_timeout,
        }
    }

    /// Borrow the transmitter
    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }

    /// Release the transmitter
    pub fn into_transmitter(self) -> T {
        self.transmitter
    }

    /// Consume commands forever
    pub async fn run(&mut self) -> ! {
        info!("dispatcher: started");
        loop {
            if self.poll_once().await == DispatchOutcome::Idle {
                debug!("dispatcher: idle");
            }
        }
    }

    /// Wait for one command and dispatch it
    pub async fn poll_once(&mut self) -> DispatchOutcome {
        match self.queue.dequeue(self.idle_timeout).await {
            Some(command) => self.dispatch(&command).await,
            None => DispatchOutcome::Idle,
        }
    }

    /// Encode and transmit a single command
    pub async fn dispatch(&mut self, command: &Command) -> DispatchOutcome {
        if !command.is_kaku() {
            debug!(
                "dispatcher: discarding command with protocol {:?}",
                command.protocol.as_str()
            );
            return DispatchOutcome::Discarded;
        }

        let frame = command.frame();
        let repetitions = command.repetitions();
        debug!(
            "dispatcher: address={} unit={} value={} x{}",
            frame.address, frame.unit, frame.value, repetitions
        );

        // The waveform lives exactly as long as the burst
        let waveform = encode_frame(&frame);
        self.transmit_burst(&waveform, repetitions).await
    }

    async fn transmit_burst(&mut self, waveform: &Waveform, repetitions: u8) -> DispatchOutcome {
        for completed in 0..repetitions {
            if let Err(e) = self.emit(waveform).await {
                warn!(
                    "dispatcher: transmitter error after {}/{} repetitions: {:?}",
                    completed, repetitions, e
                );
                return DispatchOutcome::Aborted { completed };
            }
        }
        DispatchOutcome::Transmitted { repetitions }
    }

    async fn emit(&mut self, waveform: &Waveform) -> Result<(), T::Error> {
        self.transmitter.submit(waveform)?;
        self.transmitter.wait_for_completion().await
    }
}
