#![no_std]

//! RF command dispatch for 433 MHz remote-controlled receivers
//!
//! Architecture layers:
//! - `timing` - Pulse timing table, quantized to RMT ticks
//! - `kaku` - KlikAanKlikUit frame encoder ([`Waveform`] builder)
//! - `command` - [`Command`] value object and its clamping rules
//! - `queue` - Bounded [`CommandQueue`] between intake and transmission
//! - `ingest` - JSON payload parsing into queued commands
//! - `dispatcher` - Transmission loop driving a [`PulseTransmitter`]
//! - `response` - Textual reply written back to the submitter
//!
//! Everything here is hardware-agnostic. The firmware crate provides the
//! RMT transmitter and the network listener.

pub mod command;
pub mod dispatcher;
pub mod ingest;
pub mod kaku;
pub mod queue;
pub mod response;
pub mod timing;

pub use command::{Command, DEFAULT_REPETITIONS, MAX_REPETITIONS, clamp_repetitions, reduce_nibble};
pub use dispatcher::{DispatchOutcome, Dispatcher, PulseTransmitter};
pub use ingest::{
    IngestError, IngestReport, MAX_PAYLOAD_COMMANDS, MAX_PAYLOAD_SIZE, ingest, ingest_with_report,
};
pub use kaku::{KakuFrame, Waveform, encode, encode_frame, pack_state_word};
pub use queue::{COMMAND_QUEUE_SIZE, CommandQueue, EnqueueError};
pub use response::write_response;
pub use timing::PulseSymbol;
