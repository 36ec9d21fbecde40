//! Command ingestion
//!
//! Parses a JSON payload of the form
//!
//! ```json
//! {"commands": [{"protocol": "kaku", "address": 100, "unit": 3, "value": 0, "repeat": 10}]}
//! ```
//!
//! and pushes one [`Command`] per complete entry onto the queue. Entries
//! missing `protocol`, `value`, `unit` or `address` are skipped without
//! failing the payload. `type` defaults to `"dimmer"` and `repeat` to 25.
//!
//! Numbers are read as `f64` and saturated into `i32`, so an out-of-range
//! or fractional number never rejects the batch. The address is saturated
//! the same way and reinterpreted as unsigned; the encoder keeps its low 26
//! bits.

use core::fmt;

use embassy_time::Duration;
use heapless::Vec;
use log::{debug, warn};
use serde::Deserialize;

use crate::command::{Command, DEFAULT_DEVICE_KIND, DEFAULT_REPETITIONS, truncated};
use crate::queue::CommandQueue;

/// Largest payload accepted from a client, in bytes
pub const MAX_PAYLOAD_SIZE: usize = 4096;

/// Bytes of the shortest complete entry,
/// `{"protocol":"kaku","address":0,"unit":0,"value":0},`
const MIN_ENTRY_SIZE: usize = 51;

/// Maximum number of entries in one payload, as many as fit in
/// [`MAX_PAYLOAD_SIZE`]
pub const MAX_PAYLOAD_COMMANDS: usize = MAX_PAYLOAD_SIZE / MIN_ENTRY_SIZE;

/// Payload rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestError {
    /// Not valid JSON, not an object, or too many entries
    Malformed,
    /// The `commands` array is absent
    MissingCommands,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Malformed => write!(f, "malformed payload"),
            IngestError::MissingCommands => write!(f, "tag \"commands\" not found"),
        }
    }
}

/// Detailed result of an ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    /// Entries in the `commands` array
    pub parsed: usize,
    /// Commands placed on the queue
    pub accepted: usize,
    /// Entries missing a required field
    pub skipped: usize,
    /// Commands dropped because the queue stayed full
    pub dropped: usize,
}

#[derive(Deserialize)]
struct Payload<'a> {
    #[serde(borrow)]
    commands: Option<Vec<Entry<'a>, MAX_PAYLOAD_COMMANDS>>,
}

#[derive(Deserialize)]
struct Entry<'a> {
    #[serde(borrow)]
    protocol: Option<&'a str>,
    #[serde(borrow, rename = "type")]
    device_kind: Option<&'a str>,
    value: Option<f64>,
    unit: Option<f64>,
    address: Option<f64>,
    repeat: Option<f64>,
}

/// Convert a JSON number to `i32`, saturating at the bounds and
/// truncating fractions. NaN becomes 0.
#[allow(clippy::cast_possible_truncation)]
fn saturate(number: f64) -> i32 {
    number as i32
}

impl Entry<'_> {
    #[allow(clippy::cast_sign_loss)]
    fn to_command(&self) -> Option<Command> {
        Some(Command {
            protocol: truncated(self.protocol?),
            device_kind: truncated(self.device_kind.unwrap_or(DEFAULT_DEVICE_KIND)),
            value: saturate(self.value?),
            unit: saturate(self.unit?),
            address: saturate(self.address?) as u32,
            repetitions: self
                .repeat
                .map_or(i32::from(DEFAULT_REPETITIONS), saturate),
        })
    }
}

/// Strip the NUL padding and whitespace raw socket clients leave behind
fn trim_payload(payload: &[u8]) -> &[u8] {
    let end = payload
        .iter()
        .rposition(|b| !matches!(b, 0 | b' ' | b'\t' | b'\r' | b'\n'))
        .map_or(0, |i| i + 1);
    &payload[..end]
}

fn parse(payload: &[u8]) -> Result<Vec<Entry<'_>, MAX_PAYLOAD_COMMANDS>, IngestError> {
    let (payload, _) = serde_json_core::from_slice::<Payload<'_>>(trim_payload(payload))
        .map_err(|e| {
            warn!("ingest: parse error: {:?}", e);
            IngestError::Malformed
        })?;

    payload.commands.ok_or_else(|| {
        warn!("ingest: tag \"commands\" not found");
        IngestError::MissingCommands
    })
}

/// Parse `payload` and enqueue its commands, returning a full report.
///
/// Each enqueue waits at most `timeout` for a free slot.
pub async fn ingest_with_report(
    payload: &[u8],
    queue: &CommandQueue,
    timeout: Duration,
) -> Result<IngestReport, IngestError> {
    let entries = parse(payload)?;
    let mut report = IngestReport {
        parsed: entries.len(),
        ..IngestReport::default()
    };

    for (index, entry) in entries.iter().enumerate() {
        let Some(command) = entry.to_command() else {
            debug!("ingest: entry {} incomplete, skipped", index);
            report.skipped += 1;
            continue;
        };

        match queue.enqueue(command, timeout).await {
            Ok(()) => report.accepted += 1,
            Err(e) => {
                warn!("ingest: entry {} dropped: {}", index, e);
                report.dropped += 1;
            }
        }
    }

    debug!(
        "ingest: parsed={} accepted={} skipped={} dropped={}",
        report.parsed, report.accepted, report.skipped, report.dropped
    );
    Ok(report)
}

/// Parse `payload` and enqueue its commands.
///
/// Returns the length of the `commands` array. Skipped and dropped entries
/// are included, so the count is not a delivery confirmation; use
/// [`ingest_with_report`] for the accepted count.
pub async fn ingest(
    payload: &[u8],
    queue: &CommandQueue,
    timeout: Duration,
) -> Result<usize, IngestError> {
    ingest_with_report(payload, queue, timeout)
        .await
        .map(|report| report.parsed)
}
