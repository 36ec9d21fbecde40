//! Integration tests for the transmission loop.

use embassy_futures::block_on;
use embassy_time::Duration;
use myrtio_rf::{Command, CommandQueue, DispatchOutcome, Dispatcher, PulseTransmitter, Waveform, encode};

const IDLE_TIMEOUT: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Submit(usize),
    Wait,
}

#[derive(Debug, PartialEq, Eq)]
struct TransmitterFault;

/// Transmitter that records every call
#[derive(Default)]
struct RecordingTransmitter {
    events: Vec<Event>,
    waveforms: Vec<Waveform>,
    completed: usize,
    fail_after: Option<usize>,
}

impl RecordingTransmitter {
    fn failing_after(completed: usize) -> Self {
        Self {
            fail_after: Some(completed),
            ..Self::default()
        }
    }

    fn submits(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Submit(_)))
            .count()
    }

    fn waits(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Wait).count()
    }
}

impl PulseTransmitter for RecordingTransmitter {
    type Error = TransmitterFault;

    fn submit(&mut self, waveform: &Waveform) -> Result<(), TransmitterFault> {
        if self.fail_after == Some(self.completed) {
            self.fail_after = None;
            return Err(TransmitterFault);
        }
        self.events.push(Event::Submit(waveform.len()));
        self.waveforms.push(waveform.clone());
        Ok(())
    }

    async fn wait_for_completion(&mut self) -> Result<(), TransmitterFault> {
        self.events.push(Event::Wait);
        self.completed += 1;
        Ok(())
    }
}

fn dispatch(command: Command) -> (DispatchOutcome, RecordingTransmitter) {
    let queue = CommandQueue::new();
    let mut dispatcher = Dispatcher::new(&queue, RecordingTransmitter::default(), IDLE_TIMEOUT);
    let outcome = block_on(dispatcher.dispatch(&command));
    (outcome, dispatcher.into_transmitter())
}

// -----------------------------------------------------------------------------
// Bursts
// -----------------------------------------------------------------------------

#[test]
fn plain_command_with_explicit_repeat() {
    let (outcome, transmitter) = dispatch(Command::kaku(100, 3, 0).with_repetitions(10));

    assert_eq!(outcome, DispatchOutcome::Transmitted { repetitions: 10 });
    assert_eq!(transmitter.submits(), 10);
    assert_eq!(transmitter.waits(), 10);
    assert!(transmitter.events.iter().all(|e| matches!(e, Event::Submit(66) | Event::Wait)));
}

#[test]
fn dim_command_uses_default_repeat() {
    let (outcome, transmitter) = dispatch(Command::kaku(100, 3, 7));

    assert_eq!(outcome, DispatchOutcome::Transmitted { repetitions: 25 });
    assert_eq!(transmitter.submits(), 25);
    assert!(transmitter.waveforms.iter().all(|w| w.len() == 74));
    assert_eq!(transmitter.waveforms[0], encode(100, 3, 7));
}

#[test]
fn repeat_above_limit_is_clamped() {
    let (outcome, transmitter) = dispatch(Command::kaku(100, 3, 0).with_repetitions(150));

    assert_eq!(outcome, DispatchOutcome::Transmitted { repetitions: 100 });
    assert_eq!(transmitter.submits(), 100);
}

#[test]
fn repeat_of_zero_falls_back_to_default() {
    let (outcome, _) = dispatch(Command::kaku(100, 3, 0).with_repetitions(0));

    assert_eq!(outcome, DispatchOutcome::Transmitted { repetitions: 25 });
}

#[test]
fn every_submit_is_followed_by_a_wait() {
    let (_, transmitter) = dispatch(Command::kaku(1, 1, 1).with_repetitions(4));

    let expected: Vec<Event> = (0..4)
        .flat_map(|_| [Event::Submit(74), Event::Wait])
        .collect();
    assert_eq!(transmitter.events, expected);
}

#[test]
fn out_of_range_fields_are_reduced_before_encoding() {
    let (_, transmitter) = dispatch(Command::kaku(100, 19, 23).with_repetitions(1));

    assert_eq!(transmitter.waveforms, vec![encode(100, 3, 7)]);
}

// -----------------------------------------------------------------------------
// Discarding and failures
// -----------------------------------------------------------------------------

#[test]
fn unsupported_protocol_is_discarded() {
    let queue = CommandQueue::new();
    queue.try_enqueue(Command::new("other", 100, 3, 0)).unwrap();

    let mut dispatcher = Dispatcher::new(&queue, RecordingTransmitter::default(), IDLE_TIMEOUT);
    let outcome = block_on(dispatcher.poll_once());

    assert_eq!(outcome, DispatchOutcome::Discarded);
    assert!(dispatcher.transmitter().events.is_empty());
    assert!(queue.is_empty());
}

#[test]
fn transmitter_error_aborts_the_burst_only() {
    let queue = CommandQueue::new();
    queue
        .try_enqueue(Command::kaku(100, 3, 0).with_repetitions(10))
        .unwrap();
    queue
        .try_enqueue(Command::kaku(200, 1, 0).with_repetitions(2))
        .unwrap();

    let mut dispatcher =
        Dispatcher::new(&queue, RecordingTransmitter::failing_after(3), IDLE_TIMEOUT);

    assert_eq!(
        block_on(dispatcher.poll_once()),
        DispatchOutcome::Aborted { completed: 3 }
    );
    assert_eq!(
        block_on(dispatcher.poll_once()),
        DispatchOutcome::Transmitted { repetitions: 2 }
    );
    assert_eq!(dispatcher.transmitter().submits(), 5);
}

#[test]
fn empty_queue_reports_idle() {
    let queue = CommandQueue::new();
    let mut dispatcher = Dispatcher::new(&queue, RecordingTransmitter::default(), IDLE_TIMEOUT);

    assert_eq!(block_on(dispatcher.poll_once()), DispatchOutcome::Idle);
    assert!(dispatcher.transmitter().events.is_empty());
}

#[test]
fn queued_commands_are_dispatched_in_order() {
    let queue = CommandQueue::new();
    for address in [10, 20, 30] {
        queue
            .try_enqueue(Command::kaku(address, 0, 0).with_repetitions(1))
            .unwrap();
    }

    let mut dispatcher = Dispatcher::new(&queue, RecordingTransmitter::default(), IDLE_TIMEOUT);
    for _ in 0..3 {
        block_on(dispatcher.poll_once());
    }

    let waveforms = &dispatcher.transmitter().waveforms;
    assert_eq!(waveforms[0], encode(10, 0, 0));
    assert_eq!(waveforms[1], encode(20, 0, 0));
    assert_eq!(waveforms[2], encode(30, 0, 0));
}
