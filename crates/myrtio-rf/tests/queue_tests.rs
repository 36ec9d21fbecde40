//! Integration tests for the bounded command queue.

use embassy_futures::block_on;
use embassy_time::{Duration, Instant};
use myrtio_rf::{COMMAND_QUEUE_SIZE, Command, CommandQueue, EnqueueError};

const SHORT_TIMEOUT: Duration = Duration::from_millis(20);

fn command(address: u32) -> Command {
    Command::kaku(address, 0, 0)
}

fn fill(queue: &CommandQueue) {
    for address in 0..COMMAND_QUEUE_SIZE {
        queue.try_enqueue(command(address as u32)).unwrap();
    }
}

// -----------------------------------------------------------------------------
// Ordering and capacity
// -----------------------------------------------------------------------------

#[test]
fn capacity_is_ten() {
    assert_eq!(COMMAND_QUEUE_SIZE, 10);
}

#[test]
fn commands_come_out_in_fifo_order() {
    let queue = CommandQueue::new();

    block_on(async {
        for address in 1..=3 {
            queue.enqueue(command(address), SHORT_TIMEOUT).await.unwrap();
        }
        for address in 1..=3 {
            let received = queue.dequeue(SHORT_TIMEOUT).await.unwrap();
            assert_eq!(received.address, address);
        }
    });
    assert!(queue.is_empty());
}

#[test]
fn try_enqueue_rejects_when_full() {
    let queue = CommandQueue::new();
    fill(&queue);

    assert!(queue.is_full());
    assert_eq!(queue.len(), COMMAND_QUEUE_SIZE);
    assert_eq!(queue.try_enqueue(command(99)), Err(EnqueueError::Full));
}

#[test]
fn try_dequeue_on_empty_queue() {
    let queue = CommandQueue::default();

    assert_eq!(queue.try_dequeue(), None);
}

// -----------------------------------------------------------------------------
// Timeouts
// -----------------------------------------------------------------------------

#[test]
fn enqueue_times_out_and_drops_when_full() {
    let queue = CommandQueue::new();
    fill(&queue);

    let started = Instant::now();
    let result = block_on(queue.enqueue(command(99), SHORT_TIMEOUT));

    assert_eq!(result, Err(EnqueueError::Full));
    assert!(started.elapsed() >= Duration::from_millis(15));
    assert_eq!(queue.len(), COMMAND_QUEUE_SIZE);

    // The dropped command never shows up
    while let Some(received) = queue.try_dequeue() {
        assert_ne!(received.address, 99);
    }
}

#[test]
fn enqueue_succeeds_once_a_slot_frees_up() {
    let queue = CommandQueue::new();
    fill(&queue);

    assert_eq!(queue.try_dequeue().map(|c| c.address), Some(0));
    let result = block_on(queue.enqueue(command(42), SHORT_TIMEOUT));

    assert_eq!(result, Ok(()));
    assert!(queue.is_full());
}

#[test]
fn dequeue_times_out_on_empty_queue() {
    let queue = CommandQueue::new();

    let started = Instant::now();
    let received = block_on(queue.dequeue(SHORT_TIMEOUT));

    assert_eq!(received, None);
    assert!(started.elapsed() >= Duration::from_millis(15));
}

#[test]
fn commands_are_stored_by_value() {
    let queue = CommandQueue::new();
    let mut submitted = Command::kaku(7, 1, 2).with_repetitions(5);
    queue.try_enqueue(submitted.clone()).unwrap();

    submitted.address = 8;
    let received = queue.try_dequeue().unwrap();

    assert_eq!(received, Command::kaku(7, 1, 2).with_repetitions(5));
}
