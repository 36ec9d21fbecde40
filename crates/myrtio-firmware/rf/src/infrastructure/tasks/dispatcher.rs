use myrtio_rf::{CommandQueue, Dispatcher};

use crate::infrastructure::config;
use crate::infrastructure::drivers::EspRmtTransmitter;

/// Task running the transmission loop
///
/// It is the only consumer of the command queue and the only owner of the
/// RMT channel.
#[embassy_executor::task]
pub(crate) async fn dispatcher_task(
    queue: &'static CommandQueue,
    transmitter: EspRmtTransmitter,
) {
    let mut dispatcher = Dispatcher::new(queue, transmitter, config::DEQUEUE_TIMEOUT);
    dispatcher.run().await
}
