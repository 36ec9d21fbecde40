mod network;
mod rmt_transmitter;

pub(crate) use network::{init_network_stack, wait_for_ip, wait_for_link};
pub(crate) use rmt_transmitter::EspRmtTransmitter;
