//! Command server
//!
//! Accepts one TCP connection at a time, reads a raw JSON payload, queues
//! its commands and answers with a short HTTP-style status.

use core::fmt;

use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_net::tcp::{Error as TcpError, TcpSocket};
use embassy_time::{Duration, Timer};
use embedded_io_async::Write as _;
use heapless::String;
use log::{info, warn};

use myrtio_rf::{CommandQueue, MAX_PAYLOAD_SIZE, ingest, write_response};

use crate::infrastructure::config;

const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 512;
const RESPONSE_BUFFER_SIZE: usize = 192;

const SOCKET_TIMEOUT: Duration = Duration::from_secs(30);
/// Silence after which the payload is considered complete
const READ_IDLE_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Debug)]
enum ServerError {
    Tcp(TcpError),
    FormatResponse,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Tcp(e) => write!(f, "TCP error: {:?}", e),
            ServerError::FormatResponse => write!(f, "response does not fit buffer"),
        }
    }
}

impl From<TcpError> for ServerError {
    fn from(err: TcpError) -> Self {
        ServerError::Tcp(err)
    }
}

impl From<fmt::Error> for ServerError {
    fn from(_error: fmt::Error) -> Self {
        ServerError::FormatResponse
    }
}

#[embassy_executor::task]
pub(crate) async fn command_server_task(stack: Stack<'static>, queue: &'static CommandQueue) {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
    let mut payload = [0u8; MAX_PAYLOAD_SIZE];

    info!("command_server: listening on port {}", config::COMMAND_SERVER_PORT);
    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(SOCKET_TIMEOUT));

        if let Err(e) = socket.accept(config::COMMAND_SERVER_PORT).await {
            warn!("command_server: accept error: {:?}", e);
            continue;
        }

        if let Err(e) = serve_connection(&mut socket, queue, &mut payload).await {
            warn!("command_server: connection error: {}", e);
        }

        socket.close();
        let _ = socket.flush().await;
    }
}

async fn serve_connection(
    socket: &mut TcpSocket<'_>,
    queue: &CommandQueue,
    payload: &mut [u8],
) -> Result<(), ServerError> {
    let len = read_payload(socket, payload).await?;
    if len == 0 {
        return Ok(());
    }

    let result = ingest(&payload[..len], queue, config::ENQUEUE_TIMEOUT).await;
    match result {
        Ok(count) => info!("command_server: {} commands parsed", count),
        Err(e) => warn!("command_server: payload rejected: {}", e),
    }

    let mut response = String::<RESPONSE_BUFFER_SIZE>::new();
    write_response(&mut response, result)?;
    socket.write_all(response.as_bytes()).await?;
    socket.flush().await?;
    Ok(())
}

/// Read until the peer closes, goes quiet, or the buffer is full
async fn read_payload(socket: &mut TcpSocket<'_>, buf: &mut [u8]) -> Result<usize, ServerError> {
    let mut len = socket.read(buf).await?;
    if len == 0 {
        return Ok(0);
    }

    while len < buf.len() {
        let read = select(socket.read(&mut buf[len..]), Timer::after(READ_IDLE_TIMEOUT)).await;
        match read {
            Either::First(Ok(0)) | Either::Second(()) => break,
            Either::First(Ok(n)) => len += n,
            Either::First(Err(e)) => return Err(e.into()),
        }
    }

    Ok(len)
}
