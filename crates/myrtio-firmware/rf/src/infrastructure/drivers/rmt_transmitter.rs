use core::fmt;

use esp_hal::Async;
use esp_hal::gpio::Level;
use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::peripherals::RMT;
use esp_hal::rmt::{Channel, Error as RmtError, PulseCode, Rmt, Tx, TxChannelConfig, TxChannelCreator};
use esp_hal::time::Rate;
use heapless::Vec;

use myrtio_rf::PulseTransmitter;
use myrtio_rf::kaku::{MAX_FRAME_SYMBOLS, Waveform};
use myrtio_rf::timing::{RMT_CLOCK_DIVIDER, RMT_SOURCE_CLOCK_HZ};

use crate::infrastructure::config;

/// Frame symbols plus the end marker
const PULSE_BUFFER_SIZE: usize = MAX_FRAME_SYMBOLS + 1;

#[derive(Debug)]
pub(crate) enum RmtTxError {
    /// RMT driver error
    Rmt(RmtError),
    /// Waveform does not fit the pulse buffer
    BufferOverflow,
    /// `wait_for_completion` called without a submitted waveform
    NothingSubmitted,
}

impl fmt::Display for RmtTxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RmtTxError::Rmt(e) => write!(f, "RMT error: {:?}", e),
            RmtTxError::BufferOverflow => write!(f, "waveform too long"),
            RmtTxError::NothingSubmitted => write!(f, "no waveform submitted"),
        }
    }
}

/// Pulse transmitter on the ESP32 RMT peripheral
///
/// Drives the data pin of a 433 MHz transmitter module: each symbol is
/// emitted as a high phase followed by a low phase, without carrier.
pub(crate) struct EspRmtTransmitter {
    channel: Channel<'static, Async, Tx>,
    pulses: Vec<PulseCode, PULSE_BUFFER_SIZE>,
}

impl EspRmtTransmitter {
    /// Create a new RMT transmitter
    ///
    /// # Arguments
    /// * `rmt` - RMT peripheral
    /// * `pin` - GPIO pin connected to the transmitter data line
    pub(crate) fn new<O>(rmt: RMT<'static>, pin: O) -> Result<Self, RmtTxError>
    where
        O: PeripheralOutput<'static>,
    {
        let rmt = Rmt::new(rmt, Rate::from_hz(RMT_SOURCE_CLOCK_HZ))
            .map_err(RmtTxError::Rmt)?
            .into_async();

        let tx_config = TxChannelConfig::default()
            .with_clk_divider(RMT_CLOCK_DIVIDER)
            .with_idle_output_level(Level::Low)
            .with_idle_output(true)
            .with_carrier_modulation(false)
            .with_memsize(config::RMT_MEMORY_BLOCKS);
        let channel = rmt
            .channel0
            .configure_tx(pin, tx_config)
            .map_err(RmtTxError::Rmt)?;

        Ok(Self {
            channel,
            pulses: Vec::new(),
        })
    }
}

impl PulseTransmitter for EspRmtTransmitter {
    type Error = RmtTxError;

    fn submit(&mut self, waveform: &Waveform) -> Result<(), RmtTxError> {
        self.pulses.clear();
        for symbol in waveform.iter() {
            self.pulses
                .push(PulseCode::new(Level::High, symbol.high, Level::Low, symbol.low))
                .map_err(|_| RmtTxError::BufferOverflow)?;
        }
        self.pulses
            .push(PulseCode::end_marker())
            .map_err(|_| RmtTxError::BufferOverflow)
    }

    async fn wait_for_completion(&mut self) -> Result<(), RmtTxError> {
        if self.pulses.is_empty() {
            return Err(RmtTxError::NothingSubmitted);
        }
        let result = self
            .channel
            .transmit(&self.pulses)
            .await
            .map_err(RmtTxError::Rmt);
        self.pulses.clear();
        result
    }
}
