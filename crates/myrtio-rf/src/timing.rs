//! Pulse timing table
//!
//! Symbol durations of the KAKU protocol, expressed in RMT ticks.
//! The RMT runs from the 80 MHz APB clock with a divider of 100, so one
//! tick is 1.25 µs. Microsecond values are quantized through 10 µs steps
//! with truncating division; receivers are tuned to exactly these values.

/// RMT source clock in Hz
pub const RMT_SOURCE_CLOCK_HZ: u32 = 80_000_000;

/// RMT counter clock divider
pub const RMT_CLOCK_DIVIDER: u8 = 100;

/// RMT ticks per 10 µs
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const TICKS_PER_10_US: u16 =
    (RMT_SOURCE_CLOCK_HZ / RMT_CLOCK_DIVIDER as u32 / 100_000) as u16;

/// High time of every symbol (T)
pub const SHORT_HIGH_US: u16 = 221;
/// Short low time (T)
pub const SHORT_LOW_US: u16 = 321;
/// Long low time (3T)
pub const LONG_LOW_US: u16 = 1331;
/// Low time after the start pulse
pub const START_LOW_US: u16 = 2724;
/// Low time after the stop pulse, doubles as the gap between repetitions
pub const STOP_LOW_US: u16 = 10320;

/// Convert microseconds into RMT ticks.
///
/// Truncates to 10 µs first, then scales. Do not replace with rounding.
pub const fn ticks_from_micros(us: u16) -> u16 {
    (us / 10) * TICKS_PER_10_US
}

/// One high/low timing pair, the atomic unit emitted by the RMT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PulseSymbol {
    /// High duration in ticks
    pub high: u16,
    /// Low duration in ticks
    pub low: u16,
}

impl PulseSymbol {
    /// Build a symbol from microsecond durations
    pub const fn from_micros(high_us: u16, low_us: u16) -> Self {
        Self {
            high: ticks_from_micros(high_us),
            low: ticks_from_micros(low_us),
        }
    }

    /// T high, T low
    pub const SHORT: Self = Self::from_micros(SHORT_HIGH_US, SHORT_LOW_US);
    /// T high, 3T low
    pub const LONG: Self = Self::from_micros(SHORT_HIGH_US, LONG_LOW_US);
    /// Frame start
    pub const START: Self = Self::from_micros(SHORT_HIGH_US, START_LOW_US);
    /// Frame stop
    pub const STOP: Self = Self::from_micros(SHORT_HIGH_US, STOP_LOW_US);
}
