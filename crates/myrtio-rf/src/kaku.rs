//! KlikAanKlikUit (KAKU) frame encoder
//!
//! A frame is a start pulse, 27 header bits (26 address bits and the group
//! flag), a mode marker, 4 unit bits, an optional 4-bit dim level and a stop
//! pulse. Every data bit is sent as two symbols, MSB first:
//!
//! ```text
//!          _      _
//!  '1':   | |____| |_     (T,3T,T,T)
//!          _   _
//!  '0':   | |_| |____     (T,T,T,3T)
//!          _   _
//!  DIM:   | |_| |_        (T,T,T,T)
//! ```
//!
//! The dim marker takes the place of the on/off bit, so a receiver can tell
//! a dim frame from a plain one.

use crate::timing::PulseSymbol;

/// Symbols in a frame without dim level
pub const PLAIN_FRAME_SYMBOLS: usize = 66;

/// Symbols in a frame carrying a dim level
pub const DIM_FRAME_SYMBOLS: usize = 74;

/// Capacity of a [`Waveform`]
pub const MAX_FRAME_SYMBOLS: usize = DIM_FRAME_SYMBOLS;

/// Significant address bits
pub const ADDRESS_BITS: u32 = 26;

const ADDRESS_MASK: u32 = (1 << ADDRESS_BITS) - 1;
const ADDRESS_SHIFT: u32 = 6;
const GROUP_FLAG: u32 = 1 << 5;
const ON_OFF_FLAG: u32 = 1 << 4;
const UNIT_MASK: u32 = 0x0F;

/// Address + group flag, sent before the mode marker
const HEADER_BITS: u32 = ADDRESS_BITS + 1;

/// Symbol pair of a `1` bit
pub const ONE_BIT: [PulseSymbol; 2] = [PulseSymbol::LONG, PulseSymbol::SHORT];

/// Symbol pair of a `0` bit
pub const ZERO_BIT: [PulseSymbol; 2] = [PulseSymbol::SHORT, PulseSymbol::LONG];

/// Symbol pair replacing the on/off bit in dim frames
pub const DIM_MARKER: [PulseSymbol; 2] = [PulseSymbol::SHORT, PulseSymbol::SHORT];

/// Pack address, flags and unit into the 32-bit state word.
///
/// Layout, MSB to LSB: address (26 bits), group (1), on/off (1), unit (4).
/// Address bits above 26 and unit bits above 4 are discarded.
#[allow(clippy::cast_lossless)]
pub const fn pack_state_word(address: u32, group: bool, on: bool, unit: u8) -> u32 {
    let mut word = (address & ADDRESS_MASK) << ADDRESS_SHIFT;
    if group {
        word |= GROUP_FLAG;
    }
    if on {
        word |= ON_OFF_FLAG;
    }
    word | (unit as u32 & UNIT_MASK)
}

/// Frame parameters, already reduced to their valid ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KakuFrame {
    /// Receiver address (26 bits)
    pub address: u32,
    /// Unit within the address, 0-15
    pub unit: u8,
    /// 0 for a plain on/off frame, 1-15 for a dim level
    pub value: u8,
}

impl KakuFrame {
    /// Create a frame, masking every field to its width
    pub const fn new(address: u32, unit: u8, value: u8) -> Self {
        Self {
            address: address & ADDRESS_MASK,
            unit: unit & 0x0F,
            value: value & 0x0F,
        }
    }

    /// Dim level, if this is a dim frame
    pub const fn dim_level(&self) -> Option<u8> {
        if self.value == 0 {
            None
        } else {
            Some(self.value)
        }
    }

    /// State word of this frame. The group flag is never set.
    pub const fn state_word(&self) -> u32 {
        pack_state_word(self.address, false, self.value != 0, self.unit)
    }
}

/// Encoded frame, ready to be handed to the pulse transmitter
///
/// Stored inline, so a burst owns its waveform without heap allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    symbols: [PulseSymbol; MAX_FRAME_SYMBOLS],
    len: usize,
}

impl Waveform {
    const fn empty() -> Self {
        Self {
            symbols: [PulseSymbol { high: 0, low: 0 }; MAX_FRAME_SYMBOLS],
            len: 0,
        }
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the waveform holds no symbols
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Encoded symbols
    pub fn as_slice(&self) -> &[PulseSymbol] {
        &self.symbols[..self.len]
    }

    /// Iterate over the encoded symbols
    pub fn iter(&self) -> impl Iterator<Item = &PulseSymbol> {
        self.as_slice().iter()
    }

    /// Total duration in RMT ticks
    pub fn duration_ticks(&self) -> u32 {
        self.iter()
            .map(|s| u32::from(s.high) + u32::from(s.low))
            .sum()
    }

    fn push(&mut self, symbol: PulseSymbol) {
        debug_assert!(self.len < MAX_FRAME_SYMBOLS, "kaku frame overflow");
        if let Some(slot) = self.symbols.get_mut(self.len) {
            *slot = symbol;
            self.len += 1;
        }
    }

    fn push_pair(&mut self, pair: [PulseSymbol; 2]) {
        self.push(pair[0]);
        self.push(pair[1]);
    }

    fn push_bit(&mut self, bit: bool) {
        self.push_pair(if bit { ONE_BIT } else { ZERO_BIT });
    }

    fn push_nibble(&mut self, nibble: u8) {
        for shift in (0..4).rev() {
            self.push_bit(nibble & (1 << shift) != 0);
        }
    }
}

impl AsRef<[PulseSymbol]> for Waveform {
    fn as_ref(&self) -> &[PulseSymbol] {
        self.as_slice()
    }
}

/// Encode a frame into its waveform
pub fn encode_frame(frame: &KakuFrame) -> Waveform {
    let mut waveform = Waveform::empty();
    let word = frame.state_word();

    waveform.push(PulseSymbol::START);

    for i in 0..HEADER_BITS {
        waveform.push_bit(word & (0x8000_0000 >> i) != 0);
    }

    match frame.dim_level() {
        None => waveform.push_bit(word & ON_OFF_FLAG != 0),
        Some(_) => waveform.push_pair(DIM_MARKER),
    }

    waveform.push_nibble(frame.unit);

    if let Some(level) = frame.dim_level() {
        waveform.push_nibble(level);
    }

    waveform.push(PulseSymbol::STOP);
    waveform
}

/// Encode `address`, `unit` and `value` into a waveform.
///
/// `unit` and `value` are expected in 0-15; higher bits are ignored.
pub fn encode(address: u32, unit: u8, value: u8) -> Waveform {
    encode_frame(&KakuFrame::new(address, unit, value))
}
