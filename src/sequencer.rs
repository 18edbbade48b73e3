//! WS2812 bit sequencer program and channel addressing
//!
//! Each output channel runs the same four-instruction program on one
//! programmable I/O state machine. The program pulls 24-bit GRB words
//! (MSB first) and expands every bit into a fixed three-phase waveform:
//!
//! ```text
//!  bit 1: |‾‾ T1 ‾‾|‾‾‾‾‾ T2 ‾‾‾‾‾|__ T3 __|
//!  bit 0: |‾‾ T1 ‾‾|_____ T2 _____|__ T3 __|
//! ```
//!
//! The timing constants, clock and word layout are the contract with the
//! LEDs; the encoded words below are the RP2040/RP2350 PIO assembly of
//! that program.

use crate::Error;

/// Cycles of the leading high phase
pub const T1: u8 = 2;
/// Cycles of the data phase (high for `1`, low for `0`)
pub const T2: u8 = 5;
/// Cycles of the trailing low phase
pub const T3: u8 = 3;

/// Sequencer cycles per transmitted bit
pub const CYCLES_PER_BIT: u32 = (T1 + T2 + T3) as u32;

/// State machine clock
pub const SEQUENCER_CLOCK_HZ: u32 = 8_000_000;

/// Resulting wire bit rate (800 kbit/s)
pub const BIT_RATE_HZ: u32 = SEQUENCER_CLOCK_HZ / CYCLES_PER_BIT;

/// Bits pulled from each 32-bit word
pub const BITS_PER_PIXEL: u8 = 24;

/// Highest channel id (three I/O blocks of four state machines)
pub const MAX_CHANNEL_ID: u8 = 11;

/// Number of addressable channels
pub const MAX_CHANNELS: usize = MAX_CHANNEL_ID as usize + 1;

const STATE_MACHINES_PER_BLOCK: u8 = 4;

/// Assembled sequencer program and its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerProgram {
    /// Encoded instructions
    pub instructions: [u16; 4],
    /// Instruction the program wraps back to
    pub wrap_target: u8,
    /// Last instruction before wrapping
    pub wrap: u8,
    /// Number of side-set pins (the data pin)
    pub side_set_bits: u8,
    /// Output shift register shifts left (MSB first)
    pub shift_left: bool,
    /// Autopull threshold in bits
    pub pull_threshold: u8,
    /// State machine clock
    pub clock_hz: u32,
}

/// The WS2812 program:
///
/// ```text
/// .side_set 1
/// .wrap_target
/// bitloop:
///     out x, 1        side 0 [T3 - 1]
///     jmp !x do_zero  side 1 [T1 - 1]
///     jmp bitloop     side 1 [T2 - 1]
/// do_zero:
///     nop             side 0 [T2 - 1]
/// .wrap
/// ```
pub const WS2812_PROGRAM: SequencerProgram = SequencerProgram {
    instructions: [
        encode_out_x(T3 - 1),
        encode_jmp(0b001, 3, true, T1 - 1),
        encode_jmp(0b000, 0, true, T2 - 1),
        encode_nop(false, T2 - 1),
    ],
    wrap_target: 0,
    wrap: 3,
    side_set_bits: 1,
    shift_left: true,
    pull_threshold: BITS_PER_PIXEL,
    clock_hz: SEQUENCER_CLOCK_HZ,
};

/// Delay / side-set field with one mandatory side-set bit
const fn side_delay(side: bool, delay: u8) -> u16 {
    ((side as u16) << 12) | (((delay & 0x0F) as u16) << 8)
}

/// `out x, 1 side 0 [delay]`
const fn encode_out_x(delay: u8) -> u16 {
    (0b011 << 13) | side_delay(false, delay) | (0b001 << 5) | 1
}

const fn encode_jmp(condition: u16, address: u16, side: bool, delay: u8) -> u16 {
    side_delay(side, delay) | (condition << 5) | (address & 0x1F)
}

/// `mov y, y`
const fn encode_nop(side: bool, delay: u8) -> u16 {
    (0b101 << 13) | side_delay(side, delay) | (0b010 << 5) | 0b010
}

/// Waveform of one transmitted bit, in sequencer cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitTiming {
    pub high_cycles: u32,
    pub low_cycles: u32,
}

impl BitTiming {
    /// High time in nanoseconds
    pub const fn high_ns(self) -> u32 {
        self.high_cycles * (1_000_000_000 / SEQUENCER_CLOCK_HZ)
    }

    /// Low time in nanoseconds
    pub const fn low_ns(self) -> u32 {
        self.low_cycles * (1_000_000_000 / SEQUENCER_CLOCK_HZ)
    }
}

/// Waveform the program produces for a single bit
pub const fn bit_timing(bit: bool) -> BitTiming {
    if bit {
        BitTiming {
            high_cycles: (T1 + T2) as u32,
            low_cycles: T3 as u32,
        }
    } else {
        BitTiming {
            high_cycles: T1 as u32,
            low_cycles: (T2 + T3) as u32,
        }
    }
}

/// Bits of a packed word in wire order (the 24 high bits, MSB first)
pub fn wire_bits(word: u32) -> impl Iterator<Item = bool> {
    (0..u32::from(BITS_PER_PIXEL)).map(move |i| (word >> (31 - i)) & 1 != 0)
}

/// Validated hardware channel (state machine) id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChannelId(u8);

impl ChannelId {
    /// Validate a raw id (0-11)
    pub const fn new(id: u8) -> Result<Self, Error> {
        if id > MAX_CHANNEL_ID {
            return Err(Error::InvalidChannelId(id));
        }
        Ok(Self(id))
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// I/O block hosting this state machine
    pub const fn block(self) -> u8 {
        self.0 / STATE_MACHINES_PER_BLOCK
    }

    /// State machine index within its block
    pub const fn state_machine(self) -> u8 {
        self.0 % STATE_MACHINES_PER_BLOCK
    }

    /// Transfer-engine request line feeding this state machine's TX FIFO
    pub const fn dreq(self) -> u8 {
        (self.block() << 3) | (self.state_machine() & 0x03)
    }
}

impl TryFrom<u8> for ChannelId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
