//! Constants used across the ASK protocol implementation.
//!
//! These cover frame sizing, the fixed transmit header, the start pattern the
//! receiver hunts for, and the tuning of the software PLL.
//!
//! ## Frame layout
//!
//! ```text
//! [0x2a x 6][0x38 0x2c][count][payload ...][crc lo][crc hi]
//!  preamble  start sym  \______ each byte sent as two 6-bit symbols ______/
//! ```
//!
//! `count` covers itself, the payload and the two CRC bytes, so a frame with
//! `n` payload bytes carries `count = n + 3`.

/// Largest value the count byte may take: count + payload + 2 CRC bytes.
///
/// This is also the capacity of the receive accumulation buffer.
pub const ASK_MAX_MESSAGE_LEN: u8 = 30;

/// See [`ASK_MAX_MESSAGE_LEN`](crate::consts::ASK_MAX_MESSAGE_LEN)
pub const ASK_MAX_MESSAGE_LEN_USIZE: usize = ASK_MAX_MESSAGE_LEN as usize;

/// Smallest count byte a receiver accepts (one payload byte).
pub const ASK_MIN_MESSAGE_LEN: u8 = 4;

/// Bytes of framing overhead carried inside `count`: the count byte itself
/// and the two CRC bytes.
pub const ASK_FRAMING_OVERHEAD: u8 = 3;

/// Maximum size (in bytes) of user payload in one frame.
pub const ASK_MAX_PAYLOAD_LEN: u8 = ASK_MAX_MESSAGE_LEN - ASK_FRAMING_OVERHEAD;

/// Alternating-bit training byte repeated at the start of every frame.
pub const ASK_PREAMBLE_BYTE: u8 = 0x2a;

/// Number of preamble bytes before the start symbol.
pub const ASK_PREAMBLE_LEN: u8 = 6;

/// The fixed transmit header: preamble followed by the two start-symbol bytes.
pub const ASK_HEADER: [u8; ASK_HEADER_LEN as usize] = [
    ASK_PREAMBLE_BYTE,
    ASK_PREAMBLE_BYTE,
    ASK_PREAMBLE_BYTE,
    ASK_PREAMBLE_BYTE,
    ASK_PREAMBLE_BYTE,
    ASK_PREAMBLE_BYTE,
    0x38,
    0x2c,
];

/// Length (in bytes) of [`ASK_HEADER`](crate::consts::ASK_HEADER).
pub const ASK_HEADER_LEN: u8 = ASK_PREAMBLE_LEN + 2;

/// Maximum size (in bytes) of the full transmission buffer.
///
/// Every logical byte becomes two 6-bit symbols, hence the `* 2`.
pub const ASK_MAX_BUF_LEN: u8 = (ASK_MAX_MESSAGE_LEN * 2) + ASK_HEADER_LEN;

/// See [ASK_MAX_BUF_LEN](crate::consts::ASK_MAX_BUF_LEN)
pub const ASK_MAX_BUF_LEN_USIZE: usize = ASK_MAX_BUF_LEN as usize;

/// The start symbol as it appears in the receiver's 12-bit window.
///
/// `0x38` then `0x2c`, each sent LSB first, shift in as `0x2c << 6 | 0x38`.
pub const ASK_START_SYMBOL: u16 = 0xb38;

/// Number of data bits carried by each transmitted symbol byte.
pub const ASK_BITS_PER_SYMBOL: u8 = 6;

/// Raw samples (ticks) per bit period.
pub const ASK_SAMPLES_PER_BIT: u8 = 8;

/// PLL ramp length: one full bit period in phase units.
pub const ASK_RAMP_LEN: u8 = 160;

/// Nominal ramp increment per sample.
pub const ASK_RAMP_INC: u8 = ASK_RAMP_LEN / ASK_SAMPLES_PER_BIT;

/// Ramp position splitting "edge came early" from "edge came late".
pub const ASK_RAMP_TRANSITION: u8 = ASK_RAMP_LEN / 2;

/// Phase correction applied on every observed edge.
pub const ASK_RAMP_ADJUST: u8 = 9;

/// Ramp increment for an early edge (slows the recovered clock).
pub const ASK_RAMP_INC_RETARD: u8 = ASK_RAMP_INC - ASK_RAMP_ADJUST;

/// Ramp increment for a late edge (speeds up the recovered clock).
pub const ASK_RAMP_INC_ADVANCE: u8 = ASK_RAMP_INC + ASK_RAMP_ADJUST;

/// High samples out of [`ASK_SAMPLES_PER_BIT`] needed to call a bit a `1`.
pub const ASK_INTEGRATOR_THRESHOLD: u8 = 5;

/// Default link speed in bits per second.
pub const ASK_DEFAULT_BIT_RATE: u16 = 2_000;
