//! Error taxonomy for the modem.
//!
//! Only a handful of these ever reach a caller. Frame-level failures detected
//! inside the tick handler ([`FrameLengthInvalid`](AskError::FrameLengthInvalid),
//! [`InvalidSymbol`](AskError::InvalidSymbol)) are logged, counted as bad frames,
//! and the receiver goes back to hunting for the start pattern.

use thiserror::Error;

/// Errors produced by the ASK modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum AskError {
    /// The payload does not fit in a single frame.
    #[error("payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLong {
        /// Length of the rejected payload.
        len: usize,
        /// Largest payload a frame can carry.
        max: u8,
    },

    /// The first byte of a frame (the count) is outside `4..=30`.
    #[error("frame length byte {0} is out of range")]
    FrameLengthInvalid(u8),

    /// A received 6-bit value is not one of the 16 valid symbols.
    #[error("invalid 6-bit symbol {0:#04x}")]
    InvalidSymbol(u8),

    /// A symbol buffer did not begin with the preamble and start symbol.
    #[error("frame header or start symbol missing")]
    MissingStartSymbol,

    /// A symbol buffer ended before the frame its count byte announced.
    #[error("symbol buffer ends mid-frame")]
    Truncated,

    /// The frame check sequence did not produce the expected residue.
    #[error("frame check sequence mismatch")]
    CrcMismatch,

    /// No complete message is waiting to be retrieved.
    #[error("no message pending")]
    NotReady,

    /// A bit rate of zero was requested.
    #[error("bit rate must be non-zero")]
    InvalidBitRate,

    /// The global driver slot has not been populated yet.
    #[error("driver not installed")]
    NotInstalled,
}
