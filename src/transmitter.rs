//! Transmit state machine.
//!
//! Holds the encoded frame and walks it one bit per bit period. Each symbol
//! byte goes out least-significant bit first and only its low six bits are
//! used. The machine never touches a pin. It tells the driver what to drive
//! on each tick.

use crate::consts::{ASK_BITS_PER_SYMBOL, ASK_SAMPLES_PER_BIT};
use crate::error::AskError;
use crate::frame::{TxBuffer, encode_frame};

/// Transmitter activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TxState {
    /// Nothing to send; the output should be low.
    #[default]
    Idle,
    /// A frame is going out.
    Active,
}

/// What the driver should do with the output after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TxStep {
    /// Leave the output as it is.
    Hold,
    /// Drive the output to this level for the next bit period.
    Emit(bool),
    /// The frame is done; release the output and the PTT line.
    Finished,
}

/// Bit-level transmitter fed by [`tick`](Transmitter::tick).
#[derive(Debug, Clone, Default)]
pub struct Transmitter {
    state: TxState,
    buf: TxBuffer,

    /// Index into `buf` of the symbol being sent.
    index: usize,

    /// Current bit position within the symbol (0..6).
    bit: u8,

    /// Tick counter within the current bit period (0..8).
    sample: u8,

    sent: u16,
}

impl Transmitter {
    /// An idle transmitter with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `payload` into the frame buffer.
    ///
    /// Refuses to touch the buffer while a frame is going out.
    pub fn load(&mut self, payload: &[u8]) -> nb::Result<(), AskError> {
        if self.is_active() {
            return Err(nb::Error::WouldBlock);
        }
        encode_frame(payload, &mut self.buf).map_err(nb::Error::Other)
    }

    /// Rewinds the cursor and starts sending the current buffer.
    pub fn start(&mut self) {
        self.index = 0;
        self.bit = 0;
        self.sample = 0;
        self.state = TxState::Active;
    }

    /// Stops immediately, mid-bit if need be.
    pub fn stop(&mut self) {
        self.state = TxState::Idle;
    }

    /// Advances by one tick.
    ///
    /// A new bit is produced on the first tick of every eight. One bit period
    /// after the last bit the machine reports [`TxStep::Finished`] and goes idle.
    pub fn tick(&mut self) -> TxStep {
        if self.state != TxState::Active {
            return TxStep::Hold;
        }
        let due = self.sample == 0;
        self.sample = (self.sample + 1) % ASK_SAMPLES_PER_BIT;
        if !due {
            return TxStep::Hold;
        }

        let Some(&symbol) = self.buf.get(self.index) else {
            self.state = TxState::Idle;
            self.sent = self.sent.wrapping_add(1);
            return TxStep::Finished;
        };

        let level = symbol & (1 << self.bit) != 0;
        self.bit += 1;
        if self.bit >= ASK_BITS_PER_SYMBOL {
            self.bit = 0;
            self.index += 1;
        }
        TxStep::Emit(level)
    }

    /// Current state.
    pub fn state(&self) -> TxState {
        self.state
    }

    /// True while a frame is going out.
    pub fn is_active(&self) -> bool {
        self.state == TxState::Active
    }

    /// The encoded frame, header included.
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Frames sent to completion.
    pub fn sent(&self) -> u16 {
        self.sent
    }
}
