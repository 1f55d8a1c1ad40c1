//! Link configuration.
//!
//! The modem itself only needs to know pin polarities. The bit rate matters to
//! whoever schedules [`tick()`](crate::driver::AskDriver::tick), which must
//! happen [`ASK_SAMPLES_PER_BIT`] times per bit. The helpers here and in
//! [`crate::timer`] turn it into a tick frequency or timer compare value.

use crate::consts::{ASK_DEFAULT_BIT_RATE, ASK_SAMPLES_PER_BIT};
use crate::error::AskError;

/// Link settings shared by both ends of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct AskConfig {
    bit_rate: u16,
    ptt_inverted: bool,
    rx_inverted: bool,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            bit_rate: ASK_DEFAULT_BIT_RATE,
            ptt_inverted: false,
            rx_inverted: false,
        }
    }
}

impl AskConfig {
    /// A configuration for `bit_rate` bits per second with default polarities.
    pub fn new(bit_rate: u16) -> Result<Self, AskError> {
        Self::default().with_bit_rate(bit_rate)
    }

    /// Replaces the bit rate. Zero is rejected.
    pub fn with_bit_rate(mut self, bit_rate: u16) -> Result<Self, AskError> {
        if bit_rate == 0 {
            return Err(AskError::InvalidBitRate);
        }
        self.bit_rate = bit_rate;
        Ok(self)
    }

    /// Drive PTT low to transmit instead of high.
    pub fn with_ptt_inverted(mut self, inverted: bool) -> Self {
        self.ptt_inverted = inverted;
        self
    }

    /// Treat a low RX pin as carrier present.
    pub fn with_rx_inverted(mut self, inverted: bool) -> Self {
        self.rx_inverted = inverted;
        self
    }

    /// Bits per second.
    pub fn bit_rate(&self) -> u16 {
        self.bit_rate
    }

    /// Whether PTT is active-low.
    pub fn ptt_inverted(&self) -> bool {
        self.ptt_inverted
    }

    /// Whether the RX pin is active-low.
    pub fn rx_inverted(&self) -> bool {
        self.rx_inverted
    }

    /// Rate at which `tick()` must be called, in Hz.
    pub fn tick_hz(&self) -> u32 {
        u32::from(self.bit_rate) * u32::from(ASK_SAMPLES_PER_BIT)
    }

    /// Time between ticks in nanoseconds, rounded to the nearest.
    pub fn tick_interval_ns(&self) -> u32 {
        let hz = self.tick_hz();
        (1_000_000_000 + hz / 2) / hz
    }
}
