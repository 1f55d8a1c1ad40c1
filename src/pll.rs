//! Software PLL for ASK/OOK bit clock recovery.
//!
//! The receiver output is sampled at a fixed rate of eight samples per bit.
//! There is no shared clock with the transmitter, so the PLL keeps its own
//! notion of where the bit boundaries are. It nudges that estimate toward
//! observed signal transitions and decides each bit by majority vote.
//!
//! This stage only recovers bits. Framing lives in [`crate::receiver`].

use crate::consts::{
    ASK_INTEGRATOR_THRESHOLD, ASK_RAMP_INC, ASK_RAMP_INC_ADVANCE, ASK_RAMP_INC_RETARD,
    ASK_RAMP_LEN, ASK_RAMP_TRANSITION,
};

#[derive(Debug, Clone, Default)]
/// A ramp-based digital phase-locked loop.
///
/// Each call to [`update`](SoftwarePLL::update) advances the ramp by one
/// sample's worth of phase. An edge seen in the first half of the bit window
/// means the local clock is running ahead, so the ramp moves a little slower.
/// An edge in the second half means it is lagging, so the ramp jumps ahead.
/// When the ramp wraps, one bit period has elapsed.
///
// - `ramp`: tracks phase position in the current bit interval
// - `integrator`: counts HIGH samples
pub struct SoftwarePLL {
    /// The most recent sample fed in.
    sample: bool,

    /// Tracks the previous sample value to detect rising or falling edges.
    last_sample: bool,

    /// Phase accumulator used to track position within a single bit interval.
    ///
    /// Wraps at [`ASK_RAMP_LEN`]; the wrap marks a recovered bit boundary.
    ramp: u8,

    /// Counts how many of the samples in the current bit interval were high.
    ///
    /// Reset at every bit boundary. At least [`ASK_INTEGRATOR_THRESHOLD`]
    /// high samples make the bit a `1`.
    integrator: u8,
}

impl SoftwarePLL {
    /// Creates a PLL with zero phase and an idle (low) line history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one raw sample into the loop.
    ///
    /// Returns the recovered bit when this sample closes a bit period.
    pub fn update(&mut self, sample: bool) -> Option<bool> {
        self.sample = sample;
        if sample {
            self.integrator += 1;
        }

        if sample != self.last_sample {
            // Edge: retard if it came early in the window, advance if late
            self.ramp += if self.ramp < ASK_RAMP_TRANSITION {
                ASK_RAMP_INC_RETARD
            } else {
                ASK_RAMP_INC_ADVANCE
            };
            self.last_sample = sample;
        } else {
            self.ramp += ASK_RAMP_INC;
        }

        if self.ramp < ASK_RAMP_LEN {
            return None;
        }

        self.ramp -= ASK_RAMP_LEN;
        let bit = self.integrator >= ASK_INTEGRATOR_THRESHOLD;
        self.integrator = 0;
        Some(bit)
    }

    /// The most recent sample fed to [`update`](SoftwarePLL::update).
    pub fn sample(&self) -> bool {
        self.sample
    }

    /// Current phase within the bit period, `0..160`.
    pub fn ramp(&self) -> u8 {
        self.ramp
    }

    /// High samples counted so far in the current bit period.
    pub fn integrator(&self) -> u8 {
        self.integrator
    }
}
