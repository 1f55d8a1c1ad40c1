//! Single-slot handoff between the tick handler and the application.
//!
//! The receiver publishes each completed frame here and the application takes
//! it out. The slot holds at most one frame. A newer frame replaces an older
//! one that was never collected, and nothing is queued.
//!
//! [`Mailbox::take_into`] copies the payload and clears the slot in one call.
//! Run it inside the same critical section as the tick handler and a frame
//! completing mid-copy can never tear the read.

use crate::error::AskError;
use crate::frame::{RxBuffer, is_intact, payload};

/// Outcome of a retrieval: how many payload bytes were copied, and whether the
/// frame passed its CRC.
///
/// The bytes are copied either way. Callers must look at the variant (or call
/// [`verified`](Delivery::verified)) before trusting them.
#[must_use = "a corrupt payload is copied too; check the delivery before using it"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Delivery {
    /// The frame CRC checked out.
    Intact(usize),
    /// The frame CRC did not match.
    Corrupt(usize),
}

impl Delivery {
    /// Number of payload bytes written to the caller's buffer.
    pub fn copied(&self) -> usize {
        match *self {
            Delivery::Intact(n) | Delivery::Corrupt(n) => n,
        }
    }

    /// True if the frame CRC matched.
    pub fn is_intact(&self) -> bool {
        matches!(self, Delivery::Intact(_))
    }

    /// Converts a corrupt delivery into [`AskError::CrcMismatch`].
    pub fn verified(self) -> Result<usize, AskError> {
        match self {
            Delivery::Intact(n) => Ok(n),
            Delivery::Corrupt(_) => Err(AskError::CrcMismatch),
        }
    }
}

/// Holds the most recent completed frame until it is taken.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    frame: RxBuffer,
    pending: bool,
}

impl Mailbox {
    /// An empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `frame`, replacing anything not yet taken.
    pub fn publish(&mut self, frame: &[u8]) {
        self.frame.clear();
        let take = frame.len().min(self.frame.capacity());
        let _ = self.frame.extend_from_slice(&frame[..take]);
        self.pending = true;
    }

    /// Forgets the pending frame, if any.
    pub fn discard(&mut self) {
        self.pending = false;
    }

    /// True if a frame is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Copies the pending payload into `out` and empties the slot.
    ///
    /// At most `out.len()` bytes are copied. The slot is emptied whether or not
    /// the CRC matched.
    pub fn take_into(&mut self, out: &mut [u8]) -> Result<Delivery, AskError> {
        if !self.pending {
            return Err(AskError::NotReady);
        }
        let data = payload(&self.frame);
        let n = data.len().min(out.len());
        out[..n].copy_from_slice(&data[..n]);
        self.pending = false;

        Ok(if is_intact(&self.frame) {
            Delivery::Intact(n)
        } else {
            Delivery::Corrupt(n)
        })
    }
}
