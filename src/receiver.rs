//! Receive state machine.
//!
//! Consumes bits recovered by the [`SoftwarePLL`](crate::pll::SoftwarePLL),
//! hunts for the 12-bit start pattern, then assembles symbol pairs into the
//! frame bytes `count, payload..., crc_lo, crc_hi`. A bad count byte or an
//! invalid symbol drops the frame and the hunt starts over. The next start
//! pattern always resynchronises, however the previous frame ended.

use crate::consts::{ASK_BITS_PER_SYMBOL, ASK_START_SYMBOL};
use crate::error::AskError;
use crate::frame::{RxBuffer, decode_window, validate_count};

const WINDOW_BITS: u8 = ASK_BITS_PER_SYMBOL * 2;
const WINDOW_TOP: u16 = 1 << (WINDOW_BITS - 1);

/// Frame-level outcome of pushing one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RxEvent {
    /// The start pattern was seen; a new frame is being assembled.
    Started,
    /// The frame in progress was dropped.
    Rejected(AskError),
    /// A full, length-validated frame is in [`Receiver::frame`].
    Completed,
}

/// Frame assembler fed one recovered bit at a time.
#[derive(Debug, Clone, Default)]
pub struct Receiver {
    /// Last 12 bits received, newest in bit 11.
    bit_window: u16,

    /// Bits collected towards the next symbol pair while active.
    bit_count: u8,

    /// Inside a frame, as opposed to hunting for the start pattern.
    active: bool,

    /// Expected frame length, taken from the first decoded byte.
    count: u8,

    /// Bytes decoded so far in the current frame.
    buf: RxBuffer,

    good: u16,
    bad: u16,
}

impl Receiver {
    /// Creates a receiver that is hunting for the start pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts one recovered bit into the window and advances the frame.
    pub fn push_bit(&mut self, bit: bool) -> Option<RxEvent> {
        self.bit_window >>= 1;
        if bit {
            self.bit_window |= WINDOW_TOP;
        }

        if !self.active {
            if self.bit_window == ASK_START_SYMBOL {
                self.active = true;
                self.bit_count = 0;
                self.count = 0;
                self.buf.clear();
                trace!("start symbol detected");
                return Some(RxEvent::Started);
            }
            return None;
        }

        self.bit_count += 1;
        if self.bit_count < WINDOW_BITS {
            return None;
        }
        self.bit_count = 0;

        match self.accept_byte() {
            Ok(true) => {
                self.active = false;
                self.good = self.good.wrapping_add(1);
                Some(RxEvent::Completed)
            }
            Ok(false) => None,
            Err(err) => {
                self.active = false;
                self.bad = self.bad.wrapping_add(1);
                Some(RxEvent::Rejected(err))
            }
        }
    }

    /// Decodes the current window into the next frame byte.
    ///
    /// Returns whether the frame is now complete.
    fn accept_byte(&mut self) -> Result<bool, AskError> {
        let byte = decode_window(self.bit_window)?;
        if self.buf.is_empty() {
            self.count = validate_count(byte)?;
        }
        // count <= capacity, so the buffer is never full here
        let _ = self.buf.push(byte);
        Ok(self.buf.len() >= usize::from(self.count))
    }

    /// Drops any frame in progress and goes back to hunting.
    pub fn resync(&mut self) {
        self.active = false;
    }

    /// Bytes decoded so far for the current (or last) frame.
    pub fn frame(&self) -> &[u8] {
        &self.buf
    }

    /// True while a frame is being assembled.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Length announced by the current frame's count byte (0 until known).
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Frames completed since creation.
    pub fn good(&self) -> u16 {
        self.good
    }

    /// Frames dropped for a bad count or an invalid symbol.
    pub fn bad(&self) -> u16 {
        self.bad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_byte;
    use crate::frame::{TxBuffer, encode_frame, payload};
    use crate::pll::SoftwarePLL;
    use std::vec::Vec;

    const PREAMBLE_AND_START: [u8; 8] = [0x2a, 0x2a, 0x2a, 0x2a, 0x2a, 0x2a, 0x38, 0x2c];

    fn symbols_for(data: &[u8]) -> TxBuffer {
        let mut out = TxBuffer::new();
        encode_frame(data, &mut out).unwrap();
        out
    }

    fn bits_of(symbols: &[u8]) -> Vec<bool> {
        symbols
            .iter()
            .flat_map(|&s| (0..6).map(move |i| s & (1 << i) != 0))
            .collect()
    }

    /// Oversamples `bits`, moving each interior bit boundary by `jitter(k)` samples.
    fn samples_of(bits: &[bool], jitter: impl Fn(usize) -> isize) -> Vec<bool> {
        let n = bits.len();
        let boundary = |k: usize| -> usize {
            let shift = if k == 0 || k == n { 0 } else { jitter(k) };
            (8 * k as isize + shift) as usize
        };
        let mut out = Vec::new();
        for (k, &bit) in bits.iter().enumerate() {
            out.extend(core::iter::repeat(bit).take(boundary(k + 1) - boundary(k)));
        }
        out
    }

    #[derive(Default)]
    struct Harness {
        pll: SoftwarePLL,
        rx: Receiver,
        recovered: Vec<bool>,
        frames: Vec<Vec<u8>>,
        events: Vec<RxEvent>,
    }

    impl Harness {
        fn feed(&mut self, samples: &[bool]) {
            for &s in samples {
                if let Some(bit) = self.pll.update(s) {
                    self.recovered.push(bit);
                    if let Some(event) = self.rx.push_bit(bit) {
                        self.events.push(event);
                        if event == RxEvent::Completed {
                            self.frames.push(self.rx.frame().to_vec());
                        }
                    }
                }
            }
        }

        fn feed_symbols(&mut self, symbols: &[u8], jitter: impl Fn(usize) -> isize) {
            self.feed(&[false; 40]);
            self.feed(&samples_of(&bits_of(symbols), jitter));
            self.feed(&[false; 40]);
        }
    }

    fn no_jitter(_: usize) -> isize {
        0
    }

    #[test]
    fn test_start_pattern_activates() {
        let mut rx = Receiver::new();
        let mut events = Vec::new();
        for bit in bits_of(&[0x38, 0x2c]) {
            events.extend(rx.push_bit(bit));
        }
        assert_eq!(events, [RxEvent::Started]);
        assert!(rx.is_active());
        assert!(rx.frame().is_empty());
    }

    #[test]
    fn test_clean_stream_round_trips() {
        for len in [1usize, 2, 13, 27] {
            let data: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(29) ^ 0x5a).collect();
            let mut h = Harness::default();
            h.feed_symbols(&symbols_for(&data), no_jitter);
            assert_eq!(h.frames.len(), 1, "len {len}");
            assert_eq!(payload(&h.frames[0]), data.as_slice());
            assert!(crate::frame::is_intact(&h.frames[0]));
            assert_eq!(h.rx.good(), 1);
            assert_eq!(h.rx.bad(), 0);
        }
    }

    #[test]
    fn test_jittered_stream_recovers_exact_bits() {
        let symbols = symbols_for(b"jitter tolerance!");
        let sent = bits_of(&symbols);
        let pattern = [0isize, 1, -1, 1, 0, -1, -1, 1];

        let mut h = Harness::default();
        h.feed_symbols(&symbols, |k| pattern[k % pattern.len()]);

        let found = h
            .recovered
            .windows(sent.len())
            .any(|window| window == sent.as_slice());
        assert!(found, "transmitted bits not recovered verbatim");
        assert_eq!(h.frames.len(), 1);
        assert_eq!(payload(&h.frames[0]), b"jitter tolerance!");
    }

    #[test]
    fn test_bad_count_is_dropped_and_next_frame_survives() {
        for bad_count in [3u8, 31] {
            let mut stream = Vec::from(PREAMBLE_AND_START);
            stream.extend_from_slice(&encode_byte(bad_count));
            // the next frame's start symbol follows straight on
            stream.extend_from_slice(&[0x38, 0x2c]);
            stream.extend_from_slice(&symbols_for(b"ok")[8..]);

            let mut h = Harness::default();
            h.feed_symbols(&stream, no_jitter);

            assert_eq!(h.rx.bad(), 1, "count {bad_count}");
            assert!(
                h.events
                    .contains(&RxEvent::Rejected(AskError::FrameLengthInvalid(bad_count)))
            );
            assert_eq!(h.frames.len(), 1);
            assert_eq!(payload(&h.frames[0]), b"ok");
            assert!(crate::frame::is_intact(&h.frames[0]));
        }
    }

    #[test]
    fn test_invalid_symbol_drops_frame() {
        let mut symbols = symbols_for(b"abc");
        symbols[11] = 0x3f;

        let mut h = Harness::default();
        h.feed_symbols(&symbols, no_jitter);

        assert!(h.frames.is_empty());
        assert_eq!(h.rx.bad(), 1);
        assert!(h.events.contains(&RxEvent::Rejected(AskError::InvalidSymbol(0x3f))));
        assert!(!h.rx.is_active());
    }

    #[test]
    fn test_resync_abandons_frame() {
        let mut rx = Receiver::new();
        for bit in bits_of(&[0x38, 0x2c]) {
            let _ = rx.push_bit(bit);
        }
        assert!(rx.is_active());
        rx.resync();
        assert!(!rx.is_active());
        assert_eq!(rx.bad(), 0);
    }
}
