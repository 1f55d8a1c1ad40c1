//! Frame construction and parsing.
//!
//! A frame is the fixed [`ASK_HEADER`] followed by the symbol-encoded bytes
//! `count`, payload, and the complemented CRC (low byte first). The
//! transmitter sends the output of [`encode_frame`] verbatim. The receiver
//! rebuilds the logical bytes one symbol pair at a time and leans on
//! [`decode_window`], [`validate_count`] and [`is_intact`] to do so.
//! [`decode_frame`] is the offline inverse of [`encode_frame`].

use heapless::Vec;

use crate::consts::{
    ASK_FRAMING_OVERHEAD, ASK_HEADER, ASK_MAX_BUF_LEN_USIZE, ASK_MAX_MESSAGE_LEN,
    ASK_MAX_MESSAGE_LEN_USIZE, ASK_MAX_PAYLOAD_LEN, ASK_MIN_MESSAGE_LEN,
};
use crate::crc::{CRC_CCITT_INIT, CRC_CCITT_RESIDUE, crc_ccitt, crc_ccitt_update};
use crate::encoding::{decode_byte, encode_byte, encode_nibble};
use crate::error::AskError;

/// Symbol buffer holding a complete outgoing frame.
pub type TxBuffer = Vec<u8, ASK_MAX_BUF_LEN_USIZE>;

/// Logical bytes of a received frame: count, payload, CRC.
pub type RxBuffer = Vec<u8, ASK_MAX_MESSAGE_LEN_USIZE>;

/// Checks a payload length against the frame limits.
///
/// An empty payload is allowed. It goes out as a three byte frame that live
/// receivers drop for its short count.
pub fn check_payload_len(len: usize) -> Result<(), AskError> {
    if len > usize::from(ASK_MAX_PAYLOAD_LEN) {
        return Err(AskError::PayloadTooLong {
            len,
            max: ASK_MAX_PAYLOAD_LEN,
        });
    }
    Ok(())
}

/// Builds the full on-air symbol buffer for `payload` into `out`.
///
/// `out` is cleared first. On error it is left untouched.
pub fn encode_frame(payload: &[u8], out: &mut TxBuffer) -> Result<(), AskError> {
    check_payload_len(payload.len())?;
    out.clear();

    // Capacity is sized for the largest legal payload, so none of these
    // pushes can fail once the length check has passed.
    let _ = out.extend_from_slice(&ASK_HEADER);

    let count = payload.len() as u8 + ASK_FRAMING_OVERHEAD;
    let mut crc = crc_ccitt_update(CRC_CCITT_INIT, count);
    let _ = out.extend_from_slice(&encode_byte(count));

    for &b in payload {
        crc = crc_ccitt_update(crc, b);
        let _ = out.extend_from_slice(&encode_byte(b));
    }

    // The complemented CRC goes out low byte first, each byte high nibble first
    let fcs = !crc;
    let _ = out.extend_from_slice(&[
        encode_nibble((fcs >> 4) as u8),
        encode_nibble(fcs as u8),
        encode_nibble((fcs >> 12) as u8),
        encode_nibble((fcs >> 8) as u8),
    ]);
    Ok(())
}

/// Decodes the symbol pair sitting in the low 12 bits of the receive window.
///
/// The first symbol received occupies bits 0..6 and carries the high nibble.
pub fn decode_window(window: u16) -> Result<u8, AskError> {
    let first = (window & 0x3f) as u8;
    let second = ((window >> 6) & 0x3f) as u8;
    decode_byte(first, second).map_err(AskError::InvalidSymbol)
}

/// Accepts `count` if it lies in `4..=30`.
pub fn validate_count(count: u8) -> Result<u8, AskError> {
    if (ASK_MIN_MESSAGE_LEN..=ASK_MAX_MESSAGE_LEN).contains(&count) {
        Ok(count)
    } else {
        Err(AskError::FrameLengthInvalid(count))
    }
}

/// True if the CRC over the whole frame, trailer included, hits the residue.
pub fn is_intact(frame: &[u8]) -> bool {
    crc_ccitt(frame) == CRC_CCITT_RESIDUE
}

/// The payload portion of a received frame.
pub fn payload(frame: &[u8]) -> &[u8] {
    let end = frame.len().saturating_sub(2).max(1);
    frame.get(1..end).unwrap_or(&[])
}

/// Parses a symbol buffer produced by [`encode_frame`] back into frame bytes.
///
/// The CRC is not checked here; pass the result to [`is_intact`]. Unlike the
/// live receiver this accepts the three byte frame of an empty payload.
pub fn decode_frame(symbols: &[u8]) -> Result<RxBuffer, AskError> {
    let body = symbols
        .strip_prefix(&ASK_HEADER[..])
        .ok_or(AskError::MissingStartSymbol)?;
    let mut pairs = body.chunks_exact(2);
    let mut frame = RxBuffer::new();

    let first = pairs.next().ok_or(AskError::Truncated)?;
    let count = decode_byte(first[0], first[1]).map_err(AskError::InvalidSymbol)?;
    if !(ASK_FRAMING_OVERHEAD..=ASK_MAX_MESSAGE_LEN).contains(&count) {
        return Err(AskError::FrameLengthInvalid(count));
    }
    let _ = frame.push(count);

    while frame.len() < usize::from(count) {
        let pair = pairs.next().ok_or(AskError::Truncated)?;
        let byte = decode_byte(pair[0], pair[1]).map_err(AskError::InvalidSymbol)?;
        let _ = frame.push(byte);
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(payload: &[u8]) -> TxBuffer {
        let mut out = TxBuffer::new();
        encode_frame(payload, &mut out).unwrap();
        out
    }

    #[test]
    fn test_encode_known_frame() {
        let out = encoded(b"Hi");
        assert_eq!(
            out.as_slice(),
            &[
                42, 42, 42, 42, 42, 42, 56, 44, 13, 25, 22, 35, 26, 37, 14, 13, 35, 37
            ]
        );
    }

    #[test]
    fn test_encoded_length_is_header_plus_two_symbols_per_byte() {
        for len in [1usize, 5, 27] {
            let payload = [0xa5u8; 27];
            let out = encoded(&payload[..len]);
            assert_eq!(out.len(), 8 + 2 * (len + 3));
        }
    }

    #[test]
    fn test_payload_length_boundary() {
        let mut out = TxBuffer::new();
        assert!(encode_frame(&[0u8; 27], &mut out).is_ok());
        assert_eq!(
            encode_frame(&[0u8; 28], &mut out),
            Err(AskError::PayloadTooLong { len: 28, max: 27 })
        );
        assert!(encode_frame(&[], &mut out).is_ok());
        assert_eq!(out.len(), 8 + 2 * 3);
        assert_eq!(&out[8..10], &encode_byte(3));
    }

    #[test]
    fn test_rejected_payload_leaves_buffer_alone() {
        let mut out = encoded(b"keep");
        let before = out.clone();
        assert!(encode_frame(&[1u8; 40], &mut out).is_err());
        assert_eq!(out, before);
    }

    #[test]
    fn test_decode_frame_recovers_payload() {
        for len in 0..=27usize {
            let data: std::vec::Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            let frame = decode_frame(&encoded(&data)).unwrap();
            assert_eq!(usize::from(frame[0]), len + 3);
            assert_eq!(payload(&frame), data.as_slice());
            assert!(is_intact(&frame));
        }
    }

    #[test]
    fn test_frame_crc_hits_residue() {
        let frame = decode_frame(&encoded(b"residue check")).unwrap();
        assert_eq!(crc_ccitt(&frame), 0xf0b8);
    }

    #[test]
    fn test_corrupt_byte_breaks_crc() {
        let mut frame = decode_frame(&encoded(b"abc")).unwrap();
        frame[2] ^= 0x01;
        assert!(!is_intact(&frame));
    }

    #[test]
    fn test_decode_frame_rejects_missing_header() {
        let out = encoded(b"x");
        assert_eq!(decode_frame(&out[1..]), Err(AskError::MissingStartSymbol));
    }

    #[test]
    fn test_decode_frame_rejects_truncated_input() {
        let out = encoded(b"xyz");
        assert_eq!(decode_frame(&out[..out.len() - 2]), Err(AskError::Truncated));
    }

    #[test]
    fn test_decode_frame_rejects_bad_symbol() {
        let mut out = encoded(b"x");
        out[10] = 0x3f;
        assert_eq!(decode_frame(&out), Err(AskError::InvalidSymbol(0x3f)));
    }

    #[test]
    fn test_decode_frame_rejects_out_of_range_count() {
        let mut out = encoded(b"x");
        let [hi, lo] = encode_byte(2);
        out[8] = hi;
        out[9] = lo;
        assert_eq!(decode_frame(&out), Err(AskError::FrameLengthInvalid(2)));
    }

    #[test]
    fn test_validate_count_bounds() {
        assert_eq!(validate_count(3), Err(AskError::FrameLengthInvalid(3)));
        assert_eq!(validate_count(4), Ok(4));
        assert_eq!(validate_count(30), Ok(30));
        assert_eq!(validate_count(31), Err(AskError::FrameLengthInvalid(31)));
    }

    #[test]
    fn test_decode_window_bit_order() {
        // 0x09 goes out as 0x0d then 0x25; the first symbol lands in the low bits
        let window = (0x25u16 << 6) | 0x0d;
        assert_eq!(decode_window(window), Ok(0x09));
        assert_eq!(
            decode_window((0x25u16 << 6) | 0x3f),
            Err(AskError::InvalidSymbol(0x3f))
        );
    }
}
