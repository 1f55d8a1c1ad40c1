//! 4b6b symbol encoding and decoding for ASK/OOK message framing.
//!
//! ASK/OOK receivers lose timing on long runs of 0s or 1s. Every nibble is
//! therefore sent as one of 16 six-bit symbols that each carry exactly three
//! ones. No symbol has a run longer than three, and no two adjacent symbols
//! form a run longer than four. That gives the receiver's PLL an edge to lock
//! onto every few bits and keeps the line DC balanced.
//!
//! Only 16 of the 64 possible 6-bit values are valid. [`decode_symbol`] reports
//! anything else as `None` so a corrupted symbol cannot masquerade as nibble 0.

/// The 16 valid symbols, indexed by the nibble they encode.
pub const SYMBOLS: [u8; 16] = [
    0xd, 0xe, 0x13, 0x15, 0x16, 0x19, 0x1a, 0x1c, 0x23, 0x25, 0x26, 0x29, 0x2a, 0x2c, 0x32, 0x34,
];

static REV_SYMBOLS: [Option<u8>; 64] = reverse_table();

const fn reverse_table() -> [Option<u8>; 64] {
    let mut table = [None; 64];
    let mut nibble = 0;
    while nibble < SYMBOLS.len() {
        table[SYMBOLS[nibble] as usize] = Some(nibble as u8);
        nibble += 1;
    }
    table
}

/// Maps the low 4 bits of `nibble` to its 6-bit symbol.
pub fn encode_nibble(nibble: u8) -> u8 {
    SYMBOLS[usize::from(nibble & 0x0f)]
}

/// Maps a 6-bit symbol back to its nibble.
///
/// Returns `None` if `symbol` is not in the table.
pub fn decode_symbol(symbol: u8) -> Option<u8> {
    REV_SYMBOLS.get(usize::from(symbol)).copied().flatten()
}

/// Encodes a byte as two symbols, high nibble first.
///
/// This is the order the symbols go out on the air.
pub fn encode_byte(byte: u8) -> [u8; 2] {
    [encode_nibble(byte >> 4), encode_nibble(byte)]
}

/// Recombines a symbol pair into a byte; `first` carries the high nibble.
///
/// Returns the offending symbol if either half is invalid.
pub fn decode_byte(first: u8, second: u8) -> Result<u8, u8> {
    let high = decode_symbol(first).ok_or(first)?;
    let low = decode_symbol(second).ok_or(second)?;
    Ok((high << 4) | low)
}
