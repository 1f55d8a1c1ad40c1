//! CRC-16/CCITT as used for the frame check sequence.
//!
//! This is the bit-reflected form of polynomial `0x1021` seeded with `0xffff`,
//! the same update step avr-libc ships as `_crc_ccitt_update`. The transmitter
//! appends the ones' complement of the running CRC, low byte first, so running
//! the CRC over a whole intact frame always lands on [`CRC_CCITT_RESIDUE`].

/// Seed for every frame CRC.
pub const CRC_CCITT_INIT: u16 = 0xffff;

/// CRC of an intact frame, including its complemented trailer.
pub const CRC_CCITT_RESIDUE: u16 = 0xf0b8;

/// Folds one byte into a running CRC.
pub fn crc_ccitt_update(crc: u16, data: u8) -> u16 {
    let mut d = data ^ lo8(crc);
    d ^= d << 4;
    let d = u16::from(d);

    ((d << 8) | hi8(crc)) ^ (d >> 4) ^ (d << 3)
}

/// CRC over a whole buffer, starting from [`CRC_CCITT_INIT`].
pub fn crc_ccitt(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(CRC_CCITT_INIT, |crc, &b| crc_ccitt_update(crc, b))
}

fn lo8(x: u16) -> u8 {
    (x & 0xff) as u8
}

fn hi8(x: u16) -> u16 {
    x >> 8
}
