//! Byte-order helpers for the modem's wire formats.
//!
//! The register protocol carries 16-bit values big-endian; the frame
//! envelope's length field is little-endian. Both are thin, named wrappers
//! around the standard conversions so call sites read as "this field is
//! big/little endian on the wire" rather than a bare `to_be_bytes`.

/// Decode a big-endian 16-bit value (register reads).
#[inline]
pub const fn be16(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Encode a 16-bit value big-endian (register writes).
#[inline]
pub const fn to_be16(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Decode a little-endian 16-bit value (frame length field).
#[inline]
pub const fn le16(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// Encode a 16-bit value little-endian (frame length field).
#[inline]
pub const fn to_le16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}
