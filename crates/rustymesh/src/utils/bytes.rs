//! Hex rendering, integer packing and key-index padding helpers

use super::{CodecError, CodecResult, MAX_KEY_INDEX, MAX_TTL, USE_DEFAULT_TTL};
use byteorder::{BigEndian, ByteOrder};

/// Render a byte slice as uppercase hex, optionally prefixed with `0x`.
///
/// An empty slice renders as an empty string; this is not an error.
pub fn bytes_to_hex(bytes: &[u8], add_prefix: bool) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let body = hex::encode_upper(bytes);
    if add_prefix {
        format!("0x{}", body)
    } else {
        body
    }
}

/// Render a sub-range of a byte slice as uppercase hex.
pub fn bytes_to_hex_range(
    bytes: &[u8],
    start: usize,
    length: usize,
    add_prefix: bool,
) -> CodecResult<String> {
    let end = start
        .checked_add(length)
        .filter(|&end| end <= bytes.len())
        .ok_or(CodecError::OutOfBounds {
            needed: length,
            offset: start,
            available: bytes.len(),
        })?;

    Ok(bytes_to_hex(&bytes[start..end], add_prefix))
}

/// Parse a hex string (with or without a `0x`/`0X` prefix) into bytes.
///
/// Odd-length strings and non-hex characters are rejected.
pub fn hex_to_bytes(hex: &str) -> CodecResult<Vec<u8>> {
    let stripped = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex);

    hex::decode(stripped).map_err(|_| CodecError::InvalidHex(hex.to_string()))
}

/// Read an unsigned 16-bit value at `offset` with the given byte order.
pub fn read_u16<B: ByteOrder>(data: &[u8], offset: usize) -> CodecResult<u16> {
    check_bounds(data, offset, 2)?;
    Ok(B::read_u16(&data[offset..offset + 2]))
}

/// Read an unsigned 24-bit value at `offset` with the given byte order.
pub fn read_u24<B: ByteOrder>(data: &[u8], offset: usize) -> CodecResult<u32> {
    check_bounds(data, offset, 3)?;
    Ok(B::read_u24(&data[offset..offset + 3]))
}

/// Combine two octets into an unsigned 16-bit value (low octet first).
pub fn unsigned_bytes_to_u16(low: u8, high: u8) -> u16 {
    u16::from(low) | (u16::from(high) << 8)
}

/// Pack an unsigned 16-bit value with the given byte order.
pub fn write_u16<B: ByteOrder>(value: u16) -> [u8; 2] {
    let mut out = [0u8; 2];
    B::write_u16(&mut out, value);
    out
}

/// Pack an unsigned 24-bit value with the given byte order.
pub fn write_u24<B: ByteOrder>(value: u32) -> [u8; 3] {
    let mut out = [0u8; 3];
    B::write_u24(&mut out, value & 0x00FF_FFFF);
    out
}

/// Pad a key index to its 2-octet wire form.
///
/// Key indices are a 12-bit space; the upper four bits of the wire field
/// are always zero.
pub fn add_key_index_padding(key_index: u16) -> [u8; 2] {
    write_u16::<BigEndian>(key_index & MAX_KEY_INDEX)
}

/// Recover a key index from its 2-octet wire form.
pub fn remove_key_index_padding(bytes: &[u8]) -> CodecResult<u16> {
    if bytes.len() != 2 {
        return Err(CodecError::InvalidLength(bytes.len()));
    }

    Ok(BigEndian::read_u16(bytes) & MAX_KEY_INDEX)
}

/// Whether a 2-octet field holds a well-formed key index (12-bit space).
pub fn is_valid_key_index(bytes: &[u8]) -> bool {
    bytes.len() == 2 && BigEndian::read_u16(bytes) <= MAX_KEY_INDEX
}

/// Whether a TTL value is valid for sending (0x00..=0x7F).
///
/// 0xFF is the "use default TTL" sentinel and is not itself a valid TTL.
pub fn is_valid_ttl(ttl: u8) -> bool {
    ttl <= MAX_TTL
}

/// Whether a TTL field requests the node's default TTL.
pub fn is_default_ttl(ttl: u8) -> bool {
    ttl == USE_DEFAULT_TTL
}

fn check_bounds(data: &[u8], offset: usize, needed: usize) -> CodecResult<()> {
    if offset.checked_add(needed).map_or(true, |end| end > data.len()) {
        return Err(CodecError::OutOfBounds {
            needed,
            offset,
            available: data.len(),
        });
    }
    Ok(())
}
