//! Variable-length access-layer opcode codec
//!
//! Access-layer opcodes occupy one, two or three octets, distinguished by
//! the top bits of the first octet:
//!
//! - `0b0xxxxxxx` - single octet SIG opcode
//! - `0b10xxxxxx` - two-octet SIG opcode
//! - `0b11xxxxxx` - three-octet vendor opcode carrying a 16-bit company ID

use super::{CodecError, CodecResult, MAX_ACCESS_PAYLOAD_LENGTH};

/// Mask selecting the two tag bits of the first opcode octet
const OPCODE_TAG_MASK: u8 = 0xC0;

/// Tag value marking a three-octet vendor opcode
const VENDOR_OPCODE_TAG: u8 = 0xC0;

/// Tag bit marking a multi-octet opcode
const MULTI_OCTET_BIT: u8 = 0x80;

/// Whether an opcode value fits the 1-3 octet encoding space.
pub fn is_valid_opcode(opcode: u32) -> bool {
    opcode == opcode & 0x00FF_FFFF
}

/// Whether an access payload fits under the access-layer ceiling.
pub fn is_valid_parameters(parameters: &[u8]) -> bool {
    parameters.len() <= MAX_ACCESS_PAYLOAD_LENGTH
}

/// Number of octets an opcode occupies, judged from its first octet.
pub fn opcode_octet_count(first_octet: u8) -> usize {
    if first_octet & OPCODE_TAG_MASK == VENDOR_OPCODE_TAG {
        3
    } else if first_octet & MULTI_OCTET_BIT == MULTI_OCTET_BIT {
        2
    } else {
        1
    }
}

/// Extract an opcode from the start of an access payload.
///
/// `octet_count` must match the tag bits of the first octet; it is the
/// value [`opcode_octet_count`] reports for that octet.
pub fn get_opcode(payload: &[u8], octet_count: usize) -> CodecResult<u32> {
    if payload.len() < octet_count {
        return Err(CodecError::OutOfBounds {
            needed: octet_count,
            offset: 0,
            available: payload.len(),
        });
    }

    match octet_count {
        1 => Ok(u32::from(payload[0])),
        2 => Ok((u32::from(payload[0]) << 8) | u32::from(payload[1])),
        3 => Ok((u32::from(payload[0]) << 16) | (u32::from(payload[1]) << 8) | u32::from(payload[2])),
        n => Err(CodecError::InvalidOpcodeLength(n)),
    }
}

/// Encode an opcode into its 1-3 octet wire form.
///
/// The encoding length is implied by the opcode value itself: values up to
/// 0x7F take one octet, values whose top octet carries the `0b10` tag take
/// two, and vendor opcodes (`0b11` tag) take three. Values that do not
/// match any of the three shapes are rejected.
pub fn encode_opcode(opcode: u32) -> CodecResult<Vec<u8>> {
    if !is_valid_opcode(opcode) {
        return Err(CodecError::InvalidOpcode(opcode));
    }

    if opcode <= 0x7F {
        return Ok(vec![opcode as u8]);
    }

    if opcode <= 0xFFFF {
        let first = (opcode >> 8) as u8;
        if first & OPCODE_TAG_MASK != MULTI_OCTET_BIT {
            return Err(CodecError::InvalidOpcode(opcode));
        }
        return Ok(vec![first, opcode as u8]);
    }

    let first = (opcode >> 16) as u8;
    if first & OPCODE_TAG_MASK != VENDOR_OPCODE_TAG {
        return Err(CodecError::InvalidOpcode(opcode));
    }

    Ok(vec![first, (opcode >> 8) as u8, opcode as u8])
}
