//! Binary codec utilities shared across the mesh layers
//!
//! This module provides the stateless helpers the rest of the library is
//! built on: hex rendering/parsing, 16/24-bit integer packing with explicit
//! byte order, key-index padding, TTL validation, and the variable-length
//! access-layer opcode codec.

mod bytes;
mod opcode;

#[cfg(test)]
mod tests;

pub use self::bytes::*;
pub use self::opcode::*;

use thiserror::Error;

/// Errors produced by the binary codec utilities
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Buffer too short: need {needed} bytes at offset {offset}, have {available}")]
    OutOfBounds {
        needed: usize,
        offset: usize,
        available: usize,
    },

    #[error("Invalid opcode 0x{0:06X}")]
    InvalidOpcode(u32),

    #[error("Invalid opcode length: {0}")]
    InvalidOpcodeLength(usize),

    #[error("Access payload too long: {0} octets (maximum {max})", max = MAX_ACCESS_PAYLOAD_LENGTH)]
    PayloadTooLong(usize),

    #[error("Invalid field length: {0}")]
    InvalidLength(usize),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Maximum length of an access-layer payload in octets
pub const MAX_ACCESS_PAYLOAD_LENGTH: usize = 379;

/// Lowest valid TTL value
pub const MIN_TTL: u8 = 0x00;

/// Highest valid TTL value
pub const MAX_TTL: u8 = 0x7F;

/// Sentinel meaning "use the node's default TTL", not a TTL value itself
pub const USE_DEFAULT_TTL: u8 = 0xFF;

/// Key indices occupy a 12-bit space even though the wire field is 16 bits
pub const MAX_KEY_INDEX: u16 = 0x0FFF;
