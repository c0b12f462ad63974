//! Device property characteristic codecs
//!
//! Mesh device properties reuse a small set of fixed-length binary shapes
//! across well over a hundred semantic properties. This module implements
//! one codec per binary shape, a pure data table mapping property IDs to
//! shapes and names, and the sensor marshalling header (Format A/B) that
//! carries property values on the wire.

mod characteristic;
mod ids;
mod sensor;

#[cfg(test)]
mod tests;

pub use self::characteristic::{Characteristic, CharacteristicFormat, CharacteristicValue};
pub use self::ids::DeviceProperty;
pub use self::sensor::{SensorFormat, SensorHeader};

use thiserror::Error;

/// Errors produced by the device property codecs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("Buffer too short: need {needed} bytes at offset {offset}, have {available}")]
    OutOfBounds {
        needed: usize,
        offset: usize,
        available: usize,
    },

    #[error("Invalid length {length} for {format:?}")]
    InvalidLength {
        format: CharacteristicFormat,
        length: usize,
    },

    #[error("Value out of range for {format:?}: {value}")]
    ValueOutOfRange {
        format: CharacteristicFormat,
        value: f64,
    },

    #[error("{format:?} has no reserved \"unknown\" encoding")]
    UnknownNotEncodable { format: CharacteristicFormat },

    #[error("Value kind does not match {format:?}")]
    ValueKindMismatch { format: CharacteristicFormat },

    #[error("Invalid sensor marshalling header")]
    InvalidSensorHeader,
}

/// Result type for device property operations
pub type PropertyResult<T> = Result<T, PropertyError>;
