//! Sensor marshalling header (MPID) codec
//!
//! Sensor status payloads carry each property value behind a marshalled
//! property ID header in one of two formats:
//!
//! - Format A (2 octets): 1-bit format flag (0), 4-bit length field
//!   holding `length - 1`, 11-bit property ID
//! - Format B (3 octets): 1-bit format flag (1), 7-bit length field
//!   (0x7F meaning zero length), 16-bit property ID
//!
//! All fields are packed least-significant-bit first, little-endian.

use super::ids::DeviceProperty;
use super::{PropertyError, PropertyResult};
use byteorder::{ByteOrder, LittleEndian};

/// Largest property ID Format A can carry (11 bits)
const FORMAT_A_MAX_PROPERTY: u16 = 0x07FF;

/// Largest value length Format A can carry
const FORMAT_A_MAX_LENGTH: usize = 16;

/// Largest value length Format B can carry (0x7F is the zero-length mark)
const FORMAT_B_MAX_LENGTH: usize = 126;

/// Format B length field value meaning "zero-length value"
const FORMAT_B_ZERO_LENGTH: u8 = 0x7F;

/// The two sensor marshalling header formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFormat {
    /// 2-octet header, 11-bit property ID, values of 1..=16 octets
    A,
    /// 3-octet header, 16-bit property ID, values of 0..=126 octets
    B,
}

impl SensorFormat {
    /// Header size in octets.
    pub fn header_len(&self) -> usize {
        match self {
            SensorFormat::A => 2,
            SensorFormat::B => 3,
        }
    }
}

/// A parsed sensor marshalling header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorHeader {
    /// Which of the two formats the header used
    pub format: SensorFormat,
    /// The marshalled property ID
    pub property: DeviceProperty,
    /// Length of the value that follows the header
    pub value_len: usize,
}

impl SensorHeader {
    /// Parse a header at `offset`.
    pub fn parse(data: &[u8], offset: usize) -> PropertyResult<Self> {
        let first = *data.get(offset).ok_or(PropertyError::OutOfBounds {
            needed: 1,
            offset,
            available: data.len(),
        })?;

        if first & 0x01 == 0 {
            // Format A
            if offset + 2 > data.len() {
                return Err(PropertyError::OutOfBounds {
                    needed: 2,
                    offset,
                    available: data.len(),
                });
            }
            let header = LittleEndian::read_u16(&data[offset..offset + 2]);
            let value_len = usize::from((header >> 1) as u8 & 0x0F) + 1;
            let property = DeviceProperty(header >> 5);
            Ok(SensorHeader {
                format: SensorFormat::A,
                property,
                value_len,
            })
        } else {
            // Format B
            if offset + 3 > data.len() {
                return Err(PropertyError::OutOfBounds {
                    needed: 3,
                    offset,
                    available: data.len(),
                });
            }
            let length_field = first >> 1;
            let value_len = if length_field == FORMAT_B_ZERO_LENGTH {
                0
            } else {
                usize::from(length_field)
            };
            let property = DeviceProperty(LittleEndian::read_u16(&data[offset + 1..offset + 3]));
            Ok(SensorHeader {
                format: SensorFormat::B,
                property,
                value_len,
            })
        }
    }

    /// Emit the wire form of the header.
    pub fn encode(&self) -> PropertyResult<Vec<u8>> {
        match self.format {
            SensorFormat::A => {
                if self.property.0 > FORMAT_A_MAX_PROPERTY
                    || self.value_len == 0
                    || self.value_len > FORMAT_A_MAX_LENGTH
                {
                    return Err(PropertyError::InvalidSensorHeader);
                }
                let header = (self.property.0 << 5)
                    | (((self.value_len - 1) as u16) << 1);
                let mut out = vec![0u8; 2];
                LittleEndian::write_u16(&mut out, header);
                Ok(out)
            }
            SensorFormat::B => {
                if self.value_len > FORMAT_B_MAX_LENGTH {
                    return Err(PropertyError::InvalidSensorHeader);
                }
                let length_field = if self.value_len == 0 {
                    FORMAT_B_ZERO_LENGTH
                } else {
                    self.value_len as u8
                };
                let mut out = vec![0u8; 3];
                out[0] = (length_field << 1) | 0x01;
                LittleEndian::write_u16(&mut out[1..3], self.property.0);
                Ok(out)
            }
        }
    }
}
