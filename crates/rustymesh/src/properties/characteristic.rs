//! Fixed-length binary value codecs for device property characteristics
//!
//! Each format fixes a byte length, an endianness (all multi-byte values
//! are little-endian on the wire), a scale factor and, where the
//! characteristic defines one, a reserved bit pattern that decodes to an
//! absent ("unknown") value instead of a number.

use super::{PropertyError, PropertyResult};
use byteorder::{ByteOrder, LittleEndian};

/// Raw pattern meaning "value is not known" for 2-octet unsigned fields
const UNKNOWN_U16: u16 = 0xFFFF;

/// Raw pattern meaning "value is not known" for 3-octet unsigned fields
const UNKNOWN_U24: u32 = 0x00FF_FFFF;

/// The binary shapes shared by the device property characteristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacteristicFormat {
    /// sint8, 0.5 degrees Celsius, unknown 0x7F
    Temperature8,
    /// sint16, 0.01 degrees Celsius, unknown 0x8000
    Temperature,
    /// uint16, 0.01 percent, unknown 0xFFFF, valid 0..=100 percent
    Humidity,
    /// uint24, 0.01 lux, unknown 0xFFFFFF
    Illuminance,
    /// uint8, 0.5 percent, unknown 0xFF, valid 0..=100 percent
    Percentage8,
    /// uint16 count, unknown 0xFFFF
    Count16,
    /// uint24 count, unknown 0xFFFFFF
    Count24,
    /// uint16, 0.01 ampere, unknown 0xFFFF
    ElectricCurrent,
    /// uint16, 1/64 volt, unknown 0xFFFF
    Voltage,
    /// uint24, 0.1 watt, unknown 0xFFFFFF
    Power,
    /// uint24, 1 kilowatt-hour, unknown 0xFFFFFF
    Energy,
    /// uint16 seconds, unknown 0xFFFF
    TimeSecond16,
    /// uint24 hours, unknown 0xFFFFFF
    TimeHour24,
    /// uint24 milliseconds, unknown 0xFFFFFF
    TimeMillisecond24,
    /// uint16, unitless lightness; no unknown encoding
    PerceivedLightness,
    /// uint16 parts per million, unknown 0xFFFF
    Co2Concentration,
    /// uint8, 0x00 or 0x01
    Boolean,
    /// uint32, 0.1 pascal; no unknown encoding
    Pressure,
    /// 8-octet UTF-8, NUL padded
    FixedString8,
    /// 16-octet UTF-8, NUL padded
    FixedString16,
    /// 24-octet UTF-8, NUL padded
    FixedString24,
    /// 36-octet UTF-8, NUL padded
    FixedString36,
    /// 64-octet UTF-8, NUL padded
    FixedString64,
    /// Opaque bytes for properties without a mapped characteristic
    Raw,
}

impl CharacteristicFormat {
    /// Fixed wire length of the format, or `None` for [`Raw`](Self::Raw).
    pub fn fixed_len(&self) -> Option<usize> {
        use CharacteristicFormat::*;
        match self {
            Temperature8 | Percentage8 | Boolean => Some(1),
            Temperature | Humidity | Count16 | ElectricCurrent | Voltage | TimeSecond16
            | PerceivedLightness | Co2Concentration => Some(2),
            Illuminance | Count24 | Power | Energy | TimeHour24 | TimeMillisecond24 => Some(3),
            Pressure => Some(4),
            FixedString8 => Some(8),
            FixedString16 => Some(16),
            FixedString24 => Some(24),
            FixedString36 => Some(36),
            FixedString64 => Some(64),
            Raw => None,
        }
    }
}

/// A decoded characteristic value
#[derive(Debug, Clone, PartialEq)]
pub enum CharacteristicValue {
    /// Scaled numeric value
    Decimal(f32),
    /// Unscaled integer value (counts, times, concentrations)
    Integer(u32),
    /// Single-bit state
    Boolean(bool),
    /// Fixed-length string, NUL padding stripped
    Text(String),
    /// Opaque bytes
    Raw(Vec<u8>),
    /// The characteristic's reserved "value is not known" pattern
    Unknown,
}

/// A characteristic value together with the shape it encodes as
#[derive(Debug, Clone, PartialEq)]
pub struct Characteristic {
    format: CharacteristicFormat,
    value: CharacteristicValue,
}

impl Characteristic {
    /// Pair a value with a format. The pairing is checked at encode time.
    pub fn new(format: CharacteristicFormat, value: CharacteristicValue) -> Self {
        Characteristic { format, value }
    }

    /// The binary shape this value encodes as.
    pub fn format(&self) -> CharacteristicFormat {
        self.format
    }

    /// The decoded value.
    pub fn value(&self) -> &CharacteristicValue {
        &self.value
    }

    /// Whether the wire pattern was the reserved "unknown" encoding.
    pub fn is_unknown(&self) -> bool {
        self.value == CharacteristicValue::Unknown
    }

    /// Decode `length` bytes at `offset` as the given format.
    pub fn decode(
        format: CharacteristicFormat,
        data: &[u8],
        offset: usize,
        length: usize,
    ) -> PropertyResult<Self> {
        if let Some(fixed) = format.fixed_len() {
            if length != fixed {
                return Err(PropertyError::InvalidLength { format, length });
            }
        }

        let end = offset
            .checked_add(length)
            .filter(|&end| end <= data.len())
            .ok_or(PropertyError::OutOfBounds {
                needed: length,
                offset,
                available: data.len(),
            })?;
        let field = &data[offset..end];

        let value = decode_value(format, field)?;
        Ok(Characteristic { format, value })
    }

    /// Encode back to the wire form, re-emitting the reserved pattern for
    /// an unknown value.
    pub fn encode(&self) -> PropertyResult<Vec<u8>> {
        encode_value(self.format, &self.value)
    }
}

fn decode_value(format: CharacteristicFormat, field: &[u8]) -> PropertyResult<CharacteristicValue> {
    use CharacteristicFormat::*;

    let value = match format {
        Temperature8 => match field[0] as i8 {
            0x7F => CharacteristicValue::Unknown,
            raw => CharacteristicValue::Decimal(f32::from(raw) / 2.0),
        },
        Temperature => match LittleEndian::read_i16(field) {
            raw if raw as u16 == 0x8000 => CharacteristicValue::Unknown,
            raw if raw < -27315 => {
                return Err(PropertyError::ValueOutOfRange {
                    format,
                    value: f64::from(raw) / 100.0,
                })
            }
            raw => CharacteristicValue::Decimal(f32::from(raw) / 100.0),
        },
        Humidity => match LittleEndian::read_u16(field) {
            UNKNOWN_U16 => CharacteristicValue::Unknown,
            raw if raw > 10_000 => {
                return Err(PropertyError::ValueOutOfRange {
                    format,
                    value: f64::from(raw) / 100.0,
                })
            }
            raw => CharacteristicValue::Decimal(f32::from(raw) / 100.0),
        },
        Illuminance => match LittleEndian::read_u24(field) {
            UNKNOWN_U24 => CharacteristicValue::Unknown,
            raw => CharacteristicValue::Decimal(raw as f32 / 100.0),
        },
        Percentage8 => match field[0] {
            0xFF => CharacteristicValue::Unknown,
            raw if raw > 200 => {
                return Err(PropertyError::ValueOutOfRange {
                    format,
                    value: f64::from(raw) / 2.0,
                })
            }
            raw => CharacteristicValue::Decimal(f32::from(raw) / 2.0),
        },
        Count16 | TimeSecond16 | Co2Concentration => match LittleEndian::read_u16(field) {
            UNKNOWN_U16 => CharacteristicValue::Unknown,
            raw => CharacteristicValue::Integer(u32::from(raw)),
        },
        Count24 | Energy | TimeHour24 | TimeMillisecond24 => match LittleEndian::read_u24(field) {
            UNKNOWN_U24 => CharacteristicValue::Unknown,
            raw => CharacteristicValue::Integer(raw),
        },
        ElectricCurrent => match LittleEndian::read_u16(field) {
            UNKNOWN_U16 => CharacteristicValue::Unknown,
            raw => CharacteristicValue::Decimal(f32::from(raw) / 100.0),
        },
        Voltage => match LittleEndian::read_u16(field) {
            UNKNOWN_U16 => CharacteristicValue::Unknown,
            raw => CharacteristicValue::Decimal(f32::from(raw) / 64.0),
        },
        Power => match LittleEndian::read_u24(field) {
            UNKNOWN_U24 => CharacteristicValue::Unknown,
            raw => CharacteristicValue::Decimal(raw as f32 / 10.0),
        },
        PerceivedLightness => CharacteristicValue::Integer(u32::from(LittleEndian::read_u16(field))),
        Boolean => match field[0] {
            0x00 => CharacteristicValue::Boolean(false),
            0x01 => CharacteristicValue::Boolean(true),
            raw => {
                return Err(PropertyError::ValueOutOfRange {
                    format,
                    value: f64::from(raw),
                })
            }
        },
        Pressure => CharacteristicValue::Decimal(LittleEndian::read_u32(field) as f32 / 10.0),
        FixedString8 | FixedString16 | FixedString24 | FixedString36 | FixedString64 => {
            let trimmed: Vec<u8> = field.iter().copied().take_while(|&b| b != 0).collect();
            CharacteristicValue::Text(String::from_utf8_lossy(&trimmed).into_owned())
        }
        Raw => CharacteristicValue::Raw(field.to_vec()),
    };

    Ok(value)
}

fn encode_value(
    format: CharacteristicFormat,
    value: &CharacteristicValue,
) -> PropertyResult<Vec<u8>> {
    use CharacteristicFormat::*;

    if let CharacteristicValue::Unknown = value {
        return encode_unknown(format);
    }

    let out = match (format, value) {
        (Temperature8, CharacteristicValue::Decimal(v)) => {
            let raw = scaled_to_raw(format, *v, 2.0, i8::MIN as f64, 0x7E as f64)? as i8;
            vec![raw as u8]
        }
        (Temperature, CharacteristicValue::Decimal(v)) => {
            let raw = scaled_to_raw(format, *v, 100.0, -27315.0, i16::MAX as f64)? as i16;
            le16(raw as u16)
        }
        (Humidity, CharacteristicValue::Decimal(v)) => {
            let raw = scaled_to_raw(format, *v, 100.0, 0.0, 10_000.0)? as u16;
            le16(raw)
        }
        (Illuminance, CharacteristicValue::Decimal(v)) => {
            let raw = scaled_to_raw(format, *v, 100.0, 0.0, f64::from(UNKNOWN_U24 - 1))? as u32;
            le24(raw)
        }
        (Percentage8, CharacteristicValue::Decimal(v)) => {
            let raw = scaled_to_raw(format, *v, 2.0, 0.0, 200.0)? as u8;
            vec![raw]
        }
        (Count16 | TimeSecond16 | Co2Concentration, CharacteristicValue::Integer(v)) => {
            if *v >= u32::from(UNKNOWN_U16) {
                return Err(PropertyError::ValueOutOfRange {
                    format,
                    value: f64::from(*v),
                });
            }
            le16(*v as u16)
        }
        (
            Count24 | Energy | TimeHour24 | TimeMillisecond24,
            CharacteristicValue::Integer(v),
        ) => {
            if *v >= UNKNOWN_U24 {
                return Err(PropertyError::ValueOutOfRange {
                    format,
                    value: f64::from(*v),
                });
            }
            le24(*v)
        }
        (ElectricCurrent, CharacteristicValue::Decimal(v)) => {
            let raw = scaled_to_raw(format, *v, 100.0, 0.0, f64::from(UNKNOWN_U16 - 1))? as u16;
            le16(raw)
        }
        (Voltage, CharacteristicValue::Decimal(v)) => {
            let raw = scaled_to_raw(format, *v, 64.0, 0.0, f64::from(UNKNOWN_U16 - 1))? as u16;
            le16(raw)
        }
        (Power, CharacteristicValue::Decimal(v)) => {
            let raw = scaled_to_raw(format, *v, 10.0, 0.0, f64::from(UNKNOWN_U24 - 1))? as u32;
            le24(raw)
        }
        (PerceivedLightness, CharacteristicValue::Integer(v)) => {
            if *v > u32::from(u16::MAX) {
                return Err(PropertyError::ValueOutOfRange {
                    format,
                    value: f64::from(*v),
                });
            }
            le16(*v as u16)
        }
        (Boolean, CharacteristicValue::Boolean(v)) => vec![u8::from(*v)],
        (Pressure, CharacteristicValue::Decimal(v)) => {
            let raw = scaled_to_raw(format, *v, 10.0, 0.0, f64::from(u32::MAX))? as u32;
            let mut out = vec![0u8; 4];
            LittleEndian::write_u32(&mut out, raw);
            out
        }
        (
            FixedString8 | FixedString16 | FixedString24 | FixedString36 | FixedString64,
            CharacteristicValue::Text(text),
        ) => {
            let len = format.fixed_len().unwrap_or(0);
            if text.len() > len {
                return Err(PropertyError::InvalidLength {
                    format,
                    length: text.len(),
                });
            }
            let mut out = vec![0u8; len];
            out[..text.len()].copy_from_slice(text.as_bytes());
            out
        }
        (Raw, CharacteristicValue::Raw(bytes)) => bytes.clone(),
        _ => return Err(PropertyError::ValueKindMismatch { format }),
    };

    Ok(out)
}

fn encode_unknown(format: CharacteristicFormat) -> PropertyResult<Vec<u8>> {
    use CharacteristicFormat::*;

    match format {
        Temperature8 => Ok(vec![0x7F]),
        Percentage8 => Ok(vec![0xFF]),
        Temperature => Ok(le16(0x8000)),
        Humidity | Count16 | ElectricCurrent | Voltage | TimeSecond16 | Co2Concentration => {
            Ok(le16(UNKNOWN_U16))
        }
        Illuminance | Count24 | Power | Energy | TimeHour24 | TimeMillisecond24 => {
            Ok(le24(UNKNOWN_U24))
        }
        _ => Err(PropertyError::UnknownNotEncodable { format }),
    }
}

fn scaled_to_raw(
    format: CharacteristicFormat,
    value: f32,
    scale: f64,
    min_raw: f64,
    max_raw: f64,
) -> PropertyResult<i64> {
    let raw = (f64::from(value) * scale).round();
    if raw < min_raw || raw > max_raw {
        return Err(PropertyError::ValueOutOfRange {
            format,
            value: f64::from(value),
        });
    }
    Ok(raw as i64)
}

fn le16(value: u16) -> Vec<u8> {
    let mut out = vec![0u8; 2];
    LittleEndian::write_u16(&mut out, value);
    out
}

fn le24(value: u32) -> Vec<u8> {
    let mut out = vec![0u8; 3];
    LittleEndian::write_u24(&mut out, value);
    out
}
