//! Unit tests for the device property characteristic codecs

use super::characteristic::{Characteristic, CharacteristicFormat, CharacteristicValue};
use super::ids::DeviceProperty;
use super::sensor::{SensorFormat, SensorHeader};
use super::PropertyError;

fn round_trip(format: CharacteristicFormat, value: CharacteristicValue) {
    let encoded = Characteristic::new(format, value.clone()).encode().unwrap();
    let decoded = Characteristic::decode(format, &encoded, 0, encoded.len()).unwrap();
    assert_eq!(decoded.value(), &value, "{:?}", format);
}

#[test]
fn test_decimal_round_trips() {
    round_trip(CharacteristicFormat::Temperature8, CharacteristicValue::Decimal(22.5));
    round_trip(CharacteristicFormat::Temperature8, CharacteristicValue::Decimal(-10.0));
    round_trip(CharacteristicFormat::Temperature, CharacteristicValue::Decimal(23.45));
    round_trip(CharacteristicFormat::Temperature, CharacteristicValue::Decimal(-40.0));
    round_trip(CharacteristicFormat::Humidity, CharacteristicValue::Decimal(55.25));
    round_trip(CharacteristicFormat::Illuminance, CharacteristicValue::Decimal(450.75));
    round_trip(CharacteristicFormat::Percentage8, CharacteristicValue::Decimal(99.5));
    round_trip(CharacteristicFormat::ElectricCurrent, CharacteristicValue::Decimal(1.25));
    round_trip(CharacteristicFormat::Voltage, CharacteristicValue::Decimal(230.5));
    round_trip(CharacteristicFormat::Power, CharacteristicValue::Decimal(60.5));
    round_trip(CharacteristicFormat::Pressure, CharacteristicValue::Decimal(101325.0));
}

#[test]
fn test_integer_round_trips() {
    round_trip(CharacteristicFormat::Count16, CharacteristicValue::Integer(1234));
    round_trip(CharacteristicFormat::Count24, CharacteristicValue::Integer(0x012345));
    round_trip(CharacteristicFormat::Energy, CharacteristicValue::Integer(42));
    round_trip(CharacteristicFormat::TimeSecond16, CharacteristicValue::Integer(90));
    round_trip(CharacteristicFormat::TimeHour24, CharacteristicValue::Integer(8760));
    round_trip(CharacteristicFormat::TimeMillisecond24, CharacteristicValue::Integer(1500));
    round_trip(CharacteristicFormat::PerceivedLightness, CharacteristicValue::Integer(65535));
    round_trip(CharacteristicFormat::Co2Concentration, CharacteristicValue::Integer(400));
}

#[test]
fn test_other_round_trips() {
    round_trip(CharacteristicFormat::Boolean, CharacteristicValue::Boolean(true));
    round_trip(CharacteristicFormat::Boolean, CharacteristicValue::Boolean(false));
    round_trip(
        CharacteristicFormat::FixedString8,
        CharacteristicValue::Text("v1.2.3".to_string()),
    );
    round_trip(
        CharacteristicFormat::FixedString36,
        CharacteristicValue::Text("Acme Lighting".to_string()),
    );
    round_trip(
        CharacteristicFormat::Raw,
        CharacteristicValue::Raw(vec![0x01, 0x02, 0x03]),
    );
}

#[test]
fn test_unknown_patterns() {
    let cases: [(CharacteristicFormat, &[u8]); 7] = [
        (CharacteristicFormat::Temperature8, &[0x7F]),
        (CharacteristicFormat::Temperature, &[0x00, 0x80]),
        (CharacteristicFormat::Humidity, &[0xFF, 0xFF]),
        (CharacteristicFormat::Illuminance, &[0xFF, 0xFF, 0xFF]),
        (CharacteristicFormat::Percentage8, &[0xFF]),
        (CharacteristicFormat::Count16, &[0xFF, 0xFF]),
        (CharacteristicFormat::TimeHour24, &[0xFF, 0xFF, 0xFF]),
    ];

    for (format, pattern) in cases {
        let decoded = Characteristic::decode(format, pattern, 0, pattern.len()).unwrap();
        assert!(decoded.is_unknown(), "{:?}", format);

        // Absent values re-emit the reserved pattern
        let encoded = Characteristic::new(format, CharacteristicValue::Unknown)
            .encode()
            .unwrap();
        assert_eq!(encoded, pattern.to_vec(), "{:?}", format);
    }

    // Formats without a reserved pattern refuse to encode an absent value
    assert!(matches!(
        Characteristic::new(
            CharacteristicFormat::PerceivedLightness,
            CharacteristicValue::Unknown
        )
        .encode(),
        Err(PropertyError::UnknownNotEncodable { .. })
    ));
}

#[test]
fn test_decode_validation() {
    // Short buffer
    assert!(matches!(
        Characteristic::decode(CharacteristicFormat::Temperature, &[0x00], 0, 2),
        Err(PropertyError::OutOfBounds { .. })
    ));

    // Offset past the end
    assert!(Characteristic::decode(CharacteristicFormat::Percentage8, &[0x10], 1, 1).is_err());

    // Wrong declared length for a fixed shape
    assert!(matches!(
        Characteristic::decode(CharacteristicFormat::Humidity, &[0x00, 0x00, 0x00], 0, 3),
        Err(PropertyError::InvalidLength { .. })
    ));

    // Out-of-range values are rejected, never clamped
    assert!(matches!(
        Characteristic::decode(CharacteristicFormat::Humidity, &[0x11, 0x27], 0, 2),
        Err(PropertyError::ValueOutOfRange { .. })
    )); // 0x2711 = 10001 = 100.01%
    assert!(Characteristic::decode(CharacteristicFormat::Percentage8, &[0xC9], 0, 1).is_err());
    assert!(Characteristic::decode(CharacteristicFormat::Boolean, &[0x02], 0, 1).is_err());
}

#[test]
fn test_decode_at_offset() {
    let payload = [0xAA, 0xAA, 0x44, 0x09, 0xAA]; // 0x0944 = 2372 = 23.72%
    let decoded =
        Characteristic::decode(CharacteristicFormat::Humidity, &payload, 2, 2).unwrap();
    assert_eq!(decoded.value(), &CharacteristicValue::Decimal(23.72));
}

#[test]
fn test_property_table_dispatch() {
    let humidity = DeviceProperty(0x0076);
    assert_eq!(humidity.name(), "Present Ambient Relative Humidity");
    assert_eq!(humidity.format(), CharacteristicFormat::Humidity);

    let temperature = DeviceProperty(0x004F);
    assert_eq!(temperature.format(), CharacteristicFormat::Temperature8);
    let decoded = temperature.decode_value(&[0x2D], 0, 1).unwrap();
    assert_eq!(decoded.value(), &CharacteristicValue::Decimal(22.5));

    // Unregistered IDs fall back to the opaque codec
    let unmapped = DeviceProperty(0x7777);
    assert_eq!(unmapped.name(), "Unknown Device Property");
    assert_eq!(unmapped.format(), CharacteristicFormat::Raw);
    let decoded = unmapped.decode_value(&[0x01, 0x02], 0, 2).unwrap();
    assert_eq!(decoded.value(), &CharacteristicValue::Raw(vec![0x01, 0x02]));

    assert_eq!(
        DeviceProperty(0x004C).to_string(),
        "People Count (0x004C)"
    );
}

#[test]
fn test_sensor_header_format_a() {
    let header = SensorHeader {
        format: SensorFormat::A,
        property: DeviceProperty(0x004F),
        value_len: 1,
    };

    let encoded = header.encode().unwrap();
    assert_eq!(encoded.len(), 2);
    assert_eq!(encoded[0] & 0x01, 0); // format bit

    let parsed = SensorHeader::parse(&encoded, 0).unwrap();
    assert_eq!(parsed, header);

    // 11-bit property ID ceiling
    assert!(SensorHeader {
        format: SensorFormat::A,
        property: DeviceProperty(0x0800),
        value_len: 1,
    }
    .encode()
    .is_err());

    // Format A cannot express a zero-length value
    assert!(SensorHeader {
        format: SensorFormat::A,
        property: DeviceProperty(0x004F),
        value_len: 0,
    }
    .encode()
    .is_err());
}

#[test]
fn test_sensor_header_format_b() {
    for value_len in [0usize, 1, 4, 126] {
        let header = SensorHeader {
            format: SensorFormat::B,
            property: DeviceProperty(0x0942),
            value_len,
        };

        let encoded = header.encode().unwrap();
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded[0] & 0x01, 1); // format bit

        let parsed = SensorHeader::parse(&encoded, 0).unwrap();
        assert_eq!(parsed, header);
    }

    assert!(SensorHeader {
        format: SensorFormat::B,
        property: DeviceProperty(0x0942),
        value_len: 127,
    }
    .encode()
    .is_err());

    // Truncated header
    assert!(SensorHeader::parse(&[0x09], 0).is_err());
}
