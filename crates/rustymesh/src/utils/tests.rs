//! Unit tests for the binary codec utilities

use super::*;
use byteorder::{BigEndian, LittleEndian};

#[test]
fn test_bytes_to_hex() {
    assert_eq!(bytes_to_hex(&[0xDE, 0xAD, 0xBE, 0xEF], false), "DEADBEEF");
    assert_eq!(bytes_to_hex(&[0xDE, 0xAD, 0xBE, 0xEF], true), "0xDEADBEEF");
    assert_eq!(bytes_to_hex(&[], false), "");
    assert_eq!(bytes_to_hex(&[], true), "");
    assert_eq!(bytes_to_hex(&[0x00, 0x0F], false), "000F");
}

#[test]
fn test_bytes_to_hex_range() {
    let data = [0x11, 0x22, 0x33, 0x44];

    assert_eq!(bytes_to_hex_range(&data, 1, 2, false).unwrap(), "2233");
    assert_eq!(bytes_to_hex_range(&data, 0, 4, true).unwrap(), "0x11223344");

    // Range past the end of the buffer
    assert!(bytes_to_hex_range(&data, 3, 2, false).is_err());
    assert!(bytes_to_hex_range(&data, 5, 1, false).is_err());
}

#[test]
fn test_hex_to_bytes() {
    assert_eq!(hex_to_bytes("DEADBEEF").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(hex_to_bytes("deadbeef").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(hex_to_bytes("0xDEADBEEF").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(hex_to_bytes("").unwrap(), Vec::<u8>::new());

    // Odd length and non-hex characters are rejected
    assert!(hex_to_bytes("ABC").is_err());
    assert!(hex_to_bytes("GG").is_err());
}

#[test]
fn test_hex_round_trip() {
    let samples: [&[u8]; 4] = [&[], &[0x00], &[0xFF, 0x00, 0x7F], &[1, 2, 3, 4, 5, 6, 7, 8]];

    for sample in samples {
        let rendered = bytes_to_hex(sample, false);
        assert_eq!(hex_to_bytes(&rendered).unwrap(), sample.to_vec());
    }
}

#[test]
fn test_integer_packing() {
    let data = [0x12, 0x34, 0x56];

    assert_eq!(read_u16::<BigEndian>(&data, 0).unwrap(), 0x1234);
    assert_eq!(read_u16::<LittleEndian>(&data, 0).unwrap(), 0x3412);
    assert_eq!(read_u16::<BigEndian>(&data, 1).unwrap(), 0x3456);
    assert_eq!(read_u24::<BigEndian>(&data, 0).unwrap(), 0x123456);
    assert_eq!(read_u24::<LittleEndian>(&data, 0).unwrap(), 0x563412);

    assert!(read_u16::<BigEndian>(&data, 2).is_err());
    assert!(read_u24::<BigEndian>(&data, 1).is_err());

    assert_eq!(write_u16::<BigEndian>(0x1234), [0x12, 0x34]);
    assert_eq!(write_u16::<LittleEndian>(0x1234), [0x34, 0x12]);
    assert_eq!(write_u24::<BigEndian>(0x123456), [0x12, 0x34, 0x56]);
    assert_eq!(write_u24::<LittleEndian>(0x123456), [0x56, 0x34, 0x12]);

    assert_eq!(unsigned_bytes_to_u16(0x34, 0x12), 0x1234);
}

#[test]
fn test_key_index_padding() {
    assert_eq!(add_key_index_padding(0x0000), [0x00, 0x00]);
    assert_eq!(add_key_index_padding(0x0123), [0x01, 0x23]);
    assert_eq!(add_key_index_padding(0x0FFF), [0x0F, 0xFF]);

    // Bits above the 12-bit space are masked off
    assert_eq!(add_key_index_padding(0xFFFF), [0x0F, 0xFF]);

    for key_index in [0u16, 1, 0x0123, 0x0FFF, 0x1234, 0xFFFF] {
        let padded = add_key_index_padding(key_index);
        assert_eq!(
            remove_key_index_padding(&padded).unwrap(),
            key_index & MAX_KEY_INDEX
        );
    }

    assert!(remove_key_index_padding(&[0x01]).is_err());
    assert!(remove_key_index_padding(&[0x01, 0x02, 0x03]).is_err());

    assert!(is_valid_key_index(&[0x0F, 0xFF]));
    assert!(!is_valid_key_index(&[0x10, 0x00]));
    assert!(!is_valid_key_index(&[0x00]));
}

#[test]
fn test_ttl_validation() {
    assert!(is_valid_ttl(0x00));
    assert!(is_valid_ttl(0x05));
    assert!(is_valid_ttl(0x7F));
    assert!(!is_valid_ttl(0x80));
    assert!(!is_valid_ttl(0xFF));

    assert!(is_default_ttl(0xFF));
    assert!(!is_default_ttl(0x7F));
}

#[test]
fn test_opcode_octet_count() {
    assert_eq!(opcode_octet_count(0x00), 1);
    assert_eq!(opcode_octet_count(0x7F), 1);
    assert_eq!(opcode_octet_count(0x80), 2);
    assert_eq!(opcode_octet_count(0xBF), 2);
    assert_eq!(opcode_octet_count(0xC0), 3);
    assert_eq!(opcode_octet_count(0xFF), 3);
}

#[test]
fn test_opcode_round_trip() {
    // One valid opcode of each encoded length
    for opcode in [0x00u32, 0x04, 0x7F, 0x8001, 0x8243, 0xBFFF, 0xC00059, 0xFFFFFF] {
        let encoded = encode_opcode(opcode).unwrap();
        let count = opcode_octet_count(encoded[0]);
        assert_eq!(encoded.len(), count);
        assert_eq!(get_opcode(&encoded, count).unwrap(), opcode);
    }
}

#[test]
fn test_opcode_rejects_malformed_values() {
    // Two-octet value without the 0b10 tag
    assert!(encode_opcode(0xC001).is_err());
    // Three-octet value without the 0b11 tag
    assert!(encode_opcode(0x010000).is_err());
    assert!(encode_opcode(0xBFFFFF).is_err());
    // Wider than three octets
    assert!(encode_opcode(0x01000000).is_err());

    assert!(get_opcode(&[0x80], 2).is_err());
    assert!(get_opcode(&[], 1).is_err());
}

#[test]
fn test_payload_ceiling() {
    assert!(is_valid_parameters(&[]));
    assert!(is_valid_parameters(&vec![0u8; MAX_ACCESS_PAYLOAD_LENGTH]));
    assert!(!is_valid_parameters(&vec![0u8; MAX_ACCESS_PAYLOAD_LENGTH + 1]));
}
