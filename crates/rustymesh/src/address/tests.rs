//! Unit tests for mesh address classification and validation

use super::*;

#[test]
fn test_classification_is_exhaustive_and_disjoint() {
    // classify() returns exactly one class for every value by
    // construction; count the classes to pin the range boundaries.
    let mut unassigned = 0u32;
    let mut unicast = 0u32;
    let mut virtual_ = 0u32;
    let mut group = 0u32;
    let mut reserved = 0u32;

    for address in 0u16..=0xFFFF {
        match AddressType::classify(address) {
            AddressType::Unassigned => unassigned += 1,
            AddressType::Unicast => unicast += 1,
            AddressType::Virtual => virtual_ += 1,
            AddressType::Group => group += 1,
            AddressType::Reserved => reserved += 1,
        }
    }

    assert_eq!(unassigned, 1);
    assert_eq!(unicast, 0x7FFF);
    assert_eq!(virtual_, 0x4000);
    assert_eq!(group, 0x3F00 + 4); // 0xC000..=0xFEFF plus four fixed groups
    assert_eq!(reserved, 0xFC);
    assert_eq!(
        unassigned + unicast + virtual_ + group + reserved,
        0x10000
    );
}

#[test]
fn test_classification_boundaries() {
    assert_eq!(AddressType::classify(0x0000), AddressType::Unassigned);
    assert_eq!(AddressType::classify(0x0001), AddressType::Unicast);
    assert_eq!(AddressType::classify(0x7FFF), AddressType::Unicast);
    assert_eq!(AddressType::classify(0x8000), AddressType::Virtual);
    assert_eq!(AddressType::classify(0xBFFF), AddressType::Virtual);
    assert_eq!(AddressType::classify(0xC000), AddressType::Group);
    assert_eq!(AddressType::classify(0xFEFF), AddressType::Group);
    assert_eq!(AddressType::classify(0xFF00), AddressType::Reserved);
    assert_eq!(AddressType::classify(0xFFFB), AddressType::Reserved);
    assert_eq!(AddressType::classify(ALL_PROXIES_ADDRESS), AddressType::Group);
    assert_eq!(AddressType::classify(ALL_FRIENDS_ADDRESS), AddressType::Group);
    assert_eq!(AddressType::classify(ALL_RELAYS_ADDRESS), AddressType::Group);
    assert_eq!(AddressType::classify(ALL_NODES_ADDRESS), AddressType::Group);
}

#[test]
fn test_unicast_validation() {
    assert!(!is_valid_unicast_address(0x0000));
    assert!(is_valid_unicast_address(0x0001));
    assert!(is_valid_unicast_address(0x7FFF));
    assert!(!is_valid_unicast_address(0x8000));

    assert!(is_valid_unicast_range(0x0001, 1));
    assert!(is_valid_unicast_range(0x7FFE, 2));
    assert!(!is_valid_unicast_range(0x7FFF, 2)); // runs into virtual space
    assert!(!is_valid_unicast_range(0x0001, 0)); // nodes have at least one element
    assert!(!is_valid_unicast_range(0x0000, 1));
}

#[test]
fn test_group_validation() {
    assert!(is_valid_group_address(0xC000));
    assert!(is_valid_group_address(0xFEFF));
    assert!(is_valid_group_address(ALL_NODES_ADDRESS));
    assert!(!is_valid_group_address(0xFF00)); // reserved, not silently accepted
    assert!(!is_valid_group_address(0xFFFB));
    assert!(!is_valid_group_address(0xBFFF));

    assert!(is_fixed_group_address(ALL_PROXIES_ADDRESS));
    assert!(is_fixed_group_address(ALL_NODES_ADDRESS));
    assert!(!is_fixed_group_address(0xFEFF));
}

#[test]
fn test_subscription_validation() {
    assert!(is_valid_subscription_address(0x0001));
    assert!(is_valid_subscription_address(0x8000));
    assert!(is_valid_subscription_address(0xC000));
    assert!(!is_valid_subscription_address(0x0000));
    assert!(!is_valid_subscription_address(0xFF42));
}

#[test]
fn test_mesh_address_display() {
    let address = MeshAddress::new(0x0005);
    assert_eq!(address.value(), 0x0005);
    assert_eq!(address.address_type(), AddressType::Unicast);
    assert_eq!(address.to_bytes(), [0x00, 0x05]);
    assert_eq!(address.to_string(), "0x0005 (Unicast)");
}

#[test]
fn test_address_field_length() {
    assert!(is_address_in_range(&[0x00, 0x01]));
    assert!(!is_address_in_range(&[0x00]));
    assert!(!is_address_in_range(&[0x00, 0x01, 0x02]));
}
