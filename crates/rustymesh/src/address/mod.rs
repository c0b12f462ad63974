//! Mesh address space partitioning and validation
//!
//! The 16-bit mesh address space splits into five disjoint classes:
//! unassigned, unicast, virtual, group and reserved. Classification is a
//! pure function of the value; validators reject out-of-range values
//! rather than clamping them.

#[cfg(test)]
mod tests;

use std::fmt;

/// The unassigned address
pub const UNASSIGNED_ADDRESS: u16 = 0x0000;

/// First valid unicast address
pub const START_UNICAST_ADDRESS: u16 = 0x0001;

/// Last valid unicast address
pub const END_UNICAST_ADDRESS: u16 = 0x7FFF;

/// First virtual address
pub const START_VIRTUAL_ADDRESS: u16 = 0x8000;

/// Last virtual address
pub const END_VIRTUAL_ADDRESS: u16 = 0xBFFF;

/// First group address
pub const START_GROUP_ADDRESS: u16 = 0xC000;

/// Last non-fixed group address
pub const END_GROUP_ADDRESS: u16 = 0xFEFF;

/// First address of the reserved-for-future-use block
pub const START_RESERVED_ADDRESS: u16 = 0xFF00;

/// Last address of the reserved-for-future-use block
pub const END_RESERVED_ADDRESS: u16 = 0xFFFB;

/// Fixed group address reaching all proxy nodes
pub const ALL_PROXIES_ADDRESS: u16 = 0xFFFC;

/// Fixed group address reaching all friend nodes
pub const ALL_FRIENDS_ADDRESS: u16 = 0xFFFD;

/// Fixed group address reaching all relay nodes
pub const ALL_RELAYS_ADDRESS: u16 = 0xFFFE;

/// Fixed group address reaching every node
pub const ALL_NODES_ADDRESS: u16 = 0xFFFF;

/// Address classes of the 16-bit mesh address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressType {
    /// 0x0000 - the element has no address yet
    Unassigned,
    /// 0x0001..=0x7FFF - a single element
    Unicast,
    /// 0x8000..=0xBFFF - hash of an externally-held 128-bit label UUID;
    /// the 16-bit value alone does not identify the label uniquely
    Virtual,
    /// 0xC000..=0xFEFF plus the fixed group addresses 0xFFFC..=0xFFFF
    Group,
    /// 0xFF00..=0xFFFB - reserved for future use
    Reserved,
}

impl AddressType {
    /// Classify a 16-bit address. Every value maps to exactly one class.
    pub fn classify(address: u16) -> Self {
        match address {
            UNASSIGNED_ADDRESS => AddressType::Unassigned,
            START_UNICAST_ADDRESS..=END_UNICAST_ADDRESS => AddressType::Unicast,
            START_VIRTUAL_ADDRESS..=END_VIRTUAL_ADDRESS => AddressType::Virtual,
            START_GROUP_ADDRESS..=END_GROUP_ADDRESS => AddressType::Group,
            START_RESERVED_ADDRESS..=END_RESERVED_ADDRESS => AddressType::Reserved,
            // 0xFFFC..=0xFFFF
            _ => AddressType::Group,
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressType::Unassigned => "Unassigned",
            AddressType::Unicast => "Unicast",
            AddressType::Virtual => "Virtual",
            AddressType::Group => "Group",
            AddressType::Reserved => "Reserved",
        };
        write!(f, "{}", name)
    }
}

/// A 16-bit mesh address with its class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshAddress {
    value: u16,
}

impl MeshAddress {
    /// Wrap a raw 16-bit address.
    pub fn new(value: u16) -> Self {
        MeshAddress { value }
    }

    /// The raw 16-bit value.
    pub fn value(&self) -> u16 {
        self.value
    }

    /// The address class.
    pub fn address_type(&self) -> AddressType {
        AddressType::classify(self.value)
    }

    /// Big-endian wire form.
    pub fn to_bytes(&self) -> [u8; 2] {
        self.value.to_be_bytes()
    }
}

impl fmt::Display for MeshAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X} ({})", self.value, self.address_type())
    }
}

/// Whether an address identifies a single element.
pub fn is_valid_unicast_address(address: u16) -> bool {
    (START_UNICAST_ADDRESS..=END_UNICAST_ADDRESS).contains(&address)
}

/// Whether a whole element range starting at `address` stays unicast.
pub fn is_valid_unicast_range(address: u16, element_count: u8) -> bool {
    if element_count == 0 || !is_valid_unicast_address(address) {
        return false;
    }

    match address.checked_add(u16::from(element_count) - 1) {
        Some(last) => is_valid_unicast_address(last),
        None => false,
    }
}

/// Whether an address is a virtual address.
pub fn is_valid_virtual_address(address: u16) -> bool {
    (START_VIRTUAL_ADDRESS..=END_VIRTUAL_ADDRESS).contains(&address)
}

/// Whether an address is a group address, fixed groups included.
pub fn is_valid_group_address(address: u16) -> bool {
    AddressType::classify(address) == AddressType::Group
}

/// Whether an address is one of the four fixed group addresses.
pub fn is_fixed_group_address(address: u16) -> bool {
    address >= ALL_PROXIES_ADDRESS
}

/// Whether an address may be used as a publication or subscription target.
///
/// Unassigned and reserved addresses are rejected; everything else is a
/// legal destination.
pub fn is_valid_subscription_address(address: u16) -> bool {
    matches!(
        AddressType::classify(address),
        AddressType::Unicast | AddressType::Virtual | AddressType::Group
    )
}

/// Whether a raw field holds a 16-bit address.
pub fn is_address_in_range(bytes: &[u8]) -> bool {
    bytes.len() == 2
}
