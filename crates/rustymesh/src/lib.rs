//! RustyMesh - A Rust library for Bluetooth Mesh provisioning and configuration
//!
//! This library implements the provisioner side of the Bluetooth Mesh
//! provisioning protocol: the cryptographic handshake that bootstraps an
//! unprovisioned device into a secure mesh network. It also provides the
//! binary codec primitives the protocol and configuration layers share:
//! mesh address classification, variable-length access opcodes, key-index
//! padding, and the fixed-length device property characteristics used by
//! the sensor model.
//!
//! The transport that carries provisioning PDUs (GATT proxy, PB-ADV, ...)
//! is out of scope; callers plug one in through the
//! [`ProvisioningTransport`] trait and feed received PDUs back into the
//! [`ProvisioningManager`].

pub mod address;
pub mod error;
pub mod properties;
pub mod provisioning;
pub mod utils;

// Re-export common types for convenience
pub use address::{AddressType, MeshAddress};
pub use error::MeshError;
pub use properties::{Characteristic, CharacteristicFormat, CharacteristicValue, DeviceProperty};
pub use provisioning::{
    AuthenticationMethod, FailureReason, ProvisioningCapabilities, ProvisioningError,
    ProvisioningEvent, ProvisioningManager, ProvisioningState, ProvisioningTransport,
    UnprovisionedNode,
};
