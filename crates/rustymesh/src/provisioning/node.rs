//! Session record for a device being provisioned
//!
//! One [`UnprovisionedNode`] is owned exclusively by its session driver
//! for the duration of one provisioning attempt. Its fields fill in
//! incrementally as the handshake advances; the raw invite, capabilities
//! and start PDU values are retained because the confirmation step folds
//! them into the confirmation inputs.

use super::capabilities::ProvisioningCapabilities;
use super::constants::*;
use super::crypto::SessionKeyPair;
use super::types::AuthenticationChoice;
use crate::utils::bytes_to_hex;
use std::fmt;

/// Mutable session record for one device being provisioned
#[derive(Clone)]
pub struct UnprovisionedNode {
    /// Device UUID from the unprovisioned beacon / scan record
    pub device_uuid: [u8; 16],
    /// Human-readable name for the node being created
    pub name: String,

    /// Network key the node will receive
    pub network_key: [u8; 16],
    /// Index of that network key (12-bit space)
    pub key_index: u16,
    /// Key refresh / IV update flags distributed with the data PDU
    pub flags: u8,
    /// Current IV index of the network
    pub iv_index: u32,
    /// First unicast address assigned to the node's elements
    pub unicast_address: u16,

    /// Parsed device capabilities, after the capabilities PDU
    pub capabilities: Option<ProvisioningCapabilities>,
    /// The caller's authentication choice, after `provision` is called
    pub auth_choice: Option<AuthenticationChoice>,

    /// Ephemeral session key pair, generated for the public key PDU
    pub(super) key_pair: Option<SessionKeyPair>,
    /// Device raw public key (X||Y)
    pub(super) device_public_key: Option<[u8; PUBLIC_KEY_XY_LEN]>,
    /// ECDH shared secret
    pub(super) shared_secret: Option<[u8; 32]>,
    /// Whether the device key arrived out of band instead of over the air
    pub(super) oob_public_key_used: bool,

    /// Retained PDU values (header octets stripped) for the
    /// confirmation inputs
    pub(super) invite_value: Option<Vec<u8>>,
    pub(super) capabilities_value: Option<Vec<u8>>,
    pub(super) start_value: Option<Vec<u8>>,

    /// Confirmation chain artifacts
    pub(super) confirmation_salt: Option<[u8; 16]>,
    pub(super) confirmation_key: Option<[u8; 16]>,
    pub(super) provisioner_random: Option<[u8; RANDOM_LEN]>,
    pub(super) device_random: Option<[u8; RANDOM_LEN]>,
    pub(super) provisioner_confirmation: Option<[u8; CONFIRMATION_LEN]>,
    pub(super) device_confirmation: Option<[u8; CONFIRMATION_LEN]>,
    pub(super) auth_value: Option<[u8; AUTH_VALUE_LEN]>,

    /// Device key derived during the data step; survives the session as
    /// the node's configuration key
    pub(super) device_key: Option<[u8; 16]>,
}

impl UnprovisionedNode {
    /// Create a session record for one provisioning attempt.
    pub fn new(
        device_uuid: [u8; 16],
        name: String,
        network_key: [u8; 16],
        key_index: u16,
        flags: u8,
        iv_index: u32,
        unicast_address: u16,
    ) -> Self {
        UnprovisionedNode {
            device_uuid,
            name,
            network_key,
            key_index,
            flags,
            iv_index,
            unicast_address,
            capabilities: None,
            auth_choice: None,
            key_pair: None,
            device_public_key: None,
            shared_secret: None,
            oob_public_key_used: false,
            invite_value: None,
            capabilities_value: None,
            start_value: None,
            confirmation_salt: None,
            confirmation_key: None,
            provisioner_random: None,
            device_random: None,
            provisioner_confirmation: None,
            device_confirmation: None,
            auth_value: None,
            device_key: None,
        }
    }

    /// The device key derived during provisioning, once the data step ran.
    pub fn device_key(&self) -> Option<&[u8; 16]> {
        self.device_key.as_ref()
    }

    /// Number of elements the device reported, once capabilities arrived.
    pub fn element_count(&self) -> Option<u8> {
        self.capabilities.as_ref().map(|caps| caps.element_count)
    }

    /// Overwrite the session's secret material.
    ///
    /// Called on teardown; the device key is kept only when provisioning
    /// completed, since the caller needs it to configure the node.
    pub(super) fn wipe_secrets(&mut self, keep_device_key: bool) {
        self.key_pair = None;
        if let Some(secret) = self.shared_secret.as_mut() {
            secret.fill(0);
        }
        self.shared_secret = None;
        if let Some(key) = self.confirmation_key.as_mut() {
            key.fill(0);
        }
        self.confirmation_key = None;
        if let Some(auth) = self.auth_value.as_mut() {
            auth.fill(0);
        }
        self.auth_value = None;
        if !keep_device_key {
            if let Some(key) = self.device_key.as_mut() {
                key.fill(0);
            }
            self.device_key = None;
        }
    }
}

impl fmt::Debug for UnprovisionedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material is deliberately left out
        f.debug_struct("UnprovisionedNode")
            .field("device_uuid", &bytes_to_hex(&self.device_uuid, true))
            .field("name", &self.name)
            .field("key_index", &self.key_index)
            .field("unicast_address", &self.unicast_address)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
