//! Provisioning capabilities PDU parser
//!
//! The capabilities PDU is a fixed 13-octet frame: two header octets
//! followed by the 11-octet capabilities value. The derived set of usable
//! authentication methods drives which confirmation algorithm the state
//! machine runs later; deriving it wrong makes authentication fail
//! silently, so the rules here follow the PDU fields exactly.

use super::constants::*;
use super::types::{
    AuthenticationMethod, InputOobActions, OutputOobActions, ProvisioningError,
    ProvisioningResult,
};
use byteorder::{BigEndian, ByteOrder};

/// Parsed capabilities of an unprovisioned device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningCapabilities {
    /// Number of elements the device exposes; never zero
    pub element_count: u8,
    /// Supported algorithms bitmask (bit 0 = FIPS P-256)
    pub algorithms: u16,
    /// Raw public-key-type field; 0x01 means an OOB public key is available
    pub public_key_type: u8,
    /// Raw static-OOB-type field; 0x01 means a static value is available
    pub static_oob_type: u8,
    /// Maximum size of an output OOB value, in digits or characters
    pub output_oob_size: u8,
    /// Output OOB actions the device supports
    pub output_oob_actions: OutputOobActions,
    /// Maximum size of an input OOB value, in digits or characters
    pub input_oob_size: u8,
    /// Input OOB actions the device supports
    pub input_oob_actions: InputOobActions,
}

impl ProvisioningCapabilities {
    /// Parse a capabilities PDU (header octets included).
    pub fn parse(pdu: &[u8]) -> ProvisioningResult<Self> {
        if pdu.len() != CAPABILITIES_PDU_LEN {
            return Err(ProvisioningError::InvalidPdu(format!(
                "capabilities PDU must be {} octets, got {}",
                CAPABILITIES_PDU_LEN,
                pdu.len()
            )));
        }

        let element_count = pdu[2];
        if element_count == 0 {
            return Err(ProvisioningError::InvalidCapabilities(
                "element count must be nonzero".into(),
            ));
        }

        Ok(ProvisioningCapabilities {
            element_count,
            algorithms: BigEndian::read_u16(&pdu[3..5]),
            public_key_type: pdu[5],
            static_oob_type: pdu[6],
            output_oob_size: pdu[7],
            output_oob_actions: OutputOobActions::from_bits_truncate(BigEndian::read_u16(
                &pdu[8..10],
            )),
            input_oob_size: pdu[10],
            input_oob_actions: InputOobActions::from_bits_truncate(BigEndian::read_u16(
                &pdu[11..13],
            )),
        })
    }

    /// Whether the device supports FIPS P-256 ECDH.
    pub fn supports_fips_p256(&self) -> bool {
        self.algorithms & ALGORITHM_FIPS_P256_BIT != 0
    }

    /// Whether the device's public key is available out of band.
    pub fn public_key_oob_available(&self) -> bool {
        self.public_key_type == PUBLIC_KEY_OOB_AVAILABLE
    }

    /// The authentication methods usable with this device.
    ///
    /// No-OOB is always a candidate. Static OOB requires the static flag.
    /// Output/input OOB require both a nonzero size and a nonzero action
    /// bitmask; a zero size forces the action set empty regardless of the
    /// advertised bitmask.
    pub fn available_auth_methods(&self) -> Vec<AuthenticationMethod> {
        let mut methods = vec![AuthenticationMethod::NoOob];

        if self.static_oob_type == STATIC_OOB_AVAILABLE {
            methods.push(AuthenticationMethod::StaticOob);
        }

        if self.output_oob_size > 0 && !self.output_oob_actions.is_empty() {
            methods.push(AuthenticationMethod::OutputOob);
        }

        if self.input_oob_size > 0 && !self.input_oob_actions.is_empty() {
            methods.push(AuthenticationMethod::InputOob);
        }

        methods
    }
}
