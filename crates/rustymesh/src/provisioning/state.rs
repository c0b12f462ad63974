//! Provisioning handshake states and per-step PDU logic
//!
//! The handshake is strictly linear: Invite, Capabilities, Start,
//! PublicKey, (InputComplete), Confirmation, Random, Data, Complete.
//! Failed is reachable from every state, either through a failed PDU from
//! the device or through a local validation rejecting the peer's data.
//! There are no retries; a failure ends the session and the caller must
//! restart from Invite.

use super::capabilities::ProvisioningCapabilities;
use super::constants::*;
use super::crypto;
use super::node::UnprovisionedNode;
use super::types::{
    AuthenticationChoice, FailureReason, ProvisioningError, ProvisioningResult,
};
use byteorder::{BigEndian, ByteOrder};
use log::debug;
use std::fmt;

/// The ten provisioning states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningState {
    Invite,
    Capabilities,
    Start,
    PublicKey,
    InputComplete,
    Confirmation,
    Random,
    Data,
    Complete,
    Failed,
}

impl ProvisioningState {
    /// Short variant name, used in error reporting.
    pub fn name(&self) -> &'static str {
        match self {
            ProvisioningState::Invite => "Invite",
            ProvisioningState::Capabilities => "Capabilities",
            ProvisioningState::Start => "Start",
            ProvisioningState::PublicKey => "PublicKey",
            ProvisioningState::InputComplete => "InputComplete",
            ProvisioningState::Confirmation => "Confirmation",
            ProvisioningState::Random => "Random",
            ProvisioningState::Data => "Data",
            ProvisioningState::Complete => "Complete",
            ProvisioningState::Failed => "Failed",
        }
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProvisioningState::Invite => "Provisioning Invite",
            ProvisioningState::Capabilities => "Provisioning Capabilities",
            ProvisioningState::Start => "Provisioning Start",
            ProvisioningState::PublicKey => "Provisioning Public Key",
            ProvisioningState::InputComplete => "Provisioning Input Complete",
            ProvisioningState::Confirmation => "Provisioning Confirmation",
            ProvisioningState::Random => "Provisioning Random",
            ProvisioningState::Data => "Provisioning Data",
            ProvisioningState::Complete => "Provisioning Complete",
            ProvisioningState::Failed => "Provisioning Failed",
        };
        write!(f, "{}", name)
    }
}

fn pdu_header(sub_type: u8) -> Vec<u8> {
    vec![PROVISIONING_PDU_TYPE, sub_type]
}

/// Check the two header octets and return the PDU value.
fn pdu_value<'a>(
    pdu: &'a [u8],
    expected_type: u8,
    state: &'static str,
) -> ProvisioningResult<&'a [u8]> {
    if pdu.len() < PDU_HEADER_LEN {
        return Err(ProvisioningError::InvalidPdu(format!(
            "PDU shorter than its {}-octet header",
            PDU_HEADER_LEN
        )));
    }
    if pdu[0] != PROVISIONING_PDU_TYPE {
        return Err(ProvisioningError::InvalidPdu(format!(
            "not a provisioning PDU (type 0x{:02X})",
            pdu[0]
        )));
    }
    if pdu[1] != expected_type {
        return Err(ProvisioningError::UnexpectedPdu {
            state,
            actual: pdu[1],
        });
    }
    Ok(&pdu[PDU_HEADER_LEN..])
}

/// Check a PDU's header octets without consuming its value.
pub(super) fn expect_pdu(
    pdu: &[u8],
    expected_type: u8,
    state: &'static str,
) -> ProvisioningResult<()> {
    pdu_value(pdu, expected_type, state).map(|_| ())
}

/// Build the invite PDU and retain its value for the confirmation inputs.
pub fn build_invite(node: &mut UnprovisionedNode, attention_timer: u8) -> Vec<u8> {
    node.invite_value = Some(vec![attention_timer]);

    let mut pdu = pdu_header(TYPE_INVITE);
    pdu.push(attention_timer);
    pdu
}

/// Parse the capabilities PDU and retain its value.
pub fn parse_capabilities(
    node: &mut UnprovisionedNode,
    pdu: &[u8],
) -> ProvisioningResult<ProvisioningCapabilities> {
    pdu_value(pdu, TYPE_CAPABILITIES, "Capabilities")?;
    let capabilities = ProvisioningCapabilities::parse(pdu)?;

    node.capabilities_value = Some(pdu[PDU_HEADER_LEN..].to_vec());
    node.capabilities = Some(capabilities.clone());

    debug!(
        "capabilities: {} element(s), auth methods {:?}",
        capabilities.element_count,
        capabilities.available_auth_methods()
    );

    Ok(capabilities)
}

/// Build the start PDU from the caller's authentication choice.
///
/// For input OOB this also pre-generates the value the user must input on
/// the device, returning it for display alongside the PDU.
pub fn build_start(
    node: &mut UnprovisionedNode,
) -> ProvisioningResult<(Vec<u8>, Option<String>)> {
    let capabilities = node
        .capabilities
        .as_ref()
        .ok_or(ProvisioningError::InvalidState("Start"))?;
    let choice = node
        .auth_choice
        .as_ref()
        .ok_or(ProvisioningError::InvalidState("Start"))?
        .clone();

    if !capabilities.supports_fips_p256() {
        return Err(ProvisioningError::InvalidCapabilities(
            "device does not support FIPS P-256".into(),
        ));
    }
    if !capabilities
        .available_auth_methods()
        .contains(&choice.method())
    {
        return Err(ProvisioningError::AuthMethodUnavailable);
    }

    let public_key_flag = if capabilities.public_key_oob_available() && node.oob_public_key_used {
        PUBLIC_KEY_OOB
    } else {
        PUBLIC_KEY_NO_OOB
    };

    let mut display_value = None;
    let (method, action, size) = match &choice {
        AuthenticationChoice::NoOob => {
            node.auth_value = Some([0u8; AUTH_VALUE_LEN]);
            (AUTH_METHOD_NO_OOB, 0, 0)
        }
        AuthenticationChoice::StaticOob(value) => {
            node.auth_value = Some(*value);
            (AUTH_METHOD_STATIC_OOB, 0, 0)
        }
        AuthenticationChoice::OutputOob { action, size } => {
            validate_oob_size(*size, capabilities.output_oob_size)?;
            if !capabilities.output_oob_actions.contains(action.to_flag()) {
                return Err(ProvisioningError::AuthMethodUnavailable);
            }
            // The auth value arrives later, relayed by the user
            (AUTH_METHOD_OUTPUT_OOB, action.to_u8(), *size)
        }
        AuthenticationChoice::InputOob { action, size } => {
            validate_oob_size(*size, capabilities.input_oob_size)?;
            if !capabilities.input_oob_actions.contains(action.to_flag()) {
                return Err(ProvisioningError::AuthMethodUnavailable);
            }
            // Pre-generate the value the user must input on the device
            if action.is_numeric() {
                let value = crypto::generate_numeric_oob(*size);
                node.auth_value = Some(crypto::auth_value_numeric(value));
                display_value = Some(value.to_string());
            } else {
                let value = crypto::generate_alphanumeric_oob(*size);
                node.auth_value = Some(crypto::auth_value_alphanumeric(&value)?);
                display_value = Some(value);
            }
            (AUTH_METHOD_INPUT_OOB, action.to_u8(), *size)
        }
    };

    let value = vec![ALGORITHM_FIPS_P256, public_key_flag, method, action, size];
    node.start_value = Some(value.clone());

    let mut pdu = pdu_header(TYPE_START);
    pdu.extend_from_slice(&value);
    Ok((pdu, display_value))
}

fn validate_oob_size(requested: u8, supported: u8) -> ProvisioningResult<()> {
    if requested == 0 || requested > supported {
        return Err(ProvisioningError::InvalidCapabilities(format!(
            "OOB size {} outside device limit {}",
            requested, supported
        )));
    }
    Ok(())
}

/// Generate the session key pair and build the public key PDU.
///
/// When the device's public key was obtained out of band, the shared
/// secret is derived immediately; there is no public key PDU to wait for.
pub fn build_public_key(node: &mut UnprovisionedNode) -> ProvisioningResult<Vec<u8>> {
    let key_pair = crypto::SessionKeyPair::generate()?;

    let mut pdu = pdu_header(TYPE_PUBLIC_KEY);
    pdu.extend_from_slice(key_pair.public_xy());

    node.key_pair = Some(key_pair);

    if node.oob_public_key_used {
        derive_shared_secret(node)?;
    }

    Ok(pdu)
}

/// Parse the device's public key PDU, validate it and derive the shared
/// secret.
pub fn parse_public_key(node: &mut UnprovisionedNode, pdu: &[u8]) -> ProvisioningResult<()> {
    let value = pdu_value(pdu, TYPE_PUBLIC_KEY, "PublicKey")?;
    if value.len() != PUBLIC_KEY_XY_LEN {
        return Err(ProvisioningError::InvalidPdu(format!(
            "public key PDU value must be {} octets, got {}",
            PUBLIC_KEY_XY_LEN,
            value.len()
        )));
    }

    let mut device_xy = [0u8; PUBLIC_KEY_XY_LEN];
    device_xy.copy_from_slice(value);

    node.device_public_key = Some(device_xy);
    derive_shared_secret(node)
}

fn derive_shared_secret(node: &mut UnprovisionedNode) -> ProvisioningResult<()> {
    let key_pair = node
        .key_pair
        .as_ref()
        .ok_or(ProvisioningError::InvalidState("PublicKey"))?;
    let device_xy = node
        .device_public_key
        .as_ref()
        .ok_or(ProvisioningError::InvalidState("PublicKey"))?;

    // Errata E16350: a device echoing the provisioner's own public key is
    // a reflection attack, not a key exchange
    if device_xy == key_pair.public_xy() {
        return Err(ProvisioningError::PublicKeyReflection);
    }

    let device_key = crypto::validate_public_key(device_xy)?;
    node.shared_secret = Some(key_pair.shared_secret(&device_key));

    debug!("ECDH shared secret established");
    Ok(())
}

/// ConfirmationInputs: invite, capabilities and start PDU values followed
/// by both raw public keys, in the order the Mesh Profile fixes.
pub fn generate_confirmation_inputs(node: &UnprovisionedNode) -> ProvisioningResult<Vec<u8>> {
    let invite = node
        .invite_value
        .as_ref()
        .ok_or(ProvisioningError::InvalidState("Confirmation"))?;
    let capabilities = node
        .capabilities_value
        .as_ref()
        .ok_or(ProvisioningError::InvalidState("Confirmation"))?;
    let start = node
        .start_value
        .as_ref()
        .ok_or(ProvisioningError::InvalidState("Confirmation"))?;
    let key_pair = node
        .key_pair
        .as_ref()
        .ok_or(ProvisioningError::InvalidState("Confirmation"))?;
    let device_xy = node
        .device_public_key
        .as_ref()
        .ok_or(ProvisioningError::InvalidState("Confirmation"))?;

    let mut inputs = Vec::with_capacity(CONFIRMATION_INPUTS_LEN);
    inputs.extend_from_slice(invite);
    inputs.extend_from_slice(capabilities);
    inputs.extend_from_slice(start);
    inputs.extend_from_slice(key_pair.public_xy());
    inputs.extend_from_slice(device_xy);

    if inputs.len() != CONFIRMATION_INPUTS_LEN {
        return Err(ProvisioningError::InvalidPdu(format!(
            "confirmation inputs must be {} octets, got {}",
            CONFIRMATION_INPUTS_LEN,
            inputs.len()
        )));
    }

    Ok(inputs)
}

/// Derive the confirmation chain and build the confirmation PDU.
pub fn build_confirmation(node: &mut UnprovisionedNode) -> ProvisioningResult<Vec<u8>> {
    let inputs = generate_confirmation_inputs(node)?;
    let shared_secret = node
        .shared_secret
        .ok_or(ProvisioningError::InvalidState("Confirmation"))?;
    let auth_value = node
        .auth_value
        .ok_or(ProvisioningError::AuthValueMissing)?;

    let confirmation_salt = crypto::s1(&inputs);
    let confirmation_key = crypto::k1(&shared_secret, &confirmation_salt, LABEL_PRCK);
    let provisioner_random = crypto::generate_random_16();

    let mut message = [0u8; RANDOM_LEN + AUTH_VALUE_LEN];
    message[..RANDOM_LEN].copy_from_slice(&provisioner_random);
    message[RANDOM_LEN..].copy_from_slice(&auth_value);
    let confirmation = crypto::aes_cmac(&confirmation_key, &message);

    node.confirmation_salt = Some(confirmation_salt);
    node.confirmation_key = Some(confirmation_key);
    node.provisioner_random = Some(provisioner_random);
    node.provisioner_confirmation = Some(confirmation);

    let mut pdu = pdu_header(TYPE_CONFIRMATION);
    pdu.extend_from_slice(&confirmation);
    Ok(pdu)
}

/// Store the device's confirmation value; it is verified after the random
/// exchange.
pub fn parse_confirmation(node: &mut UnprovisionedNode, pdu: &[u8]) -> ProvisioningResult<()> {
    let value = pdu_value(pdu, TYPE_CONFIRMATION, "Confirmation")?;
    if value.len() != CONFIRMATION_LEN {
        return Err(ProvisioningError::InvalidPdu(format!(
            "confirmation PDU value must be {} octets, got {}",
            CONFIRMATION_LEN,
            value.len()
        )));
    }

    let mut confirmation = [0u8; CONFIRMATION_LEN];
    confirmation.copy_from_slice(value);

    // Errata E16350: an echoed confirmation value is the same reflection
    // indicator as an echoed public key
    if node.provisioner_confirmation == Some(confirmation) {
        return Err(ProvisioningError::ConfirmationReflection);
    }

    node.device_confirmation = Some(confirmation);
    Ok(())
}

/// Build the random PDU revealing the provisioner's nonce.
pub fn build_random(node: &UnprovisionedNode) -> ProvisioningResult<Vec<u8>> {
    let random = node
        .provisioner_random
        .ok_or(ProvisioningError::InvalidState("Random"))?;

    let mut pdu = pdu_header(TYPE_RANDOM);
    pdu.extend_from_slice(&random);
    Ok(pdu)
}

/// Parse the device's random PDU and verify its earlier confirmation.
///
/// A mismatch means the two sides hold different authentication values
/// (wrong PIN or OOB value) and aborts the session.
pub fn parse_random(node: &mut UnprovisionedNode, pdu: &[u8]) -> ProvisioningResult<()> {
    let value = pdu_value(pdu, TYPE_RANDOM, "Random")?;
    if value.len() != RANDOM_LEN {
        return Err(ProvisioningError::InvalidPdu(format!(
            "random PDU value must be {} octets, got {}",
            RANDOM_LEN,
            value.len()
        )));
    }

    let confirmation_key = node
        .confirmation_key
        .ok_or(ProvisioningError::InvalidState("Random"))?;
    let auth_value = node
        .auth_value
        .ok_or(ProvisioningError::AuthValueMissing)?;
    let device_confirmation = node
        .device_confirmation
        .ok_or(ProvisioningError::InvalidState("Random"))?;

    let mut device_random = [0u8; RANDOM_LEN];
    device_random.copy_from_slice(value);

    let mut message = [0u8; RANDOM_LEN + AUTH_VALUE_LEN];
    message[..RANDOM_LEN].copy_from_slice(&device_random);
    message[RANDOM_LEN..].copy_from_slice(&auth_value);
    let expected = crypto::aes_cmac(&confirmation_key, &message);

    if expected != device_confirmation {
        return Err(ProvisioningError::ConfirmationFailed);
    }

    node.device_random = Some(device_random);
    Ok(())
}

/// Provisioning data plaintext: network key, padded key index, flags,
/// IV index, unicast address.
pub(super) fn assemble_provisioning_data(
    node: &UnprovisionedNode,
) -> [u8; PROVISIONING_DATA_LEN] {
    let mut data = [0u8; PROVISIONING_DATA_LEN];
    data[..16].copy_from_slice(&node.network_key);
    data[16..18].copy_from_slice(&crate::utils::add_key_index_padding(node.key_index));
    data[18] = node.flags;
    BigEndian::write_u32(&mut data[19..23], node.iv_index);
    BigEndian::write_u16(&mut data[23..25], node.unicast_address);
    data
}

/// Derive the session keys, encrypt the provisioning data and build the
/// data PDU. The device key is derived here and retained on the node.
pub fn build_data(node: &mut UnprovisionedNode) -> ProvisioningResult<Vec<u8>> {
    let shared_secret = node
        .shared_secret
        .ok_or(ProvisioningError::InvalidState("Data"))?;
    let confirmation_salt = node
        .confirmation_salt
        .ok_or(ProvisioningError::InvalidState("Data"))?;
    let provisioner_random = node
        .provisioner_random
        .ok_or(ProvisioningError::InvalidState("Data"))?;
    let device_random = node
        .device_random
        .ok_or(ProvisioningError::InvalidState("Data"))?;

    let mut salt_input = Vec::with_capacity(48);
    salt_input.extend_from_slice(&confirmation_salt);
    salt_input.extend_from_slice(&provisioner_random);
    salt_input.extend_from_slice(&device_random);
    let provisioning_salt = crypto::s1(&salt_input);

    let session_key = crypto::k1(&shared_secret, &provisioning_salt, LABEL_PRSK);
    let nonce_full = crypto::k1(&shared_secret, &provisioning_salt, LABEL_PRSN);
    let device_key = crypto::k1(&shared_secret, &provisioning_salt, LABEL_PRDK);

    // The session nonce is the k1 output with its first three octets
    // dropped
    let mut session_nonce = [0u8; SESSION_NONCE_LEN];
    session_nonce.copy_from_slice(&nonce_full[16 - SESSION_NONCE_LEN..]);

    let plaintext = assemble_provisioning_data(node);
    let ciphertext = crypto::ccm_encrypt(&session_key, &session_nonce, &plaintext)?;

    node.device_key = Some(device_key);

    let mut pdu = pdu_header(TYPE_DATA);
    pdu.extend_from_slice(&ciphertext);
    Ok(pdu)
}

/// Decode a failed PDU's reason code.
///
/// The PDU is bound-checked; an under-length failed PDU is itself a
/// malformed-input error.
pub fn parse_failed(pdu: &[u8]) -> ProvisioningResult<FailureReason> {
    let value = pdu_value(pdu, TYPE_FAILED, "Failed")?;
    match value.first() {
        Some(&code) => Ok(FailureReason::from_u8(code)),
        None => Err(ProvisioningError::InvalidPdu(
            "failed PDU is missing its reason octet".into(),
        )),
    }
}
