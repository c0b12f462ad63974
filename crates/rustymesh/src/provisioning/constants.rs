//! Constants for the provisioning protocol

// Provisioning PDUs travel behind a one-octet bearer PDU type
pub const PROVISIONING_PDU_TYPE: u8 = 0x03;

// Provisioning PDU sub-types
pub const TYPE_INVITE: u8 = 0x00;
pub const TYPE_CAPABILITIES: u8 = 0x01;
pub const TYPE_START: u8 = 0x02;
pub const TYPE_PUBLIC_KEY: u8 = 0x03;
pub const TYPE_INPUT_COMPLETE: u8 = 0x04;
pub const TYPE_CONFIRMATION: u8 = 0x05;
pub const TYPE_RANDOM: u8 = 0x06;
pub const TYPE_DATA: u8 = 0x07;
pub const TYPE_COMPLETE: u8 = 0x08;
pub const TYPE_FAILED: u8 = 0x09;

// Number of header octets ahead of each PDU value (bearer type + sub-type)
pub const PDU_HEADER_LEN: usize = 2;

// Wire length of a capabilities PDU including its header
pub const CAPABILITIES_PDU_LEN: usize = 13;

// Algorithm field values for the start PDU
pub const ALGORITHM_FIPS_P256: u8 = 0x00;

// Algorithm bitmask bit advertised in the capabilities PDU
pub const ALGORITHM_FIPS_P256_BIT: u16 = 0x0001;

// Capabilities field value meaning static OOB data is available
pub const STATIC_OOB_AVAILABLE: u8 = 0x01;

// Capabilities field value meaning an OOB public key is available
pub const PUBLIC_KEY_OOB_AVAILABLE: u8 = 0x01;

// Public key field values for the start PDU
pub const PUBLIC_KEY_NO_OOB: u8 = 0x00;
pub const PUBLIC_KEY_OOB: u8 = 0x01;

// Authentication method field values for the start PDU
pub const AUTH_METHOD_NO_OOB: u8 = 0x00;
pub const AUTH_METHOD_STATIC_OOB: u8 = 0x01;
pub const AUTH_METHOD_OUTPUT_OOB: u8 = 0x02;
pub const AUTH_METHOD_INPUT_OOB: u8 = 0x03;

// Provisioning failed reason codes
pub const FAILURE_PROHIBITED: u8 = 0x00;
pub const FAILURE_INVALID_PDU: u8 = 0x01;
pub const FAILURE_INVALID_FORMAT: u8 = 0x02;
pub const FAILURE_UNEXPECTED_PDU: u8 = 0x03;
pub const FAILURE_CONFIRMATION_FAILED: u8 = 0x04;
pub const FAILURE_OUT_OF_RESOURCES: u8 = 0x05;
pub const FAILURE_DECRYPTION_FAILED: u8 = 0x06;
pub const FAILURE_UNEXPECTED_ERROR: u8 = 0x07;
pub const FAILURE_CANNOT_ASSIGN_ADDRESSES: u8 = 0x08;

// Key derivation labels (Mesh Profile 5.4.2.4 and 5.4.2.5)
pub const LABEL_PRCK: &[u8] = b"prck";
pub const LABEL_PRSK: &[u8] = b"prsk";
pub const LABEL_PRSN: &[u8] = b"prsn";
pub const LABEL_PRDK: &[u8] = b"prdk";

// Byte sizes of the handshake artifacts
pub const PUBLIC_KEY_XY_LEN: usize = 64;
pub const RANDOM_LEN: usize = 16;
pub const CONFIRMATION_LEN: usize = 16;
pub const AUTH_VALUE_LEN: usize = 16;

// ConfirmationInputs = invite value (1) + capabilities value (11)
// + start value (5) + two raw public keys (64 each)
pub const CONFIRMATION_INPUTS_LEN: usize = 1 + 11 + 5 + 2 * PUBLIC_KEY_XY_LEN;

// Provisioning data plaintext: network key (16) + key index (2)
// + flags (1) + IV index (4) + unicast address (2)
pub const PROVISIONING_DATA_LEN: usize = 25;

// AES-CCM parameters for the data PDU
pub const SESSION_NONCE_LEN: usize = 13;
pub const DATA_MIC_LEN: usize = 8;

// Default per-state response deadline, in milliseconds
pub const STATE_TIMEOUT_MS: u64 = 60_000;
