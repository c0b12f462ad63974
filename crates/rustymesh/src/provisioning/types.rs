//! Type definitions for the provisioning protocol

use super::constants::*;
use bitflags::bitflags;
use std::fmt;
use thiserror::Error;

/// Provisioning error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    #[error("Invalid PDU: {0}")]
    InvalidPdu(String),

    #[error("Invalid capabilities: {0}")]
    InvalidCapabilities(String),

    #[error("Unexpected PDU type 0x{actual:02X} in state {state}")]
    UnexpectedPdu { state: &'static str, actual: u8 },

    #[error("Device public key is not a valid P-256 point")]
    InvalidPublicKey,

    #[error("Device public key matches the provisioner public key")]
    PublicKeyReflection,

    #[error("Device confirmation matches the provisioner confirmation")]
    ConfirmationReflection,

    #[error("Confirmation value mismatch, authentication failed")]
    ConfirmationFailed,

    #[error("Authentication method not supported by device capabilities")]
    AuthMethodUnavailable,

    #[error("Authentication value missing for the chosen OOB method")]
    AuthValueMissing,

    #[error("Cryptographic operation failed: {0}")]
    CryptoError(String),

    #[error("Device reported provisioning failure: {0}")]
    PeerFailure(FailureReason),

    #[error("Operation invalid in state {0}")]
    InvalidState(&'static str),

    #[error("No provisioning session for device")]
    SessionNotFound,

    #[error("Session timed out waiting for the device")]
    Timeout,

    #[error("Session canceled")]
    Canceled,

    #[error("Unicast address space exhausted")]
    AddressExhausted,

    #[error("Invalid unicast address or element count")]
    InvalidUnicastRange,

    #[error("Transport error: {0}")]
    TransportError(String),
}

/// Result type for provisioning operations
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

/// Authentication methods negotiable during provisioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticationMethod {
    /// No out-of-band authentication (vulnerable to MITM; last resort)
    NoOob,
    /// A static value obtained out of band
    StaticOob,
    /// The device outputs a value the user relays to the provisioner
    OutputOob,
    /// The provisioner displays a value the user inputs on the device
    InputOob,
}

impl AuthenticationMethod {
    /// Wire value for the start PDU method field
    pub fn to_u8(self) -> u8 {
        match self {
            AuthenticationMethod::NoOob => AUTH_METHOD_NO_OOB,
            AuthenticationMethod::StaticOob => AUTH_METHOD_STATIC_OOB,
            AuthenticationMethod::OutputOob => AUTH_METHOD_OUTPUT_OOB,
            AuthenticationMethod::InputOob => AUTH_METHOD_INPUT_OOB,
        }
    }

    /// Parse a start PDU method field
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            AUTH_METHOD_NO_OOB => Some(AuthenticationMethod::NoOob),
            AUTH_METHOD_STATIC_OOB => Some(AuthenticationMethod::StaticOob),
            AUTH_METHOD_OUTPUT_OOB => Some(AuthenticationMethod::OutputOob),
            AUTH_METHOD_INPUT_OOB => Some(AuthenticationMethod::InputOob),
            _ => None,
        }
    }
}

impl fmt::Display for AuthenticationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthenticationMethod::NoOob => "No OOB",
            AuthenticationMethod::StaticOob => "Static OOB",
            AuthenticationMethod::OutputOob => "Output OOB",
            AuthenticationMethod::InputOob => "Input OOB",
        };
        write!(f, "{}", name)
    }
}

bitflags! {
    /// Output OOB actions a device advertises in its capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OutputOobActions: u16 {
        const BLINK = 0x0001;
        const BEEP = 0x0002;
        const VIBRATE = 0x0004;
        const OUTPUT_NUMERIC = 0x0008;
        const OUTPUT_ALPHANUMERIC = 0x0010;
    }
}

bitflags! {
    /// Input OOB actions a device advertises in its capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InputOobActions: u16 {
        const PUSH = 0x0001;
        const TWIST = 0x0002;
        const INPUT_NUMERIC = 0x0004;
        const INPUT_ALPHANUMERIC = 0x0008;
    }
}

/// A single output OOB action, as selected for the start PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputOobAction {
    Blink,
    Beep,
    Vibrate,
    OutputNumeric,
    OutputAlphanumeric,
}

impl OutputOobAction {
    /// Wire value for the start PDU action field
    pub fn to_u8(self) -> u8 {
        match self {
            OutputOobAction::Blink => 0x00,
            OutputOobAction::Beep => 0x01,
            OutputOobAction::Vibrate => 0x02,
            OutputOobAction::OutputNumeric => 0x03,
            OutputOobAction::OutputAlphanumeric => 0x04,
        }
    }

    /// The capabilities bitmask bit this action corresponds to
    pub fn to_flag(self) -> OutputOobActions {
        match self {
            OutputOobAction::Blink => OutputOobActions::BLINK,
            OutputOobAction::Beep => OutputOobActions::BEEP,
            OutputOobAction::Vibrate => OutputOobActions::VIBRATE,
            OutputOobAction::OutputNumeric => OutputOobActions::OUTPUT_NUMERIC,
            OutputOobAction::OutputAlphanumeric => OutputOobActions::OUTPUT_ALPHANUMERIC,
        }
    }

    /// Whether the user relays the observed value as a number
    pub fn is_numeric(self) -> bool {
        !matches!(self, OutputOobAction::OutputAlphanumeric)
    }
}

/// A single input OOB action, as selected for the start PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOobAction {
    Push,
    Twist,
    InputNumeric,
    InputAlphanumeric,
}

impl InputOobAction {
    /// Wire value for the start PDU action field
    pub fn to_u8(self) -> u8 {
        match self {
            InputOobAction::Push => 0x00,
            InputOobAction::Twist => 0x01,
            InputOobAction::InputNumeric => 0x02,
            InputOobAction::InputAlphanumeric => 0x03,
        }
    }

    /// The capabilities bitmask bit this action corresponds to
    pub fn to_flag(self) -> InputOobActions {
        match self {
            InputOobAction::Push => InputOobActions::PUSH,
            InputOobAction::Twist => InputOobActions::TWIST,
            InputOobAction::InputNumeric => InputOobActions::INPUT_NUMERIC,
            InputOobAction::InputAlphanumeric => InputOobActions::INPUT_ALPHANUMERIC,
        }
    }

    /// Whether the user enters the value as a number
    pub fn is_numeric(self) -> bool {
        !matches!(self, InputOobAction::InputAlphanumeric)
    }
}

/// The authentication choice made by the caller before the start PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationChoice {
    /// No out-of-band authentication
    NoOob,
    /// Static OOB with the out-of-band-obtained 16-byte value
    StaticOob([u8; 16]),
    /// Output OOB: the device performs `action` with `size` digits or
    /// characters; the user relays the value to the provisioner
    OutputOob { action: OutputOobAction, size: u8 },
    /// Input OOB: the provisioner displays a generated value of `size`
    /// digits or characters; the user inputs it on the device
    InputOob { action: InputOobAction, size: u8 },
}

impl AuthenticationChoice {
    /// The method this choice negotiates
    pub fn method(&self) -> AuthenticationMethod {
        match self {
            AuthenticationChoice::NoOob => AuthenticationMethod::NoOob,
            AuthenticationChoice::StaticOob(_) => AuthenticationMethod::StaticOob,
            AuthenticationChoice::OutputOob { .. } => AuthenticationMethod::OutputOob,
            AuthenticationChoice::InputOob { .. } => AuthenticationMethod::InputOob,
        }
    }
}

/// Reasons a device reports in a provisioning failed PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Prohibited,
    InvalidPdu,
    InvalidFormat,
    UnexpectedPdu,
    ConfirmationFailed,
    OutOfResources,
    DecryptionFailed,
    UnexpectedError,
    CannotAssignAddresses,
    /// Reason code outside the defined range
    Unknown(u8),
}

impl FailureReason {
    /// Map a failed PDU reason code to its name
    pub fn from_u8(code: u8) -> Self {
        match code {
            FAILURE_PROHIBITED => FailureReason::Prohibited,
            FAILURE_INVALID_PDU => FailureReason::InvalidPdu,
            FAILURE_INVALID_FORMAT => FailureReason::InvalidFormat,
            FAILURE_UNEXPECTED_PDU => FailureReason::UnexpectedPdu,
            FAILURE_CONFIRMATION_FAILED => FailureReason::ConfirmationFailed,
            FAILURE_OUT_OF_RESOURCES => FailureReason::OutOfResources,
            FAILURE_DECRYPTION_FAILED => FailureReason::DecryptionFailed,
            FAILURE_UNEXPECTED_ERROR => FailureReason::UnexpectedError,
            FAILURE_CANNOT_ASSIGN_ADDRESSES => FailureReason::CannotAssignAddresses,
            other => FailureReason::Unknown(other),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Prohibited => write!(f, "prohibited"),
            FailureReason::InvalidPdu => write!(f, "invalid PDU"),
            FailureReason::InvalidFormat => write!(f, "invalid format"),
            FailureReason::UnexpectedPdu => write!(f, "unexpected PDU"),
            FailureReason::ConfirmationFailed => write!(f, "confirmation failed"),
            FailureReason::OutOfResources => write!(f, "out of resources"),
            FailureReason::DecryptionFailed => write!(f, "decryption failed"),
            FailureReason::UnexpectedError => write!(f, "unexpected error"),
            FailureReason::CannotAssignAddresses => write!(f, "cannot assign addresses"),
            FailureReason::Unknown(code) => write!(f, "unknown reason 0x{:02X}", code),
        }
    }
}

/// Events the provisioning manager reports to its caller
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisioningEvent {
    /// The session moved to a new state; the PDU that triggered the move,
    /// if any, is included for tracing
    StateChanged {
        state: super::state::ProvisioningState,
        pdu: Option<Vec<u8>>,
    },
    /// Capabilities arrived; the caller must pick an authentication
    /// choice and call `provision`
    CapabilitiesReceived,
    /// The user must relay the value the device is outputting; call
    /// `set_output_oob_value` once they have
    AuthenticationRequired,
    /// Display this value so the user can input it on the device
    DisplayAuthValue(String),
    /// Provisioning finished; the node now holds its device key
    Complete,
    /// Provisioning failed
    Failed(ProvisioningError),
}
