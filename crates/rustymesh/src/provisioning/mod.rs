//! Bluetooth Mesh provisioning (provisioner role)
//!
//! Implements the provisioning handshake that turns an unprovisioned
//! device into a mesh node: invite, capabilities negotiation, ECDH key
//! exchange, OOB authentication, confirmation, and encrypted delivery of
//! the network credentials.
//!
//! The [`ProvisioningManager`] drives concurrent sessions over a
//! caller-supplied [`ProvisioningTransport`]; the lower modules hold the
//! per-step PDU logic ([`state`]), the crypto primitives ([`crypto`]) and
//! the session record ([`node`]).

mod capabilities;
pub mod constants;
pub mod crypto;
mod manager;
mod node;
pub mod state;
mod types;

pub use capabilities::ProvisioningCapabilities;
pub use manager::{
    ProvisioningEventCallback, ProvisioningManager, ProvisioningTransport, UnicastAllocator,
};
pub use node::UnprovisionedNode;
pub use state::{generate_confirmation_inputs, ProvisioningState};
pub use types::{
    AuthenticationChoice, AuthenticationMethod, FailureReason, InputOobAction, InputOobActions,
    OutputOobAction, OutputOobActions, ProvisioningError, ProvisioningEvent, ProvisioningResult,
};
