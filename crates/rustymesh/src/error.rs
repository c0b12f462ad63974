//! Error types for the rustymesh library
//!
//! This module defines the top-level error type; each layer keeps its own
//! error enum and this one collects them for callers that work across
//! layers.

use thiserror::Error;

/// Errors that can occur when working with the mesh core
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Codec error: {0}")]
    Codec(#[from] crate::utils::CodecError),

    #[error("Device property error: {0}")]
    Property(#[from] crate::properties::PropertyError),

    #[error("Provisioning error: {0}")]
    Provisioning(#[from] crate::provisioning::ProvisioningError),
}
