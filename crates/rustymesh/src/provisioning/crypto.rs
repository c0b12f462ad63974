//! Cryptographic functions for the provisioning protocol
//!
//! Implements the salt and key-derivation primitives the Mesh Profile
//! defines on top of AES-CMAC (s1, k1), P-256 ECDH key agreement for the
//! public-key exchange, AES-CCM for the provisioning data PDU, and the
//! per-OOB-method authentication value rules.

use super::constants::*;
use super::types::{ProvisioningError, ProvisioningResult};
use aes::Aes128;
use ccm::aead::{Aead, KeyInit, Payload};
use ccm::consts::{U13, U8};
use ccm::Ccm;
use cmac::{Cmac, Mac};
use p256::ecdh;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::{EncodedPoint, PublicKey, SecretKey};
use rand::rngs::OsRng;
use rand::RngCore;

/// AES-CCM with the provisioning data parameters: 8-octet MIC,
/// 13-octet nonce
type Aes128Ccm = Ccm<Aes128, U8, U13>;

/// Character set for alphanumeric OOB values
const ALPHANUMERIC_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// AES-CMAC (Mesh Profile 3.8.2.2)
pub fn aes_cmac(key: &[u8; 16], message: &[u8]) -> [u8; 16] {
    let mut mac = <Cmac<Aes128> as Mac>::new(key.into());
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Salt function s1 (Mesh Profile 3.8.2.4): CMAC under an all-zero key.
pub fn s1(message: &[u8]) -> [u8; 16] {
    aes_cmac(&[0u8; 16], message)
}

/// Key derivation function k1 (Mesh Profile 3.8.2.5):
/// `k1(N, SALT, P) = CMAC(CMAC(SALT, N), P)`
pub fn k1(n: &[u8], salt: &[u8; 16], p: &[u8]) -> [u8; 16] {
    let t = aes_cmac(salt, n);
    aes_cmac(&t, p)
}

/// Generate a 16-byte random nonce.
pub fn generate_random_16() -> [u8; 16] {
    let mut value = [0u8; 16];
    OsRng.fill_bytes(&mut value);
    value
}

/// An ephemeral P-256 key pair for one provisioning session
#[derive(Clone)]
pub struct SessionKeyPair {
    secret: SecretKey,
    /// Raw X coordinate followed by Y, each left-padded to 32 octets
    public_xy: [u8; PUBLIC_KEY_XY_LEN],
}

impl SessionKeyPair {
    /// Generate a fresh key pair.
    pub fn generate() -> ProvisioningResult<Self> {
        let secret = SecretKey::random(&mut OsRng);
        let point = secret.public_key().to_encoded_point(false);

        let (x, y) = match (point.x(), point.y()) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(ProvisioningError::CryptoError(
                    "generated key has no affine coordinates".into(),
                ))
            }
        };

        let mut public_xy = [0u8; PUBLIC_KEY_XY_LEN];
        public_xy[..32].copy_from_slice(x);
        public_xy[32..].copy_from_slice(y);

        Ok(SessionKeyPair { secret, public_xy })
    }

    /// The raw X||Y form sent in the public key PDU.
    pub fn public_xy(&self) -> &[u8; PUBLIC_KEY_XY_LEN] {
        &self.public_xy
    }

    /// Compute the ECDH shared secret with a validated peer key.
    pub fn shared_secret(&self, peer: &PublicKey) -> [u8; 32] {
        let shared = ecdh::diffie_hellman(self.secret.to_nonzero_scalar(), peer.as_affine());
        let mut out = [0u8; 32];
        out.copy_from_slice(shared.raw_secret_bytes());
        out
    }
}

/// Validate a peer's raw X||Y public key as a point on curve P-256.
pub fn validate_public_key(xy: &[u8; PUBLIC_KEY_XY_LEN]) -> ProvisioningResult<PublicKey> {
    let mut x = [0u8; 32];
    let mut y = [0u8; 32];
    x.copy_from_slice(&xy[..32]);
    y.copy_from_slice(&xy[32..]);

    let point = EncodedPoint::from_affine_coordinates((&x).into(), (&y).into(), false);

    Option::from(PublicKey::from_encoded_point(&point))
        .ok_or(ProvisioningError::InvalidPublicKey)
}

/// Encrypt the provisioning data with AES-CCM (8-octet MIC).
pub fn ccm_encrypt(
    key: &[u8; 16],
    nonce: &[u8; SESSION_NONCE_LEN],
    plaintext: &[u8],
) -> ProvisioningResult<Vec<u8>> {
    let cipher = Aes128Ccm::new(key.into());
    cipher
        .encrypt(nonce.into(), plaintext)
        .map_err(|_| ProvisioningError::CryptoError("AES-CCM encryption failed".into()))
}

/// Decrypt an AES-CCM ciphertext with its trailing 8-octet MIC.
pub fn ccm_decrypt(
    key: &[u8; 16],
    nonce: &[u8; SESSION_NONCE_LEN],
    ciphertext: &[u8],
) -> ProvisioningResult<Vec<u8>> {
    let cipher = Aes128Ccm::new(key.into());
    cipher
        .decrypt(nonce.into(), Payload::from(ciphertext))
        .map_err(|_| ProvisioningError::CryptoError("AES-CCM authentication failed".into()))
}

/// Build the 16-byte authentication value for a numeric OOB value:
/// the number big-endian, left-padded with zeros.
pub fn auth_value_numeric(value: u32) -> [u8; AUTH_VALUE_LEN] {
    let mut out = [0u8; AUTH_VALUE_LEN];
    out[AUTH_VALUE_LEN - 4..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Build the 16-byte authentication value for an alphanumeric OOB value:
/// ASCII bytes left-aligned, zero-padded to the right.
pub fn auth_value_alphanumeric(value: &str) -> ProvisioningResult<[u8; AUTH_VALUE_LEN]> {
    if !value.is_ascii() || value.len() > AUTH_VALUE_LEN {
        return Err(ProvisioningError::InvalidPdu(
            "alphanumeric OOB value must be ASCII, at most 16 characters".into(),
        ));
    }

    let mut out = [0u8; AUTH_VALUE_LEN];
    out[..value.len()].copy_from_slice(value.as_bytes());
    Ok(out)
}

/// Generate a random numeric OOB value with at most `size` digits.
pub fn generate_numeric_oob(size: u8) -> u32 {
    let bound = 10u32.saturating_pow(u32::from(size.min(9)));
    rand::random::<u32>() % bound
}

/// Generate a random alphanumeric OOB value of `size` characters.
pub fn generate_alphanumeric_oob(size: u8) -> String {
    (0..size)
        .map(|_| {
            let index = rand::random::<usize>() % ALPHANUMERIC_CHARSET.len();
            ALPHANUMERIC_CHARSET[index] as char
        })
        .collect()
}
