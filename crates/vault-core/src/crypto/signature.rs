//! Ed25519 signature verification for chunk ownership checks
//!
//! The authority never signs anything itself; it only checks that a payload
//! or an ownership credential verifies under the requester's public key.
//! Malformed keys and signatures are reported as a failed verification
//! rather than an error, so callers see one boolean per check.

use crate::errors::{CoreError, Result};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use std::fmt;

/// Length in bytes of an encoded Ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

/// Length in bytes of an encoded Ed25519 signature.
pub const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Signature verification as consumed by the chunk authority.
pub trait SignatureVerifier: Send + Sync + fmt::Debug {
    /// Whether `public_key` decodes as a usable verification key.
    fn key_is_valid(&self, public_key: &[u8]) -> bool;

    /// Whether `signature` is a valid signature over `message` by `public_key`.
    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool;
}

/// Default verifier backed by `ed25519-dalek`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl Ed25519Verifier {
    fn decode_key(public_key: &[u8]) -> Option<VerifyingKey> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] = public_key.try_into().ok()?;
        VerifyingKey::from_bytes(&bytes).ok()
    }
}

impl SignatureVerifier for Ed25519Verifier {
    fn key_is_valid(&self, public_key: &[u8]) -> bool {
        Self::decode_key(public_key).is_some()
    }

    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        let Some(key) = Self::decode_key(public_key) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        key.verify_strict(message, &signature).is_ok()
    }
}

/// Ed25519 key pair for clients that submit signed chunks.
#[derive(Clone)]
pub struct SigningKeyPair {
    signing_key: SigningKey,
}

impl SigningKeyPair {
    /// Derive a key pair from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Generate a fresh key pair from the operating system RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// Reconstruct a key pair from secret key bytes of arbitrary origin.
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self> {
        let seed: [u8; 32] = secret
            .try_into()
            .map_err(|_| CoreError::crypto("Ed25519 secret key must be 32 bytes"))?;
        Ok(Self::from_seed(seed))
    }

    /// Encoded public key.
    pub fn public_key(&self) -> Vec<u8> {
        self.signing_key.verifying_key().to_bytes().to_vec()
    }

    /// Sign `message`, returning the encoded signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }
}

impl fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("public_key", &hex::encode(self.public_key()))
            .finish_non_exhaustive()
    }
}
