//! Cryptographic primitives consumed by the chunk authority.
//!
//! Hashing is a pure function and is exposed directly; signature checks go
//! through [`signature::SignatureVerifier`] so that the authority can be
//! driven by a different scheme without touching its decision logic.

/// Content digest (SHA-512)
pub mod hash;
/// Ed25519 signature verification and key validation
pub mod signature;
