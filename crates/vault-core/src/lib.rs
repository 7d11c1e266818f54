//! # Vault Core - Foundation
//!
//! **Purpose**: Shared primitives for the vault chunk authority stack.
//!
//! - Unified error type ([`CoreError`])
//! - Content digest ([`hash`]), fixed to a single algorithm
//! - Signature verification and key validation ([`crypto`])
//! - Canonical DAG-CBOR serialization ([`serialization`])
//! - Configuration loading traits ([`config`])
//!
//! Everything here is synchronous and free of storage concerns. Storage
//! lives in `vault-store`; authorization decisions live in `vault-authority`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Configuration loading and validation traits
pub mod config;
/// Digest and signature primitives
pub mod crypto;
/// Unified error type
pub mod errors;
/// Canonical record serialization
pub mod serialization;

pub use config::VaultConfig;
pub use crypto::hash::{self, Digest, DIGEST_SIZE};
pub use crypto::signature::{Ed25519Verifier, SignatureVerifier, SigningKeyPair};
pub use errors::{CoreError, Result};

/// Render at most `max` leading bytes of `bytes` as lowercase hex.
///
/// Used for log fields where full chunk names would be noise.
pub fn hex_prefix(bytes: &[u8], max: usize) -> String {
    let shown = bytes.len().min(max);
    let mut out = hex::encode(&bytes[..shown]);
    if bytes.len() > shown {
        out.push_str("..");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_prefix_truncates_long_names() {
        assert_eq!(hex_prefix(&[0xab, 0xcd, 0xef], 2), "abcd..");
        assert_eq!(hex_prefix(&[0x01, 0x02], 8), "0102");
        assert_eq!(hex_prefix(&[], 4), "");
    }
}
