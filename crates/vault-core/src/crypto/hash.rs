//! Pure synchronous digest for content addressing
//!
//! Hashable chunks are named by the digest of their signed payload, so
//! every component that checks or derives a chunk name must agree on one
//! algorithm. That agreement lives here: the `ALGORITHM` constant is the
//! single selection point, and the free functions [`hash`] and [`hasher`]
//! route through it.
//!
//! Current algorithm: **SHA-512** (512-bit / 64-byte output)
//!
//! ```ignore
//! use vault_core::hash::{hash, DIGEST_SIZE};
//!
//! let digest = hash(b"hello world");
//! assert_eq!(digest.len(), DIGEST_SIZE);
//! ```

use sha2::{Digest as _, Sha512};
use std::fmt;

/// Size in bytes of every digest produced by this module.
pub const DIGEST_SIZE: usize = 64;

/// Fixed-size digest output.
pub type Digest = [u8; DIGEST_SIZE];

/// Synchronous trait for content-addressing digests
pub trait HashAlgorithm: Send + Sync + fmt::Debug {
    /// Hash arbitrary bytes to a fixed-size digest
    fn hash(&self, data: &[u8]) -> Digest;

    /// Create an incremental hasher for multi-part hashing
    fn hasher(&self) -> Box<dyn Hasher>;
}

/// Trait for incremental hashing of multi-part data
pub trait Hasher: Send {
    /// Update the hasher with more data
    fn update(&mut self, data: &[u8]);

    /// Finalize the hasher and return the digest
    fn finalize(self: Box<Self>) -> Digest;
}

/// SHA-512 hash implementation
#[derive(Debug, Clone, Copy)]
pub struct Sha512Algorithm;

impl HashAlgorithm for Sha512Algorithm {
    fn hash(&self, data: &[u8]) -> Digest {
        let mut hasher = Sha512::new();
        hasher.update(data);
        let result = hasher.finalize();
        let mut output = [0u8; DIGEST_SIZE];
        output.copy_from_slice(&result);
        output
    }

    fn hasher(&self) -> Box<dyn Hasher> {
        Box::new(Sha512Hasher(Sha512::new()))
    }
}

struct Sha512Hasher(Sha512);

impl Hasher for Sha512Hasher {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        let result = self.0.finalize();
        let mut output = [0u8; DIGEST_SIZE];
        output.copy_from_slice(&result);
        output
    }
}

/// The digest algorithm used for every chunk name in the system.
pub const ALGORITHM: Sha512Algorithm = Sha512Algorithm;

/// Hash `data` with the global algorithm.
#[inline]
pub fn hash(data: &[u8]) -> Digest {
    ALGORITHM.hash(data)
}

/// Create an incremental hasher using the global algorithm.
#[inline]
pub fn hasher() -> Box<dyn Hasher> {
    ALGORITHM.hasher()
}

/// Digest of the concatenation `data ‖ signature`.
///
/// This is the expected name of a hashable signed chunk.
pub fn signed_content_digest(data: &[u8], signature: &[u8]) -> Digest {
    let mut h = hasher();
    h.update(data);
    h.update(signature);
    h.finalize()
}

/// Constant-time comparison of a digest against a candidate address.
pub fn digest_matches(digest: &Digest, address: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    if address.len() != DIGEST_SIZE {
        return false;
    }
    digest.as_slice().ct_eq(address).into()
}
