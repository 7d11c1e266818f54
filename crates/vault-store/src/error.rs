//! Errors reported by chunk store backends.
//!
//! Names are reported in full; truncation for display is up to the caller.

/// Chunk store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `store` was called for a name that already holds a value
    #[error("Chunk already exists: {name}")]
    AlreadyExists {
        /// Hex-encoded chunk name
        name: String,
    },

    /// `modify` or `delete` was called for an absent name
    #[error("Chunk not found: {name}")]
    NotFound {
        /// Hex-encoded chunk name
        name: String,
    },

    /// The name cannot be used as a key by this backend
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// Why the key was refused
        reason: String,
    },

    /// Backend I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn already_exists(name: &[u8]) -> Self {
        Self::AlreadyExists {
            name: hex::encode(name),
        }
    }

    pub(crate) fn not_found(name: &[u8]) -> Self {
        Self::NotFound {
            name: hex::encode(name),
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
