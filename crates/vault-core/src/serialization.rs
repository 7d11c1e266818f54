//! DAG-CBOR serialization for persisted and submitted records
//!
//! Every envelope that crosses the authority boundary is encoded with
//! DAG-CBOR. The encoding is deterministic, so re-serializing an unchanged
//! record yields identical bytes, which the store's compare-and-swap relies on.

use serde::{Deserialize, Serialize};

/// Error type for serialization operations
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// DAG-CBOR decoding error
    #[error("DAG-CBOR error: {0}")]
    DagCbor(String),

    /// Value could not be encoded
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Result type for serialization operations
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serialize any serde-compatible type to DAG-CBOR bytes
pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_ipld_dagcbor::to_vec(value).map_err(|e| {
        SerializationError::InvalidFormat(format!("Failed to serialize to DAG-CBOR: {e}"))
    })
}

/// Deserialize DAG-CBOR bytes to any serde-compatible type
pub fn from_slice<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T> {
    serde_ipld_dagcbor::from_slice(bytes).map_err(|e| SerializationError::DagCbor(e.to_string()))
}

impl From<SerializationError> for crate::CoreError {
    fn from(err: SerializationError) -> Self {
        Self::serialization(err.to_string())
    }
}
