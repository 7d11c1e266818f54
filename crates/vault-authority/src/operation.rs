//! Requested operations and their successful outcomes.

use std::fmt;

/// Operation requested against a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Existence check
    Has,
    /// Read
    Get,
    /// Create
    Store,
    /// Replace or mutate in place
    Update,
    /// Remove
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Has => "has",
            Self::Get => "get",
            Self::Store => "store",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// Successful result of processing a request.
///
/// Reads deliver their payloads here rather than through a side channel:
/// a signed-data read or a non-owner mailbox read yields one payload, an
/// owner mailbox read yields the drained queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation was carried out; nothing to deliver
    Completed,
    /// `Has` found no chunk under the name
    KeyUnique,
    /// `Has` found a chunk under the name
    KeyNotUnique,
    /// A single payload
    Delivered(Vec<u8>),
    /// Entries drained from a mailbox queue, in queue order
    DeliveredMany(Vec<Vec<u8>>),
}

impl Outcome {
    /// Whether this outcome carries any payload
    pub fn has_payload(&self) -> bool {
        matches!(self, Self::Delivered(_) | Self::DeliveredMany(_))
    }
}
