//! Data classification by chunk name
//!
//! A name of exactly [`DIGEST_SIZE`] bytes is a plain content address. A
//! name one byte longer carries a leading type tag selecting the kind.
//! Anything else is unknown.

use serde::{Deserialize, Serialize};
use vault_core::DIGEST_SIZE;

/// Semantic class of a stored chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
#[repr(u8)]
pub enum DataKind {
    /// Not a recognised name shape or tag
    Unknown = 0,
    /// Signed data addressed by its own digest
    HashableSigned = 1,
    /// Signed data at a caller-chosen address
    NonHashableSigned = 2,
    /// Anonymous identity packet, content addressed
    Anmpid = 3,
    /// Public identity packet, content addressed
    Mpid = 4,
    /// Social-identity mailbox (contact requests)
    Msid = 5,
    /// Messaging mailbox (encrypted messages)
    Mmid = 6,
}

impl DataKind {
    /// Kind for a type tag; out-of-range tags map to `Unknown`.
    pub const fn from_tag(tag: u8) -> Self {
        match tag {
            1 => Self::HashableSigned,
            2 => Self::NonHashableSigned,
            3 => Self::Anmpid,
            4 => Self::Mpid,
            5 => Self::Msid,
            6 => Self::Mmid,
            _ => Self::Unknown,
        }
    }

    /// Type tag for this kind
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Whether chunks of this kind are named by the digest of their content
    pub const fn is_hashable(self) -> bool {
        matches!(self, Self::HashableSigned | Self::Anmpid | Self::Mpid)
    }
}

impl From<u8> for DataKind {
    fn from(tag: u8) -> Self {
        Self::from_tag(tag)
    }
}

impl From<DataKind> for u8 {
    fn from(kind: DataKind) -> Self {
        kind.tag()
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::HashableSigned => "hashable-signed",
            Self::NonHashableSigned => "non-hashable-signed",
            Self::Anmpid => "anmpid",
            Self::Mpid => "mpid",
            Self::Msid => "msid",
            Self::Mmid => "mmid",
        };
        f.write_str(label)
    }
}

/// Classify a chunk name.
pub fn classify(name: &[u8]) -> DataKind {
    if name.len() == DIGEST_SIZE {
        return DataKind::HashableSigned;
    }

    if name.len() == DIGEST_SIZE + 1 {
        let kind = DataKind::from_tag(name[0]);
        if kind != DataKind::Unknown {
            return kind;
        }
    }

    tracing::debug!(len = name.len(), tag = ?name.first(), "Unknown data type");
    DataKind::Unknown
}

/// The digest portion of a name: the whole name for untagged names, the
/// bytes after the tag otherwise.
pub fn content_address(name: &[u8]) -> &[u8] {
    if name.len() == DIGEST_SIZE + 1 {
        &name[1..]
    } else {
        name
    }
}

/// Build a tagged name from a kind and a digest.
pub fn tagged_name(kind: DataKind, digest: &[u8]) -> Vec<u8> {
    let mut name = Vec::with_capacity(digest.len() + 1);
    name.push(kind.tag());
    name.extend_from_slice(digest);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_sized_names_are_hashable_signed() {
        assert_eq!(classify(&[0u8; DIGEST_SIZE]), DataKind::HashableSigned);
        assert_eq!(classify(&[0xffu8; DIGEST_SIZE]), DataKind::HashableSigned);
    }

    #[test]
    fn tagged_names_select_their_kind() {
        for tag in 1u8..=6 {
            let name = tagged_name(DataKind::from_tag(tag), &[9u8; DIGEST_SIZE]);
            assert_eq!(classify(&name).tag(), tag);
        }
    }

    #[test]
    fn out_of_range_tags_are_unknown() {
        for tag in [0u8, 7, 42, 255] {
            let mut name = vec![tag];
            name.extend_from_slice(&[1u8; DIGEST_SIZE]);
            assert_eq!(classify(&name), DataKind::Unknown);
        }
    }

    #[test]
    fn other_lengths_are_unknown() {
        assert_eq!(classify(&[]), DataKind::Unknown);
        assert_eq!(classify(&[5u8; DIGEST_SIZE - 1]), DataKind::Unknown);
        assert_eq!(classify(&[5u8; DIGEST_SIZE + 2]), DataKind::Unknown);
    }

    #[test]
    fn content_address_strips_tag() {
        let digest = [3u8; DIGEST_SIZE];
        assert_eq!(content_address(&digest), &digest[..]);
        assert_eq!(content_address(&tagged_name(DataKind::Mpid, &digest)), &digest[..]);
    }

    #[test]
    fn hashable_kinds() {
        assert!(DataKind::HashableSigned.is_hashable());
        assert!(DataKind::Anmpid.is_hashable());
        assert!(DataKind::Mpid.is_hashable());
        assert!(!DataKind::NonHashableSigned.is_hashable());
        assert!(!DataKind::Msid.is_hashable());
        assert!(!DataKind::Mmid.is_hashable());
    }
}
