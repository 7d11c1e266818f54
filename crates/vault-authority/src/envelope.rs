//! Record shapes exchanged with callers and persisted in the store
//!
//! - [`GenericPacket`]: signed payload submitted for signed-data chunks
//! - [`DataWrapper`]: persisted form of mailbox chunks
//! - [`SocialIdentityMailbox`] / [`MessagingMailbox`]: mailbox records
//! - [`EncryptedMessage`]: one queued message in a messaging mailbox
//!
//! All records are DAG-CBOR encoded through [`Envelope`].

use crate::kind::DataKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;
use vault_core::hash::{signed_content_digest, Digest};
use vault_core::serialization::{self, SerializationError};
use vault_core::SigningKeyPair;

/// Encoding shared by every record type
pub trait Envelope: Serialize + DeserializeOwned {
    /// Parse a record from its wire form
    fn decode(bytes: &[u8]) -> Result<Self, SerializationError> {
        serialization::from_slice(bytes)
    }

    /// Serialize a record to its wire form
    fn encode(&self) -> Result<Vec<u8>, SerializationError> {
        serialization::to_vec(self)
    }
}

/// Signed payload: `signature = sign(data, owner_key)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericPacket {
    /// Payload bytes
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    /// Owner signature over `data`
    #[serde(with = "serde_bytes")]
    pub signature: Vec<u8>,
    /// Declared data kind
    pub kind: DataKind,
}

impl GenericPacket {
    /// Assemble a packet from parts
    pub fn new(data: Vec<u8>, signature: Vec<u8>, kind: DataKind) -> Self {
        Self {
            data,
            signature,
            kind,
        }
    }

    /// Sign `data` with `keys` and wrap it
    pub fn signed(keys: &SigningKeyPair, data: Vec<u8>, kind: DataKind) -> Self {
        let signature = keys.sign(&data);
        Self::new(data, signature, kind)
    }

    /// Digest of `data ‖ signature`, the content address of hashable chunks
    pub fn content_digest(&self) -> Digest {
        signed_content_digest(&self.data, &self.signature)
    }
}

impl Envelope for GenericPacket {}

/// Persisted wrapper around a signed mailbox record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataWrapper {
    /// Inner packet; `data` holds the serialized mailbox record
    pub signed_data: GenericPacket,
}

impl DataWrapper {
    /// Wrap a packet
    pub fn new(signed_data: GenericPacket) -> Self {
        Self { signed_data }
    }
}

impl Envelope for DataWrapper {}

/// Public mailbox for incoming relationship (contact) requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialIdentityMailbox {
    /// Owner public key
    #[serde(with = "serde_bytes")]
    pub public_key: Vec<u8>,
    /// Owner self-signature over `public_key`
    #[serde(with = "serde_bytes")]
    pub signature: Vec<u8>,
    /// Whether non-owners may append contact requests
    pub accepts_new_contacts: bool,
    /// Queued contact requests, oldest first
    pub encrypted_contacts: Vec<ByteBuf>,
}

impl SocialIdentityMailbox {
    /// Create an empty mailbox owned by `keys`
    pub fn new(keys: &SigningKeyPair, accepts_new_contacts: bool) -> Self {
        let public_key = keys.public_key();
        let signature = keys.sign(&public_key);
        Self {
            public_key,
            signature,
            accepts_new_contacts,
            encrypted_contacts: Vec::new(),
        }
    }
}

impl Envelope for SocialIdentityMailbox {}

/// One encrypted message queued in a messaging mailbox.
///
/// The authority only requires that submissions parse; the contents are
/// opaque to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMessage {
    /// Sender identifier
    #[serde(with = "serde_bytes")]
    pub sender: Vec<u8>,
    /// Encrypted message body
    #[serde(with = "serde_bytes")]
    pub ciphertext: Vec<u8>,
}

impl EncryptedMessage {
    /// Create a message record
    pub fn new(sender: Vec<u8>, ciphertext: Vec<u8>) -> Self {
        Self { sender, ciphertext }
    }
}

impl Envelope for EncryptedMessage {}

/// Mailbox for incoming encrypted messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingMailbox {
    /// Owner public key
    #[serde(with = "serde_bytes")]
    pub public_key: Vec<u8>,
    /// Owner self-signature over `public_key`
    #[serde(with = "serde_bytes")]
    pub signature: Vec<u8>,
    /// Queued messages, oldest first
    pub encrypted_messages: Vec<EncryptedMessage>,
}

impl MessagingMailbox {
    /// Create an empty mailbox owned by `keys`
    pub fn new(keys: &SigningKeyPair) -> Self {
        let public_key = keys.public_key();
        let signature = keys.sign(&public_key);
        Self {
            public_key,
            signature,
            encrypted_messages: Vec::new(),
        }
    }
}

impl Envelope for MessagingMailbox {}
