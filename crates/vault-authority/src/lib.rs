//! # Vault Authority - Chunk Action Authority
//!
//! **Purpose**: Decide whether a read or mutation of a stored chunk is
//! permitted, and carry it out against the chunk store when it is.
//!
//! Every `Get`, `Store`, `Update` and `Delete` against the store passes
//! through [`ChunkActionAuthority::process`]. The authority trusts nothing
//! about the caller except the public key it presents:
//!
//! 1. The chunk name is classified into a [`DataKind`] from its length and
//!    an optional leading type tag.
//! 2. The kind selects an [`Authorizer`]: signed data (hashable or not), a
//!    social-identity mailbox, or a messaging mailbox.
//! 3. The authorizer runs the shared [`VerificationEngine`] checks and only
//!    then touches the store.
//!
//! Reads that yield data return it in the [`Outcome`] and also emit it on
//! the [`NotificationChannel`] for any registered listeners.
//!
//! ## Mailboxes
//!
//! Mailbox chunks pair an owner identity (public key plus self-signature)
//! with a queue written by third parties. Non-owners may append and may
//! read the public identity; only the owner may drain the queue or delete
//! the mailbox. Appends and drains go through the store's
//! compare-and-swap, so concurrent writers never lose entries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// The dispatcher
pub mod authority;
/// Kind-specific authorization policies
pub mod authorizers;
/// Authority configuration
pub mod config;
/// Record shapes exchanged with callers and persisted in the store
pub mod envelope;
/// Rejection taxonomy
pub mod error;
/// Data classification
pub mod kind;
/// Result delivery to listeners
pub mod notification;
/// Operations and outcomes
pub mod operation;
/// Integrity and ownership checks
pub mod verification;

pub use authority::ChunkActionAuthority;
pub use authorizers::{Authorize, Authorizer, Request};
pub use config::AuthorityConfig;
pub use envelope::{
    DataWrapper, EncryptedMessage, Envelope, GenericPacket, MessagingMailbox,
    SocialIdentityMailbox,
};
pub use error::{AuthorityError, ReturnCode};
pub use kind::{classify, DataKind};
pub use notification::{NotificationChannel, Subscription};
pub use operation::{Operation, Outcome};
pub use verification::VerificationEngine;
