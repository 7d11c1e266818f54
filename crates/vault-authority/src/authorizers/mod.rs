//! Kind-specific authorization policies
//!
//! The classifier output selects exactly one [`Authorizer`]. Each variant
//! implements [`Authorize`] over the same request and context, so the
//! dispatcher never branches on kind-specific details.

mod mailbox;
mod signed;

use crate::config::AuthorityConfig;
use crate::error::AuthorityError;
use crate::kind::DataKind;
use crate::operation::{Operation, Outcome};
use crate::verification::VerificationEngine;
use vault_store::ChunkStore;

/// One operation against one chunk
#[derive(Debug, Clone)]
pub struct Request<'a> {
    /// Requested operation
    pub operation: Operation,
    /// Chunk name
    pub name: &'a [u8],
    /// Submitted payload; empty for reads
    pub payload: &'a [u8],
    /// Public key the requester presents
    pub requester_key: &'a [u8],
    label: String,
}

impl<'a> Request<'a> {
    /// Build a request; `log_name_prefix` bounds the name bytes used in
    /// diagnostics.
    pub fn new(
        operation: Operation,
        name: &'a [u8],
        payload: &'a [u8],
        requester_key: &'a [u8],
        log_name_prefix: usize,
    ) -> Self {
        Self {
            operation,
            name,
            payload,
            requester_key,
            label: vault_core::hex_prefix(name, log_name_prefix),
        }
    }

    /// Hex prefix of the chunk name
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn unknown_failure(&self, reason: impl Into<String>) -> AuthorityError {
        AuthorityError::UnknownFailure {
            name: self.label.clone(),
            reason: reason.into(),
        }
    }
}

/// Collaborator handles available to an authorizer for one call
#[derive(Clone, Copy)]
pub struct AuthorizationContext<'a> {
    /// Chunk store
    pub store: &'a dyn ChunkStore,
    /// Integrity and ownership checks
    pub engine: VerificationEngine<'a>,
    /// Authority tunables
    pub config: &'a AuthorityConfig,
}

/// Authorization policy for one data kind
pub trait Authorize {
    /// Check `request` and, when permitted, carry it out against the store
    fn authorize(
        &self,
        ctx: &AuthorizationContext<'_>,
        request: &Request<'_>,
    ) -> Result<Outcome, AuthorityError>;
}

/// The policy selected for a chunk by its data kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorizer {
    /// Signed blobs; `hashable` chunks are named by their digest
    SignedData {
        /// Whether the name must equal the content digest
        hashable: bool,
    },
    /// Owner profile plus inbound contact requests
    SocialIdentityMailbox,
    /// Owner profile plus inbound encrypted messages
    MessagingMailbox,
}

impl Authorizer {
    /// Policy for `kind`, `None` for `Unknown`
    pub fn for_kind(kind: DataKind) -> Option<Self> {
        match kind {
            DataKind::HashableSigned | DataKind::Anmpid | DataKind::Mpid => {
                Some(Self::SignedData { hashable: true })
            }
            DataKind::NonHashableSigned => Some(Self::SignedData { hashable: false }),
            DataKind::Msid => Some(Self::SocialIdentityMailbox),
            DataKind::Mmid => Some(Self::MessagingMailbox),
            DataKind::Unknown => None,
        }
    }
}

impl Authorize for Authorizer {
    fn authorize(
        &self,
        ctx: &AuthorizationContext<'_>,
        request: &Request<'_>,
    ) -> Result<Outcome, AuthorityError> {
        match self {
            Self::SignedData { hashable } => signed::authorize(ctx, request, *hashable),
            Self::SocialIdentityMailbox => {
                mailbox::authorize::<crate::envelope::SocialIdentityMailbox>(ctx, request)
            }
            Self::MessagingMailbox => {
                mailbox::authorize::<crate::envelope::MessagingMailbox>(ctx, request)
            }
        }
    }
}
