//! Integrity and ownership checks shared by all authorizers

use crate::authorizers::Request;
use crate::envelope::{Envelope, GenericPacket};
use crate::error::AuthorityError;
use crate::kind::content_address;
use crate::operation::Operation;
use tracing::debug;
use vault_core::hash::digest_matches;
use vault_core::SignatureVerifier;
use vault_store::ChunkStore;

/// Verification primitives over a signature scheme
#[derive(Debug, Clone, Copy)]
pub struct VerificationEngine<'a> {
    verifier: &'a dyn SignatureVerifier,
}

impl<'a> VerificationEngine<'a> {
    /// Engine backed by `verifier`
    pub fn new(verifier: &'a dyn SignatureVerifier) -> Self {
        Self { verifier }
    }

    /// Check that a submitted payload is a well-formed packet signed by the
    /// requester, and for hashable kinds that it is named by its digest.
    ///
    /// `Get` carries no payload and always passes.
    pub fn integrity_check(
        &self,
        request: &Request<'_>,
        hashable: bool,
    ) -> Result<(), AuthorityError> {
        if request.operation == Operation::Get {
            return Ok(());
        }

        let packet = GenericPacket::decode(request.payload).map_err(|e| {
            debug!(name = %request.label(), error = %e, "Data doesn't parse as a GenericPacket");
            AuthorityError::InvalidSignedData {
                name: request.label().to_string(),
                reason: e.to_string(),
            }
        })?;

        if hashable {
            if request.operation == Operation::Update {
                debug!(name = %request.label(), "No update of hashable data allowed");
                return Err(AuthorityError::InvalidUpdate {
                    name: request.label().to_string(),
                });
            }
            if !digest_matches(&packet.content_digest(), content_address(request.name)) {
                debug!(name = %request.label(), "Marked hashable, doesn't hash");
                return Err(AuthorityError::NotHashable {
                    name: request.label().to_string(),
                });
            }
        }

        if !self
            .verifier
            .verify(&packet.data, &packet.signature, request.requester_key)
        {
            debug!(name = %request.label(), "Signature verification failed");
            return Err(AuthorityError::SignatureVerificationFailure {
                name: request.label().to_string(),
            });
        }

        Ok(())
    }

    /// Fetch the current record and check the requester owns it.
    ///
    /// A requester key that is not a valid key skips the comparison. On
    /// success the stored bytes are returned for further use.
    pub fn verify_current_owner(
        &self,
        request: &Request<'_>,
        store: &dyn ChunkStore,
    ) -> Result<Vec<u8>, AuthorityError> {
        let current = store
            .get(request.name)
            .map_err(|e| AuthorityError::ReadFailure {
                name: request.label().to_string(),
                reason: e.to_string(),
            })?
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| {
                debug!(name = %request.label(), "Failure to get current data");
                AuthorityError::VerifyDataFailure {
                    name: request.label().to_string(),
                }
            })?;

        let packet = GenericPacket::decode(&current).map_err(|e| {
            debug!(name = %request.label(), error = %e, "Stored data doesn't parse as a GenericPacket");
            AuthorityError::InvalidSignedData {
                name: request.label().to_string(),
                reason: e.to_string(),
            }
        })?;

        if self.verifier.key_is_valid(request.requester_key)
            && !self
                .verifier
                .verify(&packet.data, &packet.signature, request.requester_key)
        {
            debug!(name = %request.label(), "Not owner of packet");
            return Err(AuthorityError::NotOwner {
                name: request.label().to_string(),
            });
        }

        Ok(current)
    }

    /// Whether `requester_key` validates a mailbox owner's self-signature
    pub fn owns_mailbox(&self, public_key: &[u8], signature: &[u8], requester_key: &[u8]) -> bool {
        self.verifier.verify(public_key, signature, requester_key)
    }
}
