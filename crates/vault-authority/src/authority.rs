//! The chunk action authority: single entry point for chunk operations

use crate::authorizers::{AuthorizationContext, Authorize, Authorizer, Request};
use crate::config::AuthorityConfig;
use crate::error::AuthorityError;
use crate::kind::classify;
use crate::notification::NotificationChannel;
use crate::operation::{Operation, Outcome};
use crate::verification::VerificationEngine;
use std::sync::Arc;
use tracing::{debug, instrument};
use vault_core::{Ed25519Verifier, SignatureVerifier, VaultConfig};
use vault_store::ChunkStore;

/// Gatekeeper in front of a chunk store.
///
/// Holds only collaborator handles; all state lives in the store, keyed by
/// chunk name. Calls may run concurrently from several threads.
pub struct ChunkActionAuthority<S> {
    store: S,
    verifier: Arc<dyn SignatureVerifier>,
    config: AuthorityConfig,
    notifications: NotificationChannel,
}

impl<S: ChunkStore> ChunkActionAuthority<S> {
    /// Authority over `store` using Ed25519 signatures.
    ///
    /// Fails if `config` does not validate.
    pub fn new(store: S, config: AuthorityConfig) -> vault_core::Result<Self> {
        Self::with_verifier(store, config, Arc::new(Ed25519Verifier))
    }

    /// Authority over `store` using a custom signature scheme
    pub fn with_verifier(
        store: S,
        config: AuthorityConfig,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> vault_core::Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            verifier,
            config,
            notifications: NotificationChannel::new(),
        })
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    /// Listener registry for delivered payloads
    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    /// Authorize and carry out `operation` on chunk `name`.
    ///
    /// `Has` is answered directly. Every other operation is routed by the
    /// kind of `name`. Payloads produced by reads are returned in the
    /// outcome and emitted to listeners before this returns.
    #[instrument(
        level = "debug",
        skip_all,
        fields(op = %operation, name = %vault_core::hex_prefix(name, self.config.log_name_prefix))
    )]
    pub fn process(
        &self,
        operation: Operation,
        name: &[u8],
        payload: &[u8],
        requester_key: &[u8],
    ) -> Result<Outcome, AuthorityError> {
        let request = Request::new(
            operation,
            name,
            payload,
            requester_key,
            self.config.log_name_prefix,
        );

        if operation == Operation::Has {
            let exists = self
                .store
                .has(name)
                .map_err(|e| AuthorityError::ReadFailure {
                    name: request.label().to_string(),
                    reason: e.to_string(),
                })?;
            return Ok(if exists {
                Outcome::KeyNotUnique
            } else {
                Outcome::KeyUnique
            });
        }

        let kind = classify(name);
        let authorizer = Authorizer::for_kind(kind)
            .ok_or_else(|| request.unknown_failure("unknown data type"))?;

        let ctx = AuthorizationContext {
            store: &self.store,
            engine: VerificationEngine::new(self.verifier.as_ref()),
            config: &self.config,
        };

        let outcome = authorizer.authorize(&ctx, &request)?;
        debug!(%kind, outcome = outcome_label(&outcome), "Operation authorized");
        if outcome.has_payload() {
            self.notifications.emit(&outcome);
        }
        Ok(outcome)
    }
}

fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Completed => "completed",
        Outcome::KeyUnique => "key-unique",
        Outcome::KeyNotUnique => "key-not-unique",
        Outcome::Delivered(_) => "delivered",
        Outcome::DeliveredMany(_) => "delivered-many",
    }
}

impl<S> std::fmt::Debug for ChunkActionAuthority<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkActionAuthority")
            .field("verifier", &self.verifier)
            .field("config", &self.config)
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}
