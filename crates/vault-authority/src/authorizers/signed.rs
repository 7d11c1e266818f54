//! Signed-data policy
//!
//! Integrity is checked first, then ownership of the current record where
//! one must exist, and only then is the store touched.

use super::{AuthorizationContext, Request};
use crate::error::AuthorityError;
use crate::operation::{Operation, Outcome};
use tracing::{debug, warn};
use vault_store::StoreError;

pub(super) fn authorize(
    ctx: &AuthorizationContext<'_>,
    request: &Request<'_>,
    hashable: bool,
) -> Result<Outcome, AuthorityError> {
    match request.operation {
        Operation::Store => store(ctx, request, hashable),
        Operation::Delete => {
            ctx.engine.integrity_check(request, hashable)?;
            ctx.engine.verify_current_owner(request, ctx.store)?;
            ctx.store.delete(request.name).map_err(|e| {
                warn!(name = %request.label(), error = %e, "Error deleting packet");
                AuthorityError::DeleteFailure {
                    name: request.label().to_string(),
                    reason: e.to_string(),
                }
            })?;
            debug!(name = %request.label(), "Deleted signed data");
            Ok(Outcome::Completed)
        }
        Operation::Update => {
            ctx.engine.integrity_check(request, hashable)?;
            ctx.engine.verify_current_owner(request, ctx.store)?;
            ctx.store
                .modify(request.name, request.payload.to_vec())
                .map_err(|e| {
                    warn!(name = %request.label(), error = %e, "Error modifying packet");
                    AuthorityError::ModifyFailure {
                        name: request.label().to_string(),
                        reason: e.to_string(),
                    }
                })?;
            debug!(name = %request.label(), "Updated signed data");
            Ok(Outcome::Completed)
        }
        Operation::Get => {
            ctx.engine.integrity_check(request, hashable)?;
            let current = ctx.engine.verify_current_owner(request, ctx.store)?;
            Ok(Outcome::Delivered(current))
        }
        Operation::Has => Err(request.unknown_failure("existence checks are not authorized per kind")),
    }
}

fn store(
    ctx: &AuthorizationContext<'_>,
    request: &Request<'_>,
    hashable: bool,
) -> Result<Outcome, AuthorityError> {
    let duplicate = || AuthorityError::DuplicateNameFailure {
        name: request.label().to_string(),
    };

    let exists = ctx
        .store
        .has(request.name)
        .map_err(|e| AuthorityError::ReadFailure {
            name: request.label().to_string(),
            reason: e.to_string(),
        })?;
    if exists {
        debug!(name = %request.label(), "Name of data exists. Use update.");
        return Err(duplicate());
    }

    ctx.engine.integrity_check(request, hashable)?;

    match ctx.store.store(request.name, request.payload.to_vec()) {
        Ok(()) => {
            debug!(name = %request.label(), hashable, "Stored signed data");
            Ok(Outcome::Completed)
        }
        // Lost a race with a concurrent store of the same name.
        Err(StoreError::AlreadyExists { .. }) => Err(duplicate()),
        Err(e) => {
            warn!(name = %request.label(), error = %e, "ChunkStore store failure");
            Err(AuthorityError::StoreFailure {
                name: request.label().to_string(),
                reason: e.to_string(),
            })
        }
    }
}
