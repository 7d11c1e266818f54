//! Mailbox policy shared by social-identity and messaging mailboxes
//!
//! A mailbox that does not exist yet can only be created by `Store`, with
//! a record whose self-signature verifies under the requester key. Once it
//! exists, the requester is either the owner (their key validates the
//! stored self-signature) or not:
//!
//! | op       | owner                           | non-owner                  |
//! |----------|---------------------------------|----------------------------|
//! | `Get`    | drain the queue                 | public identity packet     |
//! | `Store`  | rejected                        | append to the queue        |
//! | `Update` | no-op where the kind allows it  | rejected                   |
//! | `Delete` | delete the mailbox              | rejected                   |
//!
//! Appends and drains re-serialize the record and write it back with
//! `compare_and_swap` against the bytes that were read. A conflicting
//! writer causes the whole decision to be re-made from a fresh read.

use super::{AuthorizationContext, Request};
use crate::envelope::{
    DataWrapper, EncryptedMessage, Envelope, GenericPacket, MessagingMailbox,
    SocialIdentityMailbox,
};
use crate::error::AuthorityError;
use crate::kind::DataKind;
use crate::operation::{Operation, Outcome};
use serde_bytes::ByteBuf;
use tracing::{debug, error, warn};
use vault_core::serialization::SerializationError;

/// A mailbox record: owner credential plus a queue of inbound entries
pub(crate) trait MailboxRecord: Envelope {
    /// Kind tag carried by packets derived from this record
    const KIND: DataKind;

    /// Whether the owner may issue `Update`. The stored record is left as is.
    const OWNER_UPDATE: bool;

    /// Owner public key
    fn public_key(&self) -> &[u8];

    /// Owner self-signature over the public key
    fn signature(&self) -> &[u8];

    /// Number of queued entries
    fn queue_len(&self) -> usize;

    /// Append a non-owner submission to the queue
    fn admit(&mut self, request: &Request<'_>) -> Result<(), AuthorityError>;

    /// Empty the queue, returning its entries in delivered form
    fn drain(&mut self) -> Result<Vec<Vec<u8>>, SerializationError>;
}

impl MailboxRecord for SocialIdentityMailbox {
    const KIND: DataKind = DataKind::Msid;
    const OWNER_UPDATE: bool = true;

    fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    fn signature(&self) -> &[u8] {
        &self.signature
    }

    fn queue_len(&self) -> usize {
        self.encrypted_contacts.len()
    }

    fn admit(&mut self, request: &Request<'_>) -> Result<(), AuthorityError> {
        if !self.accepts_new_contacts {
            debug!(name = %request.label(), "Not accepting new contacts");
            return Err(AuthorityError::WontAcceptContact {
                name: request.label().to_string(),
            });
        }
        self.encrypted_contacts
            .push(ByteBuf::from(request.payload.to_vec()));
        Ok(())
    }

    fn drain(&mut self) -> Result<Vec<Vec<u8>>, SerializationError> {
        Ok(std::mem::take(&mut self.encrypted_contacts)
            .into_iter()
            .map(ByteBuf::into_vec)
            .collect())
    }
}

impl MailboxRecord for MessagingMailbox {
    const KIND: DataKind = DataKind::Mmid;
    const OWNER_UPDATE: bool = false;

    fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    fn signature(&self) -> &[u8] {
        &self.signature
    }

    fn queue_len(&self) -> usize {
        self.encrypted_messages.len()
    }

    fn admit(&mut self, request: &Request<'_>) -> Result<(), AuthorityError> {
        let message = EncryptedMessage::decode(request.payload).map_err(|e| {
            debug!(name = %request.label(), error = %e, "Failed to parse encrypted message");
            AuthorityError::InvalidSignedData {
                name: request.label().to_string(),
                reason: e.to_string(),
            }
        })?;
        self.encrypted_messages.push(message);
        Ok(())
    }

    fn drain(&mut self) -> Result<Vec<Vec<u8>>, SerializationError> {
        std::mem::take(&mut self.encrypted_messages)
            .iter()
            .map(|message| message.encode())
            .collect()
    }
}

enum Step {
    Done(Outcome),
    Conflict,
}

pub(super) fn authorize<M: MailboxRecord>(
    ctx: &AuthorizationContext<'_>,
    request: &Request<'_>,
) -> Result<Outcome, AuthorityError> {
    let Some(mut current) = read_current(ctx, request)? else {
        return first_write::<M>(ctx, request);
    };

    let attempts = ctx.config.cas_retry_limit;
    for attempt in 1..=attempts {
        match attempt_once::<M>(ctx, request, &current)? {
            Step::Done(outcome) => return Ok(outcome),
            Step::Conflict => {
                debug!(name = %request.label(), kind = %M::KIND, attempt, "Mailbox changed underneath, retrying");
            }
        }
        if attempt < attempts {
            current = match read_current(ctx, request)? {
                Some(bytes) => bytes,
                None => return first_write::<M>(ctx, request),
            };
        }
    }

    warn!(name = %request.label(), kind = %M::KIND, attempts, "Giving up on contended mailbox");
    Err(AuthorityError::ModifyFailure {
        name: request.label().to_string(),
        reason: format!("record kept changing across {attempts} attempts"),
    })
}

/// Stored mailbox bytes, `None` when there is no mailbox yet.
fn read_current(
    ctx: &AuthorizationContext<'_>,
    request: &Request<'_>,
) -> Result<Option<Vec<u8>>, AuthorityError> {
    let current = ctx
        .store
        .get(request.name)
        .map_err(|e| AuthorityError::ReadFailure {
            name: request.label().to_string(),
            reason: e.to_string(),
        })?;
    Ok(current.filter(|bytes| !bytes.is_empty()))
}

fn attempt_once<M: MailboxRecord>(
    ctx: &AuthorizationContext<'_>,
    request: &Request<'_>,
    current: &[u8],
) -> Result<Step, AuthorityError> {
    let mut wrapper = DataWrapper::decode(current).map_err(|e| corrupt(request, "wrapper", e))?;
    let mut record =
        M::decode(&wrapper.signed_data.data).map_err(|e| corrupt(request, "record", e))?;

    if ctx
        .engine
        .owns_mailbox(record.public_key(), record.signature(), request.requester_key)
    {
        owner_action(ctx, request, current, &mut wrapper, &mut record)
    } else {
        non_owner_action(ctx, request, current, &mut wrapper, &mut record)
    }
}

fn first_write<M: MailboxRecord>(
    ctx: &AuthorizationContext<'_>,
    request: &Request<'_>,
) -> Result<Outcome, AuthorityError> {
    if request.operation != Operation::Store {
        debug!(name = %request.label(), kind = %M::KIND, op = %request.operation, "No such mailbox");
        return Err(AuthorityError::VerifyDataFailure {
            name: request.label().to_string(),
        });
    }

    let store_failure = |reason: String| AuthorityError::StoreFailure {
        name: request.label().to_string(),
        reason,
    };

    let record = M::decode(request.payload).map_err(|e| {
        debug!(name = %request.label(), kind = %M::KIND, "Data doesn't parse");
        store_failure(format!("payload is not a mailbox record: {e}"))
    })?;

    if !ctx
        .engine
        .owns_mailbox(record.public_key(), record.signature(), request.requester_key)
    {
        debug!(name = %request.label(), kind = %M::KIND, "Failed validation of data");
        return Err(store_failure(
            "self-signature does not verify under requester key".to_string(),
        ));
    }

    let wrapper = DataWrapper::new(GenericPacket::new(
        request.payload.to_vec(),
        record.signature().to_vec(),
        M::KIND,
    ));
    let bytes = wrapper.encode().map_err(|e| store_failure(e.to_string()))?;
    ctx.store.store(request.name, bytes).map_err(|e| {
        warn!(name = %request.label(), error = %e, "Failed committing to chunk store");
        store_failure(e.to_string())
    })?;

    debug!(name = %request.label(), kind = %M::KIND, "Created mailbox");
    Ok(Outcome::Completed)
}

fn non_owner_action<M: MailboxRecord>(
    ctx: &AuthorizationContext<'_>,
    request: &Request<'_>,
    current: &[u8],
    wrapper: &mut DataWrapper,
    record: &mut M,
) -> Result<Step, AuthorityError> {
    match request.operation {
        Operation::Store => {
            record.admit(request)?;
            if write_back(ctx, request, current, wrapper, record)? {
                debug!(name = %request.label(), kind = %M::KIND, queued = record.queue_len(), "Appended to mailbox");
                Ok(Step::Done(Outcome::Completed))
            } else {
                Ok(Step::Conflict)
            }
        }
        Operation::Get => {
            let identity = GenericPacket::new(
                record.public_key().to_vec(),
                record.signature().to_vec(),
                M::KIND,
            );
            let bytes = identity
                .encode()
                .map_err(|e| corrupt(request, "identity packet", e))?;
            Ok(Step::Done(Outcome::Delivered(bytes)))
        }
        op => {
            debug!(name = %request.label(), kind = %M::KIND, %op, "Forbidden operation for non-owner");
            Err(request.unknown_failure(format!("{op} is not permitted for non-owners")))
        }
    }
}

fn owner_action<M: MailboxRecord>(
    ctx: &AuthorizationContext<'_>,
    request: &Request<'_>,
    current: &[u8],
    wrapper: &mut DataWrapper,
    record: &mut M,
) -> Result<Step, AuthorityError> {
    match request.operation {
        Operation::Get => {
            if record.queue_len() == 0 {
                return Ok(Step::Done(Outcome::Completed));
            }
            let entries = record
                .drain()
                .map_err(|e| corrupt(request, "queued entry", e))?;
            if write_back(ctx, request, current, wrapper, record)? {
                debug!(name = %request.label(), kind = %M::KIND, drained = entries.len(), "Drained mailbox");
                Ok(Step::Done(Outcome::DeliveredMany(entries)))
            } else {
                Ok(Step::Conflict)
            }
        }
        // Owner settings are not carried by update payloads; accepted unchanged.
        Operation::Update if M::OWNER_UPDATE => Ok(Step::Done(Outcome::Completed)),
        Operation::Delete => {
            ctx.store.delete(request.name).map_err(|e| {
                warn!(name = %request.label(), error = %e, "Failure to delete mailbox");
                AuthorityError::DeleteFailure {
                    name: request.label().to_string(),
                    reason: e.to_string(),
                }
            })?;
            debug!(name = %request.label(), kind = %M::KIND, "Deleted mailbox");
            Ok(Step::Done(Outcome::Completed))
        }
        op => Err(request.unknown_failure(format!("{op} is not an owner action for {}", M::KIND))),
    }
}

/// Persist `record` inside `wrapper` if the stored bytes are still `current`.
fn write_back<M: MailboxRecord>(
    ctx: &AuthorizationContext<'_>,
    request: &Request<'_>,
    current: &[u8],
    wrapper: &mut DataWrapper,
    record: &M,
) -> Result<bool, AuthorityError> {
    let modify_failure = |reason: String| AuthorityError::ModifyFailure {
        name: request.label().to_string(),
        reason,
    };

    wrapper.signed_data.data = record.encode().map_err(|e| modify_failure(e.to_string()))?;
    let bytes = wrapper.encode().map_err(|e| modify_failure(e.to_string()))?;
    ctx.store
        .compare_and_swap(request.name, current, bytes)
        .map_err(|e| {
            warn!(name = %request.label(), error = %e, "Failed to write back mailbox");
            modify_failure(e.to_string())
        })
}

fn corrupt(request: &Request<'_>, what: &str, err: SerializationError) -> AuthorityError {
    error!(name = %request.label(), error = %err, "Current {what} corrupted");
    AuthorityError::ParseFailure {
        name: request.label().to_string(),
        reason: format!("{what}: {err}"),
    }
}
