//! Shared fixtures for authority integration tests
#![allow(dead_code)]

use std::sync::Arc;
use vault_authority::kind::tagged_name;
use vault_authority::{
    AuthorityConfig, ChunkActionAuthority, DataKind, DataWrapper, Envelope, GenericPacket,
    MessagingMailbox, SocialIdentityMailbox,
};
use vault_core::{hash::hash, SigningKeyPair};
use vault_store::{ChunkStore, MemoryChunkStore};

pub type TestAuthority = ChunkActionAuthority<Arc<MemoryChunkStore>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn authority() -> TestAuthority {
    authority_with(AuthorityConfig::default())
}

pub fn authority_with(config: AuthorityConfig) -> TestAuthority {
    init_tracing();
    ChunkActionAuthority::new(Arc::new(MemoryChunkStore::new()), config).unwrap()
}

pub fn keys(seed: u8) -> SigningKeyPair {
    SigningKeyPair::from_seed([seed; 32])
}

/// Content-addressed chunk: `(name, payload)` with `name = hash(data ‖ sig)`.
pub fn hashable_chunk(keys: &SigningKeyPair, data: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let packet = GenericPacket::signed(keys, data.to_vec(), DataKind::HashableSigned);
    (packet.content_digest().to_vec(), packet.encode().unwrap())
}

/// Content-addressed chunk under a tagged name of `kind`.
pub fn tagged_hashable_chunk(
    kind: DataKind,
    keys: &SigningKeyPair,
    data: &[u8],
) -> (Vec<u8>, Vec<u8>) {
    let packet = GenericPacket::signed(keys, data.to_vec(), kind);
    (
        tagged_name(kind, &packet.content_digest()),
        packet.encode().unwrap(),
    )
}

/// Name for a caller-addressed chunk of `kind`, derived from `label`.
pub fn tagged(kind: DataKind, label: &[u8]) -> Vec<u8> {
    tagged_name(kind, &hash(label))
}

/// Signed packet for non-hashable data.
pub fn signed_payload(keys: &SigningKeyPair, data: &[u8]) -> Vec<u8> {
    GenericPacket::signed(keys, data.to_vec(), DataKind::NonHashableSigned)
        .encode()
        .unwrap()
}

pub fn stored_wrapper(authority: &TestAuthority, name: &[u8]) -> DataWrapper {
    let bytes = authority.store().get(name).unwrap().expect("chunk present");
    DataWrapper::decode(&bytes).unwrap()
}

pub fn stored_msid(authority: &TestAuthority, name: &[u8]) -> SocialIdentityMailbox {
    SocialIdentityMailbox::decode(&stored_wrapper(authority, name).signed_data.data).unwrap()
}

pub fn stored_mmid(authority: &TestAuthority, name: &[u8]) -> MessagingMailbox {
    MessagingMailbox::decode(&stored_wrapper(authority, name).signed_data.data).unwrap()
}
