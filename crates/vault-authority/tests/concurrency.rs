//! Concurrent mailbox appends and drains

mod common;

use common::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use vault_authority::{AuthorityConfig, DataKind, Envelope, Operation, Outcome, SocialIdentityMailbox};

const WRITERS: u8 = 8;
const PER_WRITER: u16 = 25;

fn contended_authority() -> Arc<TestAuthority> {
    Arc::new(authority_with(AuthorityConfig {
        cas_retry_limit: 100_000,
        ..AuthorityConfig::default()
    }))
}

fn create_mailbox(authority: &TestAuthority) -> (Vec<u8>, Vec<u8>) {
    let owner = keys(0);
    let name = tagged(DataKind::Msid, b"shared");
    let record = SocialIdentityMailbox::new(&owner, true).encode().unwrap();
    authority
        .process(Operation::Store, &name, &record, &owner.public_key())
        .unwrap();
    (name, owner.public_key())
}

fn entry(writer: u8, n: u16) -> Vec<u8> {
    let mut bytes = vec![writer];
    bytes.extend_from_slice(&n.to_be_bytes());
    bytes
}

fn spawn_writers(authority: &Arc<TestAuthority>, name: &[u8]) -> Vec<thread::JoinHandle<()>> {
    (1..=WRITERS)
        .map(|writer| {
            let authority = Arc::clone(authority);
            let name = name.to_vec();
            thread::spawn(move || {
                let key = keys(writer).public_key();
                for n in 0..PER_WRITER {
                    assert_eq!(
                        authority.process(Operation::Store, &name, &entry(writer, n), &key),
                        Ok(Outcome::Completed)
                    );
                }
            })
        })
        .collect()
}

#[test]
fn concurrent_appends_are_not_lost() {
    let authority = contended_authority();
    let (name, owner_key) = create_mailbox(&authority);

    for handle in spawn_writers(&authority, &name) {
        handle.join().unwrap();
    }

    let Ok(Outcome::DeliveredMany(entries)) =
        authority.process(Operation::Get, &name, &[], &owner_key)
    else {
        panic!("expected queued contacts");
    };
    let unique: HashSet<_> = entries.iter().cloned().collect();
    assert_eq!(entries.len(), usize::from(WRITERS) * usize::from(PER_WRITER));
    assert_eq!(unique.len(), entries.len());

    // Per-writer order survives interleaving.
    for writer in 1..=WRITERS {
        let mine: Vec<_> = entries.iter().filter(|e| e[0] == writer).cloned().collect();
        let expected: Vec<_> = (0..PER_WRITER).map(|n| entry(writer, n)).collect();
        assert_eq!(mine, expected);
    }
}

#[test]
fn drains_racing_appends_deliver_each_entry_once() {
    let authority = contended_authority();
    let (name, owner_key) = create_mailbox(&authority);

    let writers = spawn_writers(&authority, &name);
    let drainer = {
        let authority = Arc::clone(&authority);
        let name = name.clone();
        let owner_key = owner_key.clone();
        thread::spawn(move || {
            let mut seen = Vec::new();
            for _ in 0..200 {
                if let Ok(Outcome::DeliveredMany(entries)) =
                    authority.process(Operation::Get, &name, &[], &owner_key)
                {
                    seen.extend(entries);
                }
                thread::yield_now();
            }
            seen
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    let mut delivered = drainer.join().unwrap();
    if let Ok(Outcome::DeliveredMany(rest)) =
        authority.process(Operation::Get, &name, &[], &owner_key)
    {
        delivered.extend(rest);
    }

    let unique: HashSet<_> = delivered.iter().cloned().collect();
    assert_eq!(unique.len(), delivered.len());
    assert_eq!(
        delivered.len(),
        usize::from(WRITERS) * usize::from(PER_WRITER)
    );
}

#[test]
fn exhausted_retries_surface_as_modify_failure() {
    use assert_matches::assert_matches;
    use vault_authority::AuthorityError;
    use vault_store::{ChunkStore, MemoryChunkStore, Result as StoreResult, StoreStats};

    /// Store whose compare-and-swap never succeeds
    #[derive(Debug, Default)]
    struct AlwaysConflicting(MemoryChunkStore);

    impl ChunkStore for AlwaysConflicting {
        fn has(&self, name: &[u8]) -> StoreResult<bool> {
            self.0.has(name)
        }
        fn get(&self, name: &[u8]) -> StoreResult<Option<Vec<u8>>> {
            self.0.get(name)
        }
        fn store(&self, name: &[u8], value: Vec<u8>) -> StoreResult<()> {
            self.0.store(name, value)
        }
        fn modify(&self, name: &[u8], value: Vec<u8>) -> StoreResult<()> {
            self.0.modify(name, value)
        }
        fn delete(&self, name: &[u8]) -> StoreResult<()> {
            self.0.delete(name)
        }
        fn compare_and_swap(&self, _: &[u8], _: &[u8], _: Vec<u8>) -> StoreResult<bool> {
            Ok(false)
        }
        fn stats(&self) -> StoreResult<StoreStats> {
            self.0.stats()
        }
    }

    init_tracing();
    let authority = vault_authority::ChunkActionAuthority::new(
        AlwaysConflicting::default(),
        AuthorityConfig {
            cas_retry_limit: 1,
            ..AuthorityConfig::default()
        },
    )
    .unwrap();
    let owner = keys(1);
    let name = tagged(DataKind::Msid, b"stuck");
    let record = SocialIdentityMailbox::new(&owner, true).encode().unwrap();

    // Creation is a plain insert and never contends.
    assert_eq!(
        authority.process(Operation::Store, &name, &record, &owner.public_key()),
        Ok(Outcome::Completed)
    );

    assert_matches!(
        authority.process(Operation::Store, &name, b"contact", &keys(2).public_key()),
        Err(AuthorityError::ModifyFailure { .. })
    );
}
