//! Property tests over classification and signed-data rules

mod common;

use common::*;
use proptest::prelude::*;
use vault_authority::kind::content_address;
use vault_authority::{
    classify, AuthorityError, DataKind, Envelope, GenericPacket, Operation, Outcome,
};
use vault_core::{SigningKeyPair, DIGEST_SIZE};
use vault_store::ChunkStore;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn classification_is_total(name in proptest::collection::vec(any::<u8>(), 0..2 * DIGEST_SIZE + 2)) {
        let kind = classify(&name);
        match name.len() {
            n if n == DIGEST_SIZE => prop_assert_eq!(kind, DataKind::HashableSigned),
            n if n == DIGEST_SIZE + 1 => prop_assert_eq!(kind, DataKind::from_tag(name[0])),
            _ => prop_assert_eq!(kind, DataKind::Unknown),
        }
    }

    #[test]
    fn stored_hashable_chunks_match_their_names(
        seed in any::<[u8; 32]>(),
        data in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let authority = authority();
        let owner = SigningKeyPair::from_seed(seed);
        let (name, payload) = hashable_chunk(&owner, &data);

        prop_assert_eq!(
            authority.process(Operation::Store, &name, &payload, &owner.public_key()),
            Ok(Outcome::Completed)
        );
        let stored = authority.store().get(&name).unwrap().unwrap();
        let packet = GenericPacket::decode(&stored).unwrap();
        let digest = packet.content_digest();
        prop_assert_eq!(digest.as_slice(), content_address(&name));
    }

    #[test]
    fn hashable_updates_always_rejected(
        signer in any::<[u8; 32]>(),
        requester in any::<[u8; 32]>(),
        data in proptest::collection::vec(any::<u8>(), 0..128),
        name in proptest::collection::vec(any::<u8>(), DIGEST_SIZE..=DIGEST_SIZE),
    ) {
        let authority = authority();
        let signer = SigningKeyPair::from_seed(signer);
        let requester = SigningKeyPair::from_seed(requester);
        let payload = GenericPacket::signed(&signer, data, DataKind::HashableSigned)
            .encode()
            .unwrap();

        let result = authority.process(Operation::Update, &name, &payload, &requester.public_key());
        prop_assert!(
            matches!(result, Err(AuthorityError::InvalidUpdate { .. })),
            "unexpected result: {:?}",
            result
        );
        prop_assert!(!authority.store().has(&name).unwrap());
    }

    #[test]
    fn second_store_never_overwrites(
        first in proptest::collection::vec(any::<u8>(), 0..64),
        second in proptest::collection::vec(any::<u8>(), 0..64),
        label in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let authority = authority();
        let owner = keys(1);
        let key = owner.public_key();
        let name = tagged(DataKind::NonHashableSigned, &label);
        let first = signed_payload(&owner, &first);

        prop_assert_eq!(
            authority.process(Operation::Store, &name, &first, &key),
            Ok(Outcome::Completed)
        );
        let result = authority.process(Operation::Store, &name, &signed_payload(&owner, &second), &key);
        prop_assert!(
            matches!(result, Err(AuthorityError::DuplicateNameFailure { .. })),
            "unexpected result: {:?}",
            result
        );
        prop_assert_eq!(authority.store().get(&name).unwrap(), Some(first));
    }
}
