//! Property-based tests for the proposal ledger
//!
//! Tests for:
//! - Vote-once: a second vote by the same account never changes a tally
//! - Tally: total votes equals the number of distinct accepted voters
//! - Ids: derivation is deterministic and only depends on the first 16 bytes

use super::book::ProposalLedger;
use super::option::VoteOption;
use super::proposal::{ProposalId, ProposalName, PROPOSAL_ID_LEN};
use crate::access::AccessControl;
use crate::error::RegistryError;
use crate::identity::Identity;
use proptest::prelude::*;
use std::collections::HashSet;

fn setup() -> (AccessControl, ProposalLedger, ProposalId) {
    let admin = Identity::from_bytes([1; 20]);
    let proposer = Identity::from_bytes([2; 20]);
    let mut access = AccessControl::new();
    access.initialize(admin).unwrap();
    access.grant_proposer_role(proposer, admin).unwrap();

    let mut ledger = ProposalLedger::new();
    let id = ledger
        .create_proposal(&access, ProposalName::new("Property").unwrap(), proposer)
        .unwrap();
    (access, ledger, id)
}

proptest! {
    /// Property: each account is counted at most once per proposal
    #[test]
    fn each_account_counted_once(
        votes in prop::collection::vec((0u8..8, 0u8..6), 0..64),
    ) {
        let (_, mut ledger, id) = setup();
        let mut accepted: HashSet<u8> = HashSet::new();

        for (voter_byte, code) in votes {
            let voter = Identity::from_bytes([voter_byte; 20]);
            let before = ledger.get_proposal(&id).unwrap().clone();
            let result = ledger.vote_proposal(id, code, voter);

            match result {
                Ok(receipt) => {
                    prop_assert!(accepted.insert(voter_byte), "accepted a second vote");
                    let after = ledger.get_proposal(&id).unwrap();
                    prop_assert_eq!(
                        after.votes_for(receipt.option),
                        before.votes_for(receipt.option) + 1
                    );
                }
                Err(RegistryError::DuplicateVote { account, .. }) => {
                    prop_assert_eq!(account, voter);
                    prop_assert!(accepted.contains(&voter_byte));
                    prop_assert_eq!(ledger.get_proposal(&id).unwrap(), &before);
                }
                Err(RegistryError::InvalidOption { code: bad }) => {
                    prop_assert!(VoteOption::try_from(bad).is_err());
                    prop_assert_eq!(ledger.get_proposal(&id).unwrap(), &before);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }

        let proposal = ledger.get_proposal(&id).unwrap();
        prop_assert_eq!(proposal.total_votes(), accepted.len() as u64);
    }

    /// Property: id derivation ignores everything past the id width
    #[test]
    fn id_depends_only_on_prefix(
        prefix in "[a-zA-Z0-9 ]{16}",
        tail_a in "[a-z]{0,16}",
        tail_b in "[a-z]{0,16}",
    ) {
        let a = ProposalName::new(&format!("{prefix}{tail_a}")).unwrap();
        let b = ProposalName::new(&format!("{prefix}{tail_b}")).unwrap();
        prop_assert_eq!(ProposalId::derive(&a), ProposalId::derive(&b));
        let derived = ProposalId::derive(&a);
        prop_assert_eq!(&derived.as_bytes()[..], &prefix.as_bytes()[..PROPOSAL_ID_LEN]);
    }

    /// Property: creating the same name twice stores exactly one record
    #[test]
    fn repeated_creation_stores_one_record(text in "[a-zA-Z0-9 ]{1,32}") {
        let (access, mut ledger, _) = setup();
        let proposer = Identity::from_bytes([2; 20]);
        let name = ProposalName::new(&text).unwrap();
        let before = ledger.len();

        let first = ledger.create_proposal(&access, name, proposer);
        let second = ledger.create_proposal(&access, name, proposer);

        prop_assert!(second.is_err());
        let expected = if first.is_ok() { before + 1 } else { before };
        prop_assert_eq!(ledger.len(), expected);
    }
}
