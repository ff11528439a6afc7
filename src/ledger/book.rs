//! Proposal creation, vote intake and tally reads.

use super::option::VoteOption;
use super::proposal::{Proposal, ProposalId, ProposalName};
use crate::access::{AccessControl, Role};
use crate::error::{RegistryError, RegistryResult};
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

/// An accepted vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub id: ProposalId,
    pub voter: Identity,
    pub option: VoteOption,
}

/// Proposals and the per-account vote record.
///
/// Role checks read an [`AccessControl`] passed in by the caller; the ledger
/// never mutates role state.
#[derive(Debug, Clone, Default)]
pub struct ProposalLedger {
    proposals: BTreeMap<ProposalId, Proposal>,
    /// proposal -> accounts that have voted on it
    voters: HashMap<ProposalId, HashSet<Identity>>,
}

impl ProposalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a proposal named `name` on behalf of `caller`.
    ///
    /// Requires the Proposer role. Fails with `ProposalAlreadyExists` when
    /// the derived id is taken, including by a different name that truncates
    /// to the same id.
    pub fn create_proposal(
        &mut self,
        access: &AccessControl,
        name: ProposalName,
        caller: Identity,
    ) -> RegistryResult<ProposalId> {
        access
            .check_role(Role::Proposer, &caller)
            .inspect_err(|_| warn!(account = %caller, %name, "create rejected: not a proposer"))?;

        let id = ProposalId::derive(&name);
        if let Some(existing) = self.proposals.get(&id) {
            warn!(%id, %name, existing = %existing.name, "create rejected: id taken");
            return Err(RegistryError::ProposalAlreadyExists { id });
        }

        self.proposals.insert(id, Proposal::new(name, caller));
        self.voters.insert(id, HashSet::new());
        info!(%id, %name, creator = %caller, "proposal created");

        Ok(id)
    }

    /// Cast `caller`'s vote for option `code` on proposal `id`.
    ///
    /// Every check runs before anything is written; the vote record and the
    /// counter are then updated together.
    pub fn vote_proposal(
        &mut self,
        id: ProposalId,
        code: u8,
        caller: Identity,
    ) -> RegistryResult<VoteReceipt> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(RegistryError::ProposalNotFound { id })?;

        let option = VoteOption::try_from(code)
            .inspect_err(|_| warn!(%id, voter = %caller, code, "vote rejected: invalid option"))?;

        let voters = self.voters.entry(id).or_default();
        if voters.contains(&caller) {
            warn!(%id, voter = %caller, "vote rejected: already voted");
            return Err(RegistryError::DuplicateVote {
                account: caller,
                id,
            });
        }

        voters.insert(caller);
        proposal.record_vote(option);
        info!(%id, voter = %caller, %option, "vote cast");

        Ok(VoteReceipt {
            id,
            voter: caller,
            option,
        })
    }

    /// Look up a proposal.
    pub fn get_proposal(&self, id: &ProposalId) -> RegistryResult<&Proposal> {
        debug!(%id, "proposal lookup");
        self.proposals
            .get(id)
            .ok_or(RegistryError::ProposalNotFound { id: *id })
    }

    /// Whether `account` has voted on `id`. False for unknown proposals.
    pub fn has_voted(&self, id: &ProposalId, account: &Identity) -> bool {
        self.voters
            .get(id)
            .is_some_and(|voters| voters.contains(account))
    }

    /// Stored proposals in id order.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}
