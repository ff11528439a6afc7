//! The registry facade.
//!
//! [`VotingRegistry`] owns one [`AccessControl`], one [`ProposalLedger`] and
//! the [`EventLog`]. Each method checks, mutates, then logs; a failed call
//! leaves all three untouched.

use crate::access::{AccessControl, Role};
use crate::error::RegistryResult;
use crate::events::{EventLog, RegistryEvent};
use crate::identity::Identity;
use crate::ledger::{Proposal, ProposalId, ProposalLedger, ProposalName};
use tracing::info;

/// Role-gated proposal and voting registry.
#[derive(Debug, Clone, Default)]
pub struct VotingRegistry {
    access: AccessControl,
    ledger: ProposalLedger,
    events: EventLog,
}

impl VotingRegistry {
    /// A registry whose access control has not been initialised yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with `deployer` as the initial admin.
    pub fn deploy(deployer: Identity) -> Self {
        let mut registry = Self::new();
        // A fresh access control accepts its first initialization.
        if let Ok(change) = registry.access.initialize(deployer) {
            registry.events.append(RegistryEvent::granted(change));
        }
        info!(%deployer, "registry deployed");
        registry
    }

    /// Grant Admin to `initial_admin`. Fails if already initialised.
    pub fn initialize(&mut self, initial_admin: Identity) -> RegistryResult<()> {
        let change = self.access.initialize(initial_admin)?;
        self.events.append(RegistryEvent::granted(change));
        Ok(())
    }

    pub fn grant_role(
        &mut self,
        role: Role,
        target: Identity,
        caller: Identity,
    ) -> RegistryResult<()> {
        let change = self.access.grant_role(role, target, caller)?;
        self.events.append(RegistryEvent::granted(change));
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        role: Role,
        target: Identity,
        caller: Identity,
    ) -> RegistryResult<()> {
        let change = self.access.revoke_role(role, target, caller)?;
        self.events.append(RegistryEvent::revoked(change));
        Ok(())
    }

    pub fn grant_proposer_role(&mut self, target: Identity, caller: Identity) -> RegistryResult<()> {
        self.grant_role(Role::Proposer, target, caller)
    }

    pub fn revoke_proposer_role(
        &mut self,
        target: Identity,
        caller: Identity,
    ) -> RegistryResult<()> {
        self.revoke_role(Role::Proposer, target, caller)
    }

    pub fn has_role(&self, role: Role, account: &Identity) -> bool {
        self.access.has_role(role, account)
    }

    /// Create a proposal. Requires the Proposer role.
    pub fn create_proposal(
        &mut self,
        name: ProposalName,
        caller: Identity,
    ) -> RegistryResult<ProposalId> {
        let id = self.ledger.create_proposal(&self.access, name, caller)?;
        self.events.append(RegistryEvent::ProposalCreated {
            id,
            name,
            creator: caller,
        });
        Ok(id)
    }

    /// Cast a vote. Open to any identity, once per proposal.
    pub fn vote_proposal(
        &mut self,
        id: ProposalId,
        option: u8,
        caller: Identity,
    ) -> RegistryResult<()> {
        let receipt = self.ledger.vote_proposal(id, option, caller)?;
        self.events.append(RegistryEvent::vote_cast(receipt));
        Ok(())
    }

    pub fn get_proposal(&self, id: &ProposalId) -> RegistryResult<&Proposal> {
        self.ledger.get_proposal(id)
    }

    pub fn has_voted(&self, id: &ProposalId, account: &Identity) -> bool {
        self.ledger.has_voted(id, account)
    }

    /// Read-only view of role assignments.
    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    /// Read-only view of the ledger.
    pub fn ledger(&self) -> &ProposalLedger {
        &self.ledger
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }
}
