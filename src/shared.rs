//! Thread-safe registry handle.
//!
//! All role, proposal and vote state sits behind one mutex, held for the
//! whole of every operation, so calls from many threads or tasks are applied
//! one at a time in some global order. Committed events are published to
//! subscribers while the lock is still held, which keeps the published order
//! identical to the log order.

use crate::access::Role;
use crate::error::RegistryResult;
use crate::events::EventRecord;
use crate::identity::Identity;
use crate::ledger::{Proposal, ProposalId, ProposalName};
use crate::registry::VotingRegistry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Cloneable, thread-safe handle to a [`VotingRegistry`].
#[derive(Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<VotingRegistry>>,
    events: broadcast::Sender<EventRecord>,
}

impl SharedRegistry {
    /// Wrap an existing registry.
    pub fn new(registry: VotingRegistry) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(registry)),
            events,
        }
    }

    /// Deploy a fresh registry with `deployer` as admin.
    pub fn deploy(deployer: Identity) -> Self {
        Self::new(VotingRegistry::deploy(deployer))
    }

    /// Make `admin` the first Admin of a registry wrapped uninitialized.
    pub fn initialize(&self, admin: Identity) -> RegistryResult<()> {
        self.mutate(|registry| registry.initialize(admin))
    }

    /// Receive every event committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.events.subscribe()
    }

    pub fn grant_role(&self, role: Role, target: Identity, caller: Identity) -> RegistryResult<()> {
        self.mutate(|registry| registry.grant_role(role, target, caller))
    }

    pub fn revoke_role(&self, role: Role, target: Identity, caller: Identity) -> RegistryResult<()> {
        self.mutate(|registry| registry.revoke_role(role, target, caller))
    }

    pub fn create_proposal(
        &self,
        name: ProposalName,
        caller: Identity,
    ) -> RegistryResult<ProposalId> {
        self.mutate(|registry| registry.create_proposal(name, caller))
    }

    pub fn vote_proposal(&self, id: ProposalId, option: u8, caller: Identity) -> RegistryResult<()> {
        self.mutate(|registry| registry.vote_proposal(id, option, caller))
    }

    pub fn has_role(&self, role: Role, account: &Identity) -> bool {
        self.lock().has_role(role, account)
    }

    pub fn has_voted(&self, id: &ProposalId, account: &Identity) -> bool {
        self.lock().has_voted(id, account)
    }

    /// Copy of the stored proposal.
    pub fn get_proposal(&self, id: &ProposalId) -> RegistryResult<Proposal> {
        self.lock().get_proposal(id).cloned()
    }

    /// Copy of the whole event log.
    pub fn event_records(&self) -> Vec<EventRecord> {
        self.lock().events().records().to_vec()
    }

    /// Run `f` against the registry under the lock.
    pub fn read<T>(&self, f: impl FnOnce(&VotingRegistry) -> T) -> T {
        f(&*self.lock())
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut VotingRegistry) -> RegistryResult<T>,
    ) -> RegistryResult<T> {
        let mut registry = self.lock();
        let before = registry.events().last_sequence();
        let result = op(&mut *registry)?;

        for record in registry.events().since(before) {
            // No subscribers is fine.
            if self.events.send(record.clone()).is_err() {
                debug!(sequence = record.sequence, "no event subscribers");
            }
        }

        Ok(result)
    }

    fn lock(&self) -> MutexGuard<'_, VotingRegistry> {
        // Operations check before they write, so a panic cannot leave a
        // half-applied call behind.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
