//! Role assignments and the admin-gated operations that change them.

use super::role::Role;
use crate::error::{RegistryError, RegistryResult};
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// A committed role change, returned to the caller so it can be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChange {
    pub role: Role,
    /// Identity whose role changed.
    pub account: Identity,
    /// Identity that made the change.
    pub sender: Identity,
}

/// Authoritative role assignments.
///
/// Created uninitialised; [`AccessControl::initialize`] hands Admin to the
/// deploying identity exactly once.
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    initialized: bool,
    holders: BTreeMap<Role, BTreeSet<Identity>>,
}

impl AccessControl {
    /// Create an uninitialised access control. Nobody holds any role.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant Admin to `initial_admin`. Callable once.
    pub fn initialize(&mut self, initial_admin: Identity) -> RegistryResult<RoleChange> {
        if self.initialized {
            warn!(account = %initial_admin, "rejected second initialization");
            return Err(RegistryError::AlreadyInitialized);
        }

        self.initialized = true;
        self.holders
            .entry(Role::Admin)
            .or_default()
            .insert(initial_admin);
        info!(admin = %initial_admin, "access control initialized");

        Ok(RoleChange {
            role: Role::Admin,
            account: initial_admin,
            sender: initial_admin,
        })
    }

    /// Whether `initialize` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Pure read: does `account` currently hold `role`.
    pub fn has_role(&self, role: Role, account: &Identity) -> bool {
        self.holders
            .get(&role)
            .is_some_and(|set| set.contains(account))
    }

    /// Allow/deny decision for a gated operation.
    pub fn check_role(&self, role: Role, account: &Identity) -> RegistryResult<()> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                account: *account,
                role,
            })
        }
    }

    /// Grant `role` to `target`. Requires `caller` to hold Admin.
    ///
    /// Granting a role that is already held succeeds and still reports the
    /// change.
    pub fn grant_role(
        &mut self,
        role: Role,
        target: Identity,
        caller: Identity,
    ) -> RegistryResult<RoleChange> {
        self.require_admin(&caller)?;

        let newly_added = self.holders.entry(role).or_default().insert(target);
        info!(%role, account = %target, sender = %caller, newly_added, "role granted");

        Ok(RoleChange {
            role,
            account: target,
            sender: caller,
        })
    }

    /// Revoke `role` from `target`. Requires `caller` to hold Admin.
    ///
    /// Revoking a role that is not held succeeds.
    pub fn revoke_role(
        &mut self,
        role: Role,
        target: Identity,
        caller: Identity,
    ) -> RegistryResult<RoleChange> {
        self.require_admin(&caller)?;

        let was_held = self
            .holders
            .get_mut(&role)
            .is_some_and(|set| set.remove(&target));
        info!(%role, account = %target, sender = %caller, was_held, "role revoked");

        Ok(RoleChange {
            role,
            account: target,
            sender: caller,
        })
    }

    /// Grant the Proposer role.
    pub fn grant_proposer_role(
        &mut self,
        target: Identity,
        caller: Identity,
    ) -> RegistryResult<RoleChange> {
        self.grant_role(Role::Proposer, target, caller)
    }

    /// Revoke the Proposer role.
    pub fn revoke_proposer_role(
        &mut self,
        target: Identity,
        caller: Identity,
    ) -> RegistryResult<RoleChange> {
        self.revoke_role(Role::Proposer, target, caller)
    }

    /// Identities currently holding `role`, sorted.
    pub fn members(&self, role: Role) -> Vec<Identity> {
        self.holders
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn require_admin(&self, caller: &Identity) -> RegistryResult<()> {
        self.check_role(Role::Admin, caller).inspect_err(|_| {
            warn!(account = %caller, "caller lacks admin role");
        })?;
        debug!(account = %caller, "admin check passed");
        Ok(())
    }
}
