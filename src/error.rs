//! Registry errors.
//!
//! Every rejection is permanent for the call that produced it: nothing is
//! retried and no state is touched before the error is returned.

use crate::access::Role;
use crate::identity::Identity;
use crate::ledger::ProposalId;
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Caller does not hold the role the operation requires.
    #[error("AccessControl: account {account} is missing role {}", .role.id_hex())]
    Unauthorized { account: Identity, role: Role },

    /// `initialize` was called on an already initialised access control.
    #[error("AccessControl: already initialized")]
    AlreadyInitialized,

    /// A proposal with the derived id is already stored.
    #[error("CreateProposal: proposal {id} already exists")]
    ProposalAlreadyExists { id: ProposalId },

    /// No proposal is stored under the id.
    #[error("Proposal: proposal {id} not found")]
    ProposalNotFound { id: ProposalId },

    /// The account already voted on this proposal.
    #[error("VoteProposal: account {account} is voting on the same proposal twice {id}")]
    DuplicateVote { account: Identity, id: ProposalId },

    /// The option code is outside the accepted set.
    #[error("VoteProposal: invalid option code {code}")]
    InvalidOption { code: u8 },
}

impl RegistryError {
    /// Stable snake-case name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::AlreadyInitialized => "already_initialized",
            Self::ProposalAlreadyExists { .. } => "proposal_already_exists",
            Self::ProposalNotFound { .. } => "proposal_not_found",
            Self::DuplicateVote { .. } => "duplicate_vote",
            Self::InvalidOption { .. } => "invalid_option",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ProposalName;

    #[test]
    fn test_unauthorized_message_names_account_and_role() {
        let account = Identity::from_bytes([0x11; 20]);
        let err = RegistryError::Unauthorized {
            account,
            role: Role::Proposer,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("AccessControl: account 0x1111"));
        assert!(msg.contains(&format!("is missing role 0x{}", hex::encode(Role::Proposer.id()))));
    }

    #[test]
    fn test_admin_role_renders_as_zero_id() {
        let err = RegistryError::Unauthorized {
            account: Identity::from_bytes([1; 20]),
            role: Role::Admin,
        };
        assert!(err.to_string().ends_with(&format!("0x{}", "0".repeat(64))));
    }

    #[test]
    fn test_duplicate_vote_message() {
        let id = ProposalId::derive(&ProposalName::new("First Proposal").unwrap());
        let err = RegistryError::DuplicateVote {
            account: Identity::from_bytes([2; 20]),
            id,
        };
        let msg = err.to_string();
        assert!(msg.contains("is voting on the same proposal twice"));
        assert!(msg.ends_with(&id.to_string()));
    }

    #[test]
    fn test_kinds_are_distinct() {
        let id = ProposalId::from_bytes([0; 16]);
        let account = Identity::from_bytes([0; 20]);
        let kinds = [
            RegistryError::Unauthorized {
                account,
                role: Role::Admin,
            }
            .kind(),
            RegistryError::AlreadyInitialized.kind(),
            RegistryError::ProposalAlreadyExists { id }.kind(),
            RegistryError::ProposalNotFound { id }.kind(),
            RegistryError::DuplicateVote { account, id }.kind(),
            RegistryError::InvalidOption { code: 9 }.kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }
}
