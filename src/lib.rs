//! Voting Registry - role-gated proposals and one-vote-per-account tallies
//!
//! A small authoritative ledger that:
//! - Restricts proposal creation to holders of the Proposer role
//! - Lets an Admin grant and revoke roles
//! - Records at most one vote per account per proposal
//! - Tallies votes per option and logs every committed change as an event
//!
//! [`VotingRegistry`] is the single-threaded core; [`SharedRegistry`] puts it
//! behind one lock for multi-threaded hosts.

pub mod access;
pub mod error;
pub mod events;
pub mod identity;
pub mod ledger;
pub mod registry;
pub mod scenario;
pub mod shared;

pub use access::{AccessControl, Role};
pub use error::{RegistryError, RegistryResult};
pub use events::{EventLog, EventRecord, RegistryEvent};
pub use identity::Identity;
pub use ledger::{Proposal, ProposalId, ProposalLedger, ProposalName, VoteOption};
pub use registry::VotingRegistry;
pub use shared::SharedRegistry;
