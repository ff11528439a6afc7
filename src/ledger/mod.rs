//! Proposal ledger.
//!
//! Owns proposal records and the per-account vote record:
//! - Name-derived proposal ids (first 16 bytes of the 32-byte name)
//! - Creation gated on the Proposer role, collisions rejected
//! - One vote per account per proposal
//! - Per-option tallies that only ever increase

pub mod book;
pub mod option;
pub mod proposal;

#[cfg(test)]
mod proptests;

pub use book::{ProposalLedger, VoteReceipt};
pub use option::VoteOption;
pub use proposal::{NameError, Proposal, ProposalId, ProposalName, PROPOSAL_ID_LEN, PROPOSAL_NAME_LEN};
